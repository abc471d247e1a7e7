use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use tui_globe::braille::BrailleCanvas;
use tui_globe::globe::{level_color, DotLayers, BASE_COLOR};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_globe(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_globe(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Globe ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layers = app.scene.render(inner.width as usize, inner.height as usize);

    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    frame.render_widget(GlobeWidget { layers, cursor_pos }, inner);
}

/// Base sphere, dot layers and cursor marker
struct GlobeWidget {
    layers: DotLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl GlobeWidget {
    /// Paint the base sphere as cell backgrounds
    fn render_base(&self, area: Rect, buf: &mut Buffer) {
        let (cx, cy, r) = self.layers.base_disk;
        let (red, green, blue) = BASE_COLOR;
        for row in 0..area.height {
            for col in 0..area.width {
                // cell centre in braille pixels
                let dx = col as f64 * 2.0 + 1.0 - cx;
                let dy = row as f64 * 4.0 + 2.0 - cy;
                if dx * dx + dy * dy <= r * r {
                    buf[(area.x + col, area.y + row)].set_bg(Color::Rgb(red, green, blue));
                }
            }
        }
    }

    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        let (cols, rows) = canvas.size();
        for row in 0..rows.min(area.height as usize) {
            for col in 0..cols.min(area.width as usize) {
                if let Some(ch) = canvas.glyph(col, row) {
                    buf[(area.x + col as u16, area.y + row as u16)]
                        .set_char(ch)
                        .set_fg(color);
                }
            }
        }
    }
}

impl Widget for GlobeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_base(area, buf);

        // dim layers first so brighter dots win shared cells
        for (level, canvas) in self.layers.levels.iter().enumerate() {
            let (r, g, b) = level_color(level);
            self.render_layer(canvas, Color::Rgb(r, g, b), area, buf);
        }

        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let auto = app.scene.viewport.auto_rotate;

    let status = Line::from(vec![
        Span::styled(" Dots: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.scene.points().len().to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" (", Style::default().fg(Color::DarkGray)),
        Span::styled(app.strategy_name(), Style::default().fg(Color::Magenta)),
        Span::styled(", ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.source.to_string(), Style::default().fg(Color::Magenta)),
        Span::styled(") Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" Extrude: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{:.3}", app.scene.extrusion()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" ", Style::default()),
        Span::styled(
            if auto { "[A]uto " } else { "[a]uto " },
            Style::default().fg(if auto { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(app.cursor_label(), Style::default().fg(Color::Green)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | hjkl:rotate +/-:zoom space:grab r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
