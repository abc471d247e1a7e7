use std::time::Duration;
use tui_globe::config::GlobeConfig;
use tui_globe::globe::GlobeScene;
use tui_globe::interaction::{CursorHint, DragState};
use tui_globe::land::LandPoint;
use tui_globe::raster::RasterSource;

/// Application state
pub struct App {
    pub scene: GlobeScene,
    pub should_quit: bool,
    /// Current mouse position for the cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    /// Where the map came from, for the status bar
    pub source: RasterSource,
    config: GlobeConfig,
    /// Space bar grab in progress
    key_grab: bool,
}

/// Braille pixel dimensions for a terminal of `width x height` cells.
/// Accounts for the border (2 cells each way) and the status bar (1 row).
fn canvas_pixels(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}

/// Terminal cell to braille pixel, offset by the 1-cell border
fn cell_to_pixel(col: u16, row: u16) -> (i32, i32) {
    let px = (col.saturating_sub(1) as i32) * 2;
    let py = (row.saturating_sub(1) as i32) * 4;
    (px, py)
}

impl App {
    pub fn new(
        width: usize,
        height: usize,
        config: GlobeConfig,
        points: Vec<LandPoint>,
        source: RasterSource,
    ) -> Self {
        let (pw, ph) = canvas_pixels(width, height);
        Self {
            scene: GlobeScene::new(&config, points, pw, ph),
            should_quit: false,
            mouse_pos: None,
            source,
            config,
            key_grab: false,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pw, ph) = canvas_pixels(width, height);
        self.scene.viewport.set_size(pw, ph);
    }

    /// Rebuild the scene with the same dots and a fresh camera
    pub fn reset(&mut self) {
        let (w, h) = (self.scene.viewport.width, self.scene.viewport.height);
        let points = self.scene.points().to_vec();
        self.scene = GlobeScene::new(&self.config, points, w, h);
        self.key_grab = false;
    }

    /// Advance animations by one frame
    pub fn tick(&mut self, dt: Duration) {
        self.scene.tick(dt);
    }

    pub fn mouse_moved(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        let (px, py) = cell_to_pixel(col, row);
        self.scene.pointer_move(px, py);
    }

    pub fn mouse_down(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        let (px, py) = cell_to_pixel(col, row);
        self.scene.pointer_down(px, py);
    }

    pub fn mouse_drag(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        let (px, py) = cell_to_pixel(col, row);
        self.scene.pointer_drag(px, py);
    }

    pub fn mouse_up(&mut self) {
        self.scene.pointer_up();
    }

    /// Keyboard grab: press at the globe centre, release on the next toggle.
    /// Leaves a mouse grab in progress alone.
    pub fn toggle_grab(&mut self) {
        if self.key_grab {
            self.scene.pointer_up();
            self.key_grab = false;
        } else if self.scene.drag_state() == DragState::Idle {
            let (w, h) = (self.scene.viewport.width, self.scene.viewport.height);
            self.scene.pointer_down(w as i32 / 2, h as i32 / 2);
            self.key_grab = self.scene.drag_state() != DragState::Idle;
        }
    }

    /// Rotate as if dragged by (dx, dy) pixels
    pub fn rotate(&mut self, dx: i32, dy: i32) {
        self.scene.viewport.rotate_drag(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.scene.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.scene.viewport.zoom_out();
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.scene.viewport.auto_rotate = !self.scene.viewport.auto_rotate;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.scene.viewport.zoom)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.config.strategy.name()
    }

    /// Centre of the visible face as a compass string
    pub fn center_coords(&self) -> String {
        let (lon, lat) = self.scene.viewport.center_lonlat();
        format!(
            "{:.1}°{}, {:.1}°{}",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn cursor_label(&self) -> &'static str {
        match self.scene.cursor() {
            CursorHint::Default => "default",
            CursorHint::Pointer => "pointer",
            CursorHint::Grabbing => "grabbing",
        }
    }

    /// Mouse position in braille pixels, for the cursor marker
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| cell_to_pixel(col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_globe::land::{build_land_points, LandRule, PlacementStrategy};
    use tui_globe::raster::Raster;

    fn app() -> App {
        let config = GlobeConfig { auto_rotate: false, ..Default::default() };
        let raster = Raster::filled(36, 18, [0, 0, 0]).unwrap();
        let points = build_land_points(
            &raster,
            config.radius,
            &LandRule::default(),
            &PlacementStrategy::DirectScan { stride: 2 },
        );
        App::new(102, 53, config, points, RasterSource::BuiltIn)
    }

    #[test]
    fn test_canvas_pixels_accounts_for_chrome() {
        assert_eq!(canvas_pixels(102, 53), (200, 200));
        assert_eq!(canvas_pixels(1, 1), (0, 0));
    }

    #[test]
    fn test_keyboard_grab_round_trip() {
        let mut app = app();
        app.toggle_grab();
        assert_eq!(app.cursor_label(), "grabbing");
        app.tick(Duration::from_millis(600));
        app.toggle_grab();
        app.tick(Duration::from_millis(16));
        assert_eq!(app.cursor_label(), "pointer");
    }

    #[test]
    fn test_keyboard_grab_leaves_mouse_grab_alone() {
        let mut app = app();
        app.mouse_down(51, 26);
        assert_eq!(app.cursor_label(), "grabbing");

        // both toggles are ignored while the mouse holds the globe
        app.toggle_grab();
        app.toggle_grab();
        app.tick(Duration::from_millis(600));
        assert!(matches!(app.scene.drag_state(), DragState::Pressed { .. }));

        app.mouse_up();
        assert_eq!(app.scene.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_hover_over_globe_centre() {
        let mut app = app();
        // cell (51, 26) -> pixel (100, 100), the canvas centre
        app.mouse_moved(51, 26);
        assert_eq!(app.cursor_label(), "pointer");
        app.mouse_moved(1, 1);
        assert_eq!(app.cursor_label(), "default");
    }

    #[test]
    fn test_reset_keeps_points() {
        let mut app = app();
        let count = app.scene.points().len();
        app.rotate(40, 0);
        app.tick(Duration::from_millis(16));
        app.reset();
        assert_eq!(app.scene.points().len(), count);
        assert_eq!(app.scene.viewport.azimuth(), 0.0);
    }

    #[test]
    fn test_center_coords_format() {
        let app = app();
        let coords = app.center_coords();
        assert!(coords.starts_with("0.0°"), "{coords}");
        assert!(coords.ends_with(", 90.0°W"), "{coords}");
    }
}
