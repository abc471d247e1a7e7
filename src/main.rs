mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui_globe::config::GlobeConfig;
use tui_globe::export::write_geojson;
use tui_globe::land::{build_land_points, LandPoint, LandRule, PlacementStrategy, Polarity};
use tui_globe::raster::{Raster, RasterSource};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// One dot per land pixel
    Direct,
    /// Golden-angle spiral with nearest-match
    Fibonacci,
    /// Rings of constant latitude with nearest-match
    Rings,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolarityArg {
    Dark,
    Light,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Dotted land-mass globe in the terminal")]
struct Args {
    /// Equirectangular world map (PNG/JPEG)
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dot placement strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Whether land is drawn dark or light in the map
    #[arg(long, value_enum)]
    polarity: Option<PolarityArg>,

    /// Brightness threshold for the land test (0-255)
    #[arg(long)]
    threshold: Option<u8>,

    /// Sphere radius in scene units
    #[arg(long)]
    radius: Option<f64>,

    /// Write the land dots as GeoJSON
    #[arg(long)]
    export: Option<PathBuf>,

    /// Build (and export) without starting the terminal UI
    #[arg(long)]
    headless: bool,

    /// Log file for the terminal UI (stderr is used in headless mode)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Layer flags over the file config (or defaults)
    fn resolve_config(&self) -> Result<GlobeConfig> {
        let mut config = match &self.config {
            Some(path) => GlobeConfig::from_file(path)?,
            None => GlobeConfig::default(),
        };

        if let Some(image) = &self.image {
            config.image = Some(image.clone());
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(polarity) = self.polarity {
            // switching polarity without a threshold picks that polarity's usual cut-off
            config.land = match polarity {
                PolarityArg::Dark => LandRule::dark(self.threshold.unwrap_or(80)),
                PolarityArg::Light => LandRule::light(self.threshold.unwrap_or(100)),
            };
        } else if let Some(threshold) = self.threshold {
            config.land.threshold = threshold;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = match strategy {
                StrategyArg::Direct => PlacementStrategy::DirectScan { stride: 1 },
                StrategyArg::Fibonacci => {
                    PlacementStrategy::Fibonacci { count: 20_000, tolerance_deg: 0.5 }
                }
                StrategyArg::Rings => PlacementStrategy::default(),
            };
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    // TUI without a log file: stderr would draw over the alternate screen, so stay silent
    Ok(())
}

/// Load the map and place the dots
fn build(config: &GlobeConfig) -> Result<(Vec<LandPoint>, RasterSource)> {
    let started = Instant::now();
    let (raster, source) = Raster::open(
        config.image.as_deref(),
        (config.fallback_width, config.fallback_height),
    )?;
    let points = build_land_points(&raster, config.radius, &config.land, &config.strategy);

    info!(
        source = %source,
        strategy = config.strategy.name(),
        polarity = ?config.land.polarity,
        threshold = config.land.threshold,
        points = points.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "globe built"
    );
    Ok((points, source))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.headless)?;

    let config = args.resolve_config()?;
    let (points, source) = build(&config)?;

    if let Some(path) = &args.export {
        write_geojson(path, &points)?;
    }

    if args.headless {
        let dark = config.land.polarity == Polarity::Dark;
        println!(
            "{} land dots from {} ({}, land {} {})",
            points.len(),
            source,
            config.strategy.name(),
            if dark { "<" } else { ">" },
            config.land.threshold
        );
        return Ok(());
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, config, points, source);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Route mouse events to hover, grab and drag-rotate
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.mouse_moved(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(),
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    config: GlobeConfig,
    points: Vec<LandPoint>,
    source: RasterSource,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize, config, points, source);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    KeyCode::Left | KeyCode::Char('h') => app.rotate(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.rotate(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.rotate(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.rotate(0, 6),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_auto_rotate(),
                    KeyCode::Char(' ') => app.toggle_grab(),
                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset(),
                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        let now = Instant::now();
        app.tick(now - last_frame);
        last_frame = now;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
