use glam::DVec3;
use std::time::Duration;
use tracing::debug;

use super::viewport::OrbitViewport;
use crate::anim::{Ease, Tween};
use crate::braille::BrailleCanvas;
use crate::config::GlobeConfig;
use crate::interaction::{CursorHint, DragAction, DragMachine, DragState};
use crate::land::LandPoint;

/// Base sphere sits just under the dots
const BASE_SCALE: f64 = 0.975;

/// Twinkle brightness is quantised into this many colour layers
pub const TWINKLE_LEVELS: usize = 4;

/// Bright end of the dot palette
const COLOR_A: [f64; 3] = [0.196, 0.631, 0.886];
/// Dim end of the dot palette
const COLOR_B: [f64; 3] = [0.192, 0.384, 0.498];

/// Base sphere fill colour
pub const BASE_COLOR: (u8, u8, u8) = (0x0b, 0x26, 0x36);

/// Rendered frame: one braille layer per twinkle level, brightest last,
/// plus the base sphere disk in pixel space.
pub struct DotLayers {
    pub levels: Vec<BrailleCanvas>,
    /// (center x, center y, radius) in braille pixels
    pub base_disk: (f64, f64, f64),
}

/// Everything one globe needs between frames. Owned by the caller; built
/// once from a config and a point set, dropped at teardown.
pub struct GlobeScene {
    points: Vec<LandPoint>,
    /// Per-dot twinkle clock
    twinkle: Vec<f64>,
    twinkle_step: f64,
    extrusion: Tween,
    extrude_to: f64,
    extrude_duration: Duration,
    retract_duration: Duration,
    radius: f64,
    clock: Duration,
    drag: DragMachine,
    hovering: bool,
    last_pointer: Option<(i32, i32)>,
    pub viewport: OrbitViewport,
}

impl GlobeScene {
    pub fn new(config: &GlobeConfig, points: Vec<LandPoint>, width: usize, height: usize) -> Self {
        let twinkle = points.iter().map(|p| p.phase).collect();
        let viewport = OrbitViewport::new(config.radius, width, height)
            .with_damping(config.damping)
            .with_polar_range(config.polar_range)
            .with_auto_rotate(config.auto_rotate, config.auto_rotate_speed);

        debug!(points = points.len(), "scene created");

        Self {
            points,
            twinkle,
            twinkle_step: config.twinkle_step,
            extrusion: Tween::new(1.0).with_ease(Ease::Power1Out),
            extrude_to: config.extrusion,
            extrude_duration: config.extrude_duration(),
            retract_duration: config.retract_duration(),
            radius: config.radius,
            clock: Duration::ZERO,
            drag: DragMachine::new(config.min_hold()),
            hovering: false,
            last_pointer: None,
            viewport,
        }
    }

    /// Advance one frame of `dt` wall time
    pub fn tick(&mut self, dt: Duration) {
        self.clock += dt;

        for t in &mut self.twinkle {
            *t += self.twinkle_step;
        }

        if let Some(action) = self.drag.tick(self.clock) {
            self.apply(action);
        }
        self.extrusion.advance(dt);
        self.viewport.update(self.drag.is_grabbing());
    }

    /// Pointer moved without a button held
    pub fn pointer_move(&mut self, px: i32, py: i32) {
        self.hovering = self.viewport.hit_test(px, py, self.base_radius());
        self.last_pointer = Some((px, py));
    }

    /// Pointer moved with the button held: rotate by the delta
    pub fn pointer_drag(&mut self, px: i32, py: i32) {
        if let Some((lx, ly)) = self.last_pointer {
            self.viewport.rotate_drag(px - lx, py - ly);
        }
        self.pointer_move(px, py);
    }

    pub fn pointer_down(&mut self, px: i32, py: i32) {
        self.pointer_move(px, py);
        if let Some(action) = self.drag.press(self.clock, self.hovering) {
            self.apply(action);
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(action) = self.drag.release(self.clock) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: DragAction) {
        debug!(?action, clock_ms = self.clock.as_millis() as u64, "drag transition");
        match action {
            DragAction::Extrude => self.extrusion.to(self.extrude_to, self.extrude_duration),
            DragAction::Retract => self.extrusion.to(1.0, self.retract_duration),
        }
    }

    pub fn base_radius(&self) -> f64 {
        self.radius * BASE_SCALE
    }

    pub fn points(&self) -> &[LandPoint] {
        &self.points
    }

    pub fn extrusion(&self) -> f64 {
        self.extrusion.value()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn cursor(&self) -> CursorHint {
        self.drag.cursor(self.hovering)
    }

    /// Dot position after extrusion; extruded dots also wobble with their clock
    pub fn displaced(&self, i: usize) -> DVec3 {
        let e = self.extrusion.value();
        let p = self.points[i].position * e;
        if e > 1.0 {
            p + DVec3::splat(self.twinkle[i].sin())
        } else {
            p
        }
    }

    /// Blend factor between the bright and dim palette ends, in [0, 1]
    pub fn dimness(&self, i: usize) -> f64 {
        self.twinkle[i].sin().abs()
    }

    /// Draw visible dots into braille layers sized `cols x rows` cells
    pub fn render(&self, cols: usize, rows: usize) -> DotLayers {
        let mut viewport = self.viewport.clone();
        viewport.set_size(cols * 2, rows * 4);

        // levels[0] is the dimmest so that brighter layers paint over it
        let mut levels: Vec<BrailleCanvas> =
            (0..TWINKLE_LEVELS).map(|_| BrailleCanvas::new(cols, rows)).collect();

        for i in 0..self.points.len() {
            let Some((px, py)) = viewport.project(self.displaced(i)) else {
                continue;
            };
            let level = ((1.0 - self.dimness(i)) * TWINKLE_LEVELS as f64) as usize;
            levels[level.min(TWINKLE_LEVELS - 1)].set_pixel_signed(px, py);
        }

        let base_disk = (
            viewport.width as f64 / 2.0,
            viewport.height as f64 / 2.0,
            self.base_radius() * viewport.pixels_per_unit(),
        );
        DotLayers { levels, base_disk }
    }
}

/// Palette colour for a twinkle layer: mix(A, B, dimness) at the layer's midpoint
pub fn level_color(level: usize) -> (u8, u8, u8) {
    let brightness = (level as f64 + 0.5) / TWINKLE_LEVELS as f64;
    let pct = 1.0 - brightness;
    let mix = |c: usize| ((COLOR_A[c] + (COLOR_B[c] - COLOR_A[c]) * pct) * 255.0).round() as u8;
    (mix(0), mix(1), mix(2))
}
