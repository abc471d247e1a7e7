use glam::DVec3;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::land::position_to_lonlat;

/// Camera distance on wide viewports; narrow ones back off to keep the globe whole
const CAMERA_DISTANCE: f64 = 100.0;
const CAMERA_DISTANCE_NARROW: f64 = 140.0;
/// Braille pixel width below which the viewport counts as narrow (80 columns)
const NARROW_WIDTH: usize = 160;
/// Share of the shorter viewport side the undisplaced globe spans at zoom 1
const FILL: f64 = 0.8;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 4.0;

/// Orbiting camera around a globe centred on the origin (scene space, y up).
/// The camera sits at spherical angles (polar, azimuth); the orientation basis
/// is cached so projecting thousands of dots is three dot products each.
#[derive(Clone)]
pub struct OrbitViewport {
    azimuth: f64,
    polar: f64,
    /// Rotation queued by drags and auto-rotate, drained by `update`
    pending_azimuth: f64,
    pending_polar: f64,
    /// Points from the origin towards the camera
    forward: DVec3,
    /// Screen right
    right: DVec3,
    /// Screen up
    up: DVec3,
    /// Scene radius the globe is framed around
    scene_radius: f64,
    pub zoom: f64,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
    damping: f64,
    polar_range: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl OrbitViewport {
    /// Camera on +z looking at the origin, equator level
    pub fn new(scene_radius: f64, width: usize, height: usize) -> Self {
        let mut vp = Self {
            azimuth: 0.0,
            polar: FRAC_PI_2,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            forward: DVec3::Z,
            right: DVec3::X,
            up: DVec3::Y,
            scene_radius,
            zoom: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 1.2,
            damping: 0.05,
            polar_range: 0.5,
            width,
            height,
        };
        vp.rebuild_basis();
        vp
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.clamp(f64::EPSILON, 1.0);
        self
    }

    pub fn with_polar_range(mut self, range: f64) -> Self {
        self.polar_range = range.clamp(0.0, FRAC_PI_2 - 1e-3);
        self.polar = self.clamp_polar(self.polar);
        self.rebuild_basis();
        self
    }

    pub fn with_auto_rotate(mut self, enabled: bool, speed: f64) -> Self {
        self.auto_rotate = enabled;
        self.auto_rotate_speed = speed;
        self
    }

    fn clamp_polar(&self, polar: f64) -> f64 {
        polar.clamp(FRAC_PI_2 - self.polar_range, FRAC_PI_2 + self.polar_range)
    }

    fn rebuild_basis(&mut self) {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.forward = DVec3::new(sin_p * sin_a, cos_p, sin_p * cos_a);
        self.right = DVec3::Y.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right).normalize();
    }

    /// Screen pixels per scene unit
    pub fn pixels_per_unit(&self) -> f64 {
        let distance = if self.width < NARROW_WIDTH {
            CAMERA_DISTANCE_NARROW
        } else {
            CAMERA_DISTANCE
        };
        let fit = self.width.min(self.height) as f64 * 0.5 * FILL / self.scene_radius;
        fit * self.zoom * (CAMERA_DISTANCE / distance)
    }

    /// Project a scene-space point to screen pixels.
    /// Returns `None` for points on the far hemisphere.
    pub fn project(&self, p: DVec3) -> Option<(i32, i32)> {
        if p.dot(self.forward) < 0.0 {
            return None;
        }

        let scale = self.pixels_per_unit();
        let px = (self.width as f64 / 2.0 + p.dot(self.right) * scale) as i32;
        let py = (self.height as f64 / 2.0 - p.dot(self.up) * scale) as i32;
        Some((px, py))
    }

    /// Whether a screen pixel falls on the projected disk of a sphere of `radius`
    pub fn hit_test(&self, px: i32, py: i32, radius: f64) -> bool {
        let scale = self.pixels_per_unit();
        let sx = (px as f64 - self.width as f64 / 2.0) / scale;
        let sy = -(py as f64 - self.height as f64 / 2.0) / scale;
        sx * sx + sy * sy <= radius * radius
    }

    /// Queue a rotation for a pointer drag of (dx, dy) pixels.
    /// A full viewport height of drag turns the globe once around.
    pub fn rotate_drag(&mut self, dx: i32, dy: i32) {
        let h = self.height.max(1) as f64;
        self.pending_azimuth -= 2.0 * PI * dx as f64 / h;
        self.pending_polar -= 2.0 * PI * dy as f64 / h;
    }

    /// Advance one frame: auto-rotate unless grabbed, then ease queued rotation in
    pub fn update(&mut self, grabbing: bool) {
        if self.auto_rotate && !grabbing {
            self.pending_azimuth -= 2.0 * PI / 60.0 / 60.0 * self.auto_rotate_speed;
        }

        self.azimuth = (self.azimuth + self.pending_azimuth * self.damping).rem_euclid(2.0 * PI);
        self.polar = self.clamp_polar(self.polar + self.pending_polar * self.damping);
        self.pending_azimuth *= 1.0 - self.damping;
        self.pending_polar *= 1.0 - self.damping;

        self.rebuild_basis();
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Geographic point facing the camera
    pub fn center_lonlat(&self) -> (f64, f64) {
        position_to_lonlat(self.forward)
    }

    pub fn polar(&self) -> f64 {
        self.polar
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }
}
