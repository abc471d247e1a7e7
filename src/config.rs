use crate::anim::DEFAULT_DURATION;
use crate::land::{LandRule, PlacementStrategy, Polarity};
use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bundled map asset, land drawn dark
pub const DEFAULT_IMAGE: &str = "img/world_alpha_mini.jpg";

/// Largest built-in raster side
const MAX_FALLBACK_SIDE: usize = 16_384;
/// Upper bounds that keep point placement finishing in reasonable time
const MAX_FIBONACCI_COUNT: usize = 10_000_000;
const MAX_RING_DENSITY: f64 = 100.0;

/// Everything that shapes the globe. Every field is optional in the JSON file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Equirectangular map; `None` tries [`DEFAULT_IMAGE`], then the built-in outlines
    pub image: Option<PathBuf>,
    /// Size of the built-in raster used when no image is available
    pub fallback_width: usize,
    pub fallback_height: usize,
    /// Radius the dots sit on; the base sphere is slightly smaller
    pub radius: f64,
    pub land: LandRule,
    pub strategy: PlacementStrategy,
    /// Twinkle clock increment per frame
    pub twinkle_step: f64,
    /// Scale applied to dot positions while grabbing
    pub extrusion: f64,
    pub extrude_ms: u64,
    pub retract_ms: u64,
    /// Minimum time a press keeps the dots extruded
    pub min_hold_ms: u64,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
    /// Fraction of queued rotation applied per frame
    pub damping: f64,
    /// Allowed polar swing either side of the equator, radians
    pub polar_range: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            image: None,
            fallback_width: 360,
            fallback_height: 180,
            radius: 20.0,
            land: LandRule::default(),
            strategy: PlacementStrategy::default(),
            twinkle_step: 0.03,
            extrusion: 1.07,
            extrude_ms: DEFAULT_DURATION.as_millis() as u64,
            retract_ms: 150,
            min_hold_ms: 500,
            auto_rotate: true,
            auto_rotate_speed: 1.2,
            damping: 0.05,
            polar_range: 0.5,
        }
    }
}

impl GlobeConfig {
    /// Read a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut bytes =
            fs::read(path).with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&mut bytes).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse JSON in place (simd-json mutates the buffer)
    pub fn from_json(bytes: &mut [u8]) -> Result<Self> {
        let config: GlobeConfig = simd_json::serde::from_slice(bytes)?;
        Ok(config)
    }

    /// Reject parameters that would silently produce an empty or broken globe
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.radius.is_finite() && self.radius > 0.0,
            "radius must be a positive number, got {}",
            self.radius
        );
        ensure!(
            self.fallback_width > 0 && self.fallback_height > 0,
            "fallback raster must be non-empty"
        );
        ensure!(
            self.fallback_width <= MAX_FALLBACK_SIDE && self.fallback_height <= MAX_FALLBACK_SIDE,
            "fallback raster sides must be at most {MAX_FALLBACK_SIDE}, got {}x{}",
            self.fallback_width,
            self.fallback_height
        );

        match self.land.polarity {
            Polarity::Dark => ensure!(
                self.land.threshold >= 1,
                "dark-land threshold 0 can never match a pixel"
            ),
            Polarity::Light => ensure!(
                self.land.threshold <= 254,
                "light-land threshold 255 can never match a pixel"
            ),
        }

        match self.strategy {
            PlacementStrategy::DirectScan { stride } => {
                ensure!(stride >= 1, "stride must be at least 1");
            }
            PlacementStrategy::Fibonacci { count, tolerance_deg } => {
                ensure!(
                    (1..=MAX_FIBONACCI_COUNT).contains(&count),
                    "fibonacci count must be in 1..={MAX_FIBONACCI_COUNT}, got {count}"
                );
                check_tolerance(tolerance_deg)?;
            }
            PlacementStrategy::LatitudeRings { density, tolerance_deg } => {
                ensure!(
                    density.is_finite() && density > 0.0 && density <= MAX_RING_DENSITY,
                    "ring density must be in (0, {MAX_RING_DENSITY}], got {density}"
                );
                check_tolerance(tolerance_deg)?;
            }
        }

        ensure!(self.twinkle_step.is_finite(), "twinkle step must be finite");
        ensure!(
            self.extrusion.is_finite() && self.extrusion > 0.0,
            "extrusion must be a positive number, got {}",
            self.extrusion
        );
        ensure!(
            self.auto_rotate_speed.is_finite(),
            "auto-rotate speed must be finite"
        );
        ensure!(
            self.damping > 0.0 && self.damping <= 1.0,
            "damping must be in (0, 1], got {}",
            self.damping
        );
        ensure!(
            (0.0..FRAC_PI_2).contains(&self.polar_range),
            "polar range must be within [0, pi/2), got {}",
            self.polar_range
        );
        Ok(())
    }

    pub fn extrude_duration(&self) -> Duration {
        Duration::from_millis(self.extrude_ms)
    }

    pub fn retract_duration(&self) -> Duration {
        Duration::from_millis(self.retract_ms)
    }

    pub fn min_hold(&self) -> Duration {
        Duration::from_millis(self.min_hold_ms)
    }
}

fn check_tolerance(tolerance_deg: f64) -> Result<()> {
    ensure!(
        tolerance_deg > 0.0 && tolerance_deg <= 180.0,
        "tolerance must be in (0, 180] degrees, got {tolerance_deg}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        GlobeConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut json = br#"{
            "radius": 10.0,
            "land": { "polarity": "light", "threshold": 200 },
            "strategy": { "kind": "fibonacci", "count": 1200, "tolerance_deg": 0.5 }
        }"#
        .to_vec();
        let config = GlobeConfig::from_json(&mut json).unwrap();
        assert_eq!(config.radius, 10.0);
        assert_eq!(config.land, LandRule::light(200));
        assert_eq!(
            config.strategy,
            PlacementStrategy::Fibonacci { count: 1200, tolerance_deg: 0.5 }
        );
        assert_eq!(config.min_hold_ms, 500);
        config.validate().unwrap();
    }

    #[test]
    fn test_malformed_json_is_error() {
        let mut json = br#"{ "radius": "big" }"#.to_vec();
        assert!(GlobeConfig::from_json(&mut json).is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let bad = [
            GlobeConfig { radius: 0.0, ..Default::default() },
            GlobeConfig { radius: f64::NAN, ..Default::default() },
            GlobeConfig { land: LandRule::dark(0), ..Default::default() },
            GlobeConfig { land: LandRule::light(255), ..Default::default() },
            GlobeConfig {
                strategy: PlacementStrategy::DirectScan { stride: 0 },
                ..Default::default()
            },
            GlobeConfig {
                strategy: PlacementStrategy::Fibonacci { count: 0, tolerance_deg: 0.5 },
                ..Default::default()
            },
            GlobeConfig {
                strategy: PlacementStrategy::LatitudeRings { density: 2.5, tolerance_deg: 0.0 },
                ..Default::default()
            },
            GlobeConfig {
                strategy: PlacementStrategy::LatitudeRings { density: -1.0, tolerance_deg: 0.5 },
                ..Default::default()
            },
            GlobeConfig {
                strategy: PlacementStrategy::LatitudeRings { density: 1e15, tolerance_deg: 0.5 },
                ..Default::default()
            },
            GlobeConfig {
                strategy: PlacementStrategy::Fibonacci { count: usize::MAX, tolerance_deg: 0.5 },
                ..Default::default()
            },
            GlobeConfig { fallback_width: 16_385, ..Default::default() },
            GlobeConfig { fallback_height: usize::MAX, ..Default::default() },
            GlobeConfig { damping: 0.0, ..Default::default() },
            GlobeConfig { polar_range: 2.0, ..Default::default() },
            GlobeConfig { extrusion: f64::INFINITY, ..Default::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_upper_bounds_are_inclusive() {
        let edge = [
            GlobeConfig {
                strategy: PlacementStrategy::LatitudeRings { density: 100.0, tolerance_deg: 0.5 },
                ..Default::default()
            },
            GlobeConfig {
                strategy: PlacementStrategy::Fibonacci { count: 10_000_000, tolerance_deg: 0.5 },
                ..Default::default()
            },
            GlobeConfig { fallback_width: 16_384, fallback_height: 16_384, ..Default::default() },
        ];
        for config in edge {
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_missing_config_file() {
        let err = GlobeConfig::from_file(Path::new("nope.json")).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
