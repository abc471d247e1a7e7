pub mod fallback;

use crate::config::DEFAULT_IMAGE;
use anyhow::{ensure, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the active raster came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterSource {
    File(PathBuf),
    BuiltIn,
}

impl fmt::Display for RasterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterSource::File(path) => write!(f, "{}", path.display()),
            RasterSource::BuiltIn => write!(f, "built-in outlines"),
        }
    }
}

/// Decoded equirectangular image: RGBA8, row-major.
/// Row 0 is the north pole (lat 90), the last row approaches the south pole.
/// Columns span longitude -180..180.
#[derive(Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Raster {
    /// Wrap an RGBA buffer, rejecting zero dimensions and mismatched lengths.
    pub fn from_rgba(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "raster must be non-empty, got {width}x{height}");
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .context("raster dimensions overflow")?;
        ensure!(
            rgba.len() == expected,
            "RGBA buffer is {} bytes, expected {expected} for {width}x{height}",
            rgba.len()
        );
        Ok(Self { width, height, rgba })
    }

    /// Solid-colour raster, mostly for tests and benchmarks.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        let px = [rgb[0], rgb[1], rgb[2], 255];
        let rgba = px.repeat(width * height);
        Self::from_rgba(width, height, rgba)
    }

    /// Decode a PNG or JPEG from disk into RGBA8.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "decoding raster");
        let img = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        info!(path = %path.display(), width = w, height = h, "raster loaded");
        Self::from_rgba(w as usize, h as usize, img.into_raw())
    }

    /// Resolve the map for a run. An explicit path must decode; without one the
    /// bundled asset is tried, then the built-in outlines.
    pub fn open(explicit: Option<&Path>, fallback_size: (usize, usize)) -> Result<(Self, RasterSource)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, RasterSource::File(path.to_path_buf())));
        }

        let default = Path::new(DEFAULT_IMAGE);
        if default.exists() {
            return Ok((Self::load(default)?, RasterSource::File(default.to_path_buf())));
        }

        warn!(asset = DEFAULT_IMAGE, "map asset missing, using built-in outlines");
        let (w, h) = fallback_size;
        Ok((fallback::world_raster(w, h)?, RasterSource::BuiltIn))
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// RGB of the pixel at (col, row). Caller keeps indices in range.
    #[inline(always)]
    pub fn rgb(&self, col: usize, row: usize) -> [u8; 3] {
        let i = (row * self.width + col) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]]
    }

    /// Raw RGBA bytes of one row
    #[inline(always)]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.width * 4;
        &self.rgba[start..start + self.width * 4]
    }

    /// Longitude of a column: -180 + col * 360 / width
    #[inline(always)]
    pub fn col_lon(&self, col: usize) -> f64 {
        -180.0 + col as f64 * (360.0 / self.width as f64)
    }

    /// Latitude of a row: 90 - row * 180 / height
    #[inline(always)]
    pub fn row_lat(&self, row: usize) -> f64 {
        90.0 - row as f64 * (180.0 / self.height as f64)
    }

    /// Angular size of one pixel as (degrees of longitude, degrees of latitude)
    pub fn pixel_size_deg(&self) -> (f64, f64) {
        (360.0 / self.width as f64, 180.0 / self.height as f64)
    }

    /// Row whose latitude is closest to `lat`, clamped into the raster.
    pub fn nearest_row(&self, lat: f64) -> usize {
        let row = ((90.0 - lat) * self.height as f64 / 180.0).round();
        (row.max(0.0) as usize).min(self.height - 1)
    }
}
