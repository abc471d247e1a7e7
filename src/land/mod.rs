mod placement;

pub use placement::{
    build_land_points, fibonacci_candidate, lonlat_to_position, position_to_lonlat, LandPoint,
    PlacementStrategy,
};

use crate::geo::lon_distance;
use crate::raster::Raster;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

/// Which end of the brightness scale encodes land in the source asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Land drawn dark on a light sea (e.g. `world_alpha_mini.jpg`)
    Dark,
    /// Land drawn light on a dark sea
    Light,
}

/// Per-pixel land predicate: every RGB channel must pass the threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct LandRule {
    pub polarity: Polarity,
    pub threshold: u8,
}

impl LandRule {
    /// Land if R, G and B are all below `threshold`
    pub const fn dark(threshold: u8) -> Self {
        Self { polarity: Polarity::Dark, threshold }
    }

    /// Land if R, G and B are all above `threshold`
    pub const fn light(threshold: u8) -> Self {
        Self { polarity: Polarity::Light, threshold }
    }

    #[inline(always)]
    pub fn is_land(&self, rgb: [u8; 3]) -> bool {
        let t = self.threshold;
        match self.polarity {
            Polarity::Dark => rgb.iter().all(|&c| c < t),
            Polarity::Light => rgb.iter().all(|&c| c > t),
        }
    }
}

impl Default for LandRule {
    /// Dark-land asset, channels under 80
    fn default() -> Self {
        Self::dark(80)
    }
}

/// One raster row's land longitudes, ascending
pub struct LatitudeBand {
    pub lat: f64,
    pub lons: Vec<f64>,
}

/// Land longitudes grouped by raster row (one band per row, north to south)
pub struct LatitudeBuckets {
    bands: Vec<LatitudeBand>,
}

impl LatitudeBuckets {
    /// Classify every pixel of the raster. Rows are independent, so they are
    /// classified in parallel; band order stays north to south.
    pub fn build(raster: &Raster, rule: &LandRule) -> Self {
        let bands = (0..raster.height())
            .into_par_iter()
            .map(|row| {
                let lons = raster
                    .row(row)
                    .chunks_exact(4)
                    .enumerate()
                    .filter(|(_, px)| rule.is_land([px[0], px[1], px[2]]))
                    .map(|(col, _)| raster.col_lon(col))
                    .collect();
                LatitudeBand { lat: raster.row_lat(row), lons }
            })
            .collect();

        let buckets = Self { bands };
        debug!(rows = buckets.bands.len(), land = buckets.land_count(), "latitude buckets built");
        buckets
    }

    pub fn bands(&self) -> &[LatitudeBand] {
        &self.bands
    }

    /// Total land samples across all bands
    pub fn land_count(&self) -> usize {
        self.bands.iter().map(|b| b.lons.len()).sum()
    }

    /// Nearest land longitude in a band, accounting for the antimeridian.
    /// Returns `None` for an empty band.
    pub fn nearest_lon(&self, row: usize, lon: f64) -> Option<f64> {
        let lons = &self.bands.get(row)?.lons;
        if lons.is_empty() {
            return None;
        }

        // Neighbours of the insertion point, plus both ends for wrap-around
        let idx = lons.partition_point(|&l| l < lon);
        let mut candidates = [lons[0], lons[lons.len() - 1], lons[0], lons[0]];
        if idx < lons.len() {
            candidates[2] = lons[idx];
        }
        if idx > 0 {
            candidates[3] = lons[idx - 1];
        }

        candidates
            .into_iter()
            .min_by(|a, b| lon_distance(*a, lon).total_cmp(&lon_distance(*b, lon)))
    }

    /// Whether `lon` is within `tolerance_deg` of a land sample in the band
    pub fn is_visible(&self, row: usize, lon: f64, tolerance_deg: f64) -> bool {
        self.nearest_lon(row, lon)
            .is_some_and(|closest| lon_distance(closest, lon) <= tolerance_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped() -> Raster {
        // 8x2: row 0 land at cols 0 and 5, row 1 all sea
        let mut bytes = vec![255u8; 8 * 2 * 4];
        for col in [0usize, 5] {
            bytes[col * 4..col * 4 + 3].copy_from_slice(&[0, 0, 0]);
        }
        Raster::from_rgba(8, 2, bytes).unwrap()
    }

    #[test]
    fn test_rule_polarity() {
        let dark = LandRule::dark(80);
        assert!(dark.is_land([0, 10, 79]));
        assert!(!dark.is_land([0, 10, 80]));
        let light = LandRule::light(200);
        assert!(light.is_land([201, 255, 201]));
        assert!(!light.is_land([201, 255, 200]));
    }

    #[test]
    fn test_buckets_per_row() {
        let b = LatitudeBuckets::build(&striped(), &LandRule::default());
        assert_eq!(b.bands().len(), 2);
        assert_eq!(b.bands()[0].lat, 90.0);
        assert_eq!(b.bands()[0].lons, vec![-180.0, 45.0]);
        assert!(b.bands()[1].lons.is_empty());
        assert_eq!(b.land_count(), 2);
    }

    #[test]
    fn test_nearest_lon() {
        let b = LatitudeBuckets::build(&striped(), &LandRule::default());
        assert_eq!(b.nearest_lon(0, 40.0), Some(45.0));
        assert_eq!(b.nearest_lon(0, -100.0), Some(-180.0));
        // 170 is closer to -180 across the antimeridian than to 45
        assert_eq!(b.nearest_lon(0, 170.0), Some(-180.0));
        assert_eq!(b.nearest_lon(1, 0.0), None);
        assert_eq!(b.nearest_lon(9, 0.0), None);
    }

    #[test]
    fn test_visibility_tolerance() {
        let b = LatitudeBuckets::build(&striped(), &LandRule::default());
        assert!(b.is_visible(0, 45.4, 0.5));
        assert!(!b.is_visible(0, 46.0, 0.5));
        assert!(b.is_visible(0, 179.8, 0.5));
        assert!(!b.is_visible(1, 45.0, 0.5));
    }
}
