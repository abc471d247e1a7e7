use super::{LandRule, LatitudeBuckets};
use crate::geo::wrap_lon;
use crate::hash::{hash2, unit_random};
use crate::raster::Raster;
use glam::DVec3;
use serde::Deserialize;
use std::f64::consts::PI;
use tracing::debug;

const PHASE_SEED: u64 = 0x5eed;

/// A land dot on the sphere surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandPoint {
    pub lon: f64,
    pub lat: f64,
    /// Scene-space position (y up), at the configured radius
    pub position: DVec3,
    /// Twinkle time offset
    pub phase: f64,
}

/// How candidate dot positions are chosen before the land test
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// One dot per land pixel on a `stride` grid, at the pixel's exact coordinate.
    /// Exact, but dots crowd together towards the poles.
    DirectScan { stride: usize },
    /// `count` golden-angle candidates spread evenly over the sphere, each kept
    /// if its latitude band has land within `tolerance_deg` of longitude.
    Fibonacci { count: usize, tolerance_deg: f64 },
    /// Rings of constant latitude (one per raster row), dots spaced by
    /// `density` per unit of ring circumference, same nearest-match test.
    LatitudeRings { density: f64, tolerance_deg: f64 },
}

impl Default for PlacementStrategy {
    fn default() -> Self {
        Self::LatitudeRings { density: 2.5, tolerance_deg: 0.5 }
    }
}

impl PlacementStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectScan { .. } => "direct",
            Self::Fibonacci { .. } => "fibonacci",
            Self::LatitudeRings { .. } => "rings",
        }
    }
}

/// Spherical transform: phi measured from the north pole, theta from lon -180.
/// Longitude -180 lands on -x, longitude -90 on +z.
#[inline(always)]
pub fn lonlat_to_position(lon: f64, lat: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(
        -(radius * sin_phi * cos_theta),
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`lonlat_to_position`]. Longitude is arbitrary at the poles.
#[inline(always)]
pub fn position_to_lonlat(p: DVec3) -> (f64, f64) {
    let r = p.length();
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let phi = (p.y / r).clamp(-1.0, 1.0).acos();
    let theta = p.z.atan2(-p.x);
    (wrap_lon(theta.to_degrees() - 180.0), 90.0 - phi.to_degrees())
}

/// Candidate `i` of `n` on the golden-angle spiral. Phi is measured from +y,
/// theta from +z towards +x.
#[inline(always)]
pub fn fibonacci_candidate(i: usize, n: usize, radius: f64) -> DVec3 {
    let phi = (-1.0 + (2.0 * i as f64) / n as f64).clamp(-1.0, 1.0).acos();
    let theta = (n as f64 * PI).sqrt() * phi;
    let (sin_phi, cos_phi) = phi.sin_cos();
    DVec3::new(
        radius * sin_phi * theta.sin(),
        radius * cos_phi,
        radius * sin_phi * theta.cos(),
    )
}

#[inline(always)]
fn phase_for(ring: usize, index: usize) -> f64 {
    ring as f64 * unit_random(hash2(index as u64, PHASE_SEED)).sin()
}

/// Turn a raster into land dots on a sphere of `radius`.
/// Output is in scan order; pure function of its inputs.
pub fn build_land_points(
    raster: &Raster,
    radius: f64,
    rule: &LandRule,
    strategy: &PlacementStrategy,
) -> Vec<LandPoint> {
    let points = match *strategy {
        PlacementStrategy::DirectScan { stride } => direct_scan(raster, radius, rule, stride.max(1)),
        PlacementStrategy::Fibonacci { count, tolerance_deg } => {
            let buckets = LatitudeBuckets::build(raster, rule);
            fibonacci(raster, &buckets, radius, count, tolerance_deg)
        }
        PlacementStrategy::LatitudeRings { density, tolerance_deg } => {
            let buckets = LatitudeBuckets::build(raster, rule);
            latitude_rings(&buckets, radius, density, tolerance_deg)
        }
    };

    debug!(strategy = strategy.name(), points = points.len(), "land points built");
    points
}

fn direct_scan(raster: &Raster, radius: f64, rule: &LandRule, stride: usize) -> Vec<LandPoint> {
    let mut points = Vec::new();
    for row in (0..raster.height()).step_by(stride) {
        let lat = raster.row_lat(row);
        for col in (0..raster.width()).step_by(stride) {
            if !rule.is_land(raster.rgb(col, row)) {
                continue;
            }
            let lon = raster.col_lon(col);
            points.push(LandPoint {
                lon,
                lat,
                position: lonlat_to_position(lon, lat, radius),
                phase: phase_for(row, points.len()),
            });
        }
    }
    points
}

fn fibonacci(
    raster: &Raster,
    buckets: &LatitudeBuckets,
    radius: f64,
    count: usize,
    tolerance_deg: f64,
) -> Vec<LandPoint> {
    let mut points = Vec::new();
    for i in 0..count {
        let position = fibonacci_candidate(i, count, radius);
        let (lon, lat) = position_to_lonlat(position);
        let row = raster.nearest_row(lat);
        if !buckets.is_visible(row, lon, tolerance_deg) {
            continue;
        }
        points.push(LandPoint { lon, lat, position, phase: phase_for(row, points.len()) });
    }
    points
}

fn latitude_rings(
    buckets: &LatitudeBuckets,
    radius: f64,
    density: f64,
    tolerance_deg: f64,
) -> Vec<LandPoint> {
    let mut points = Vec::new();
    for (ring, band) in buckets.bands().iter().enumerate() {
        if band.lons.is_empty() {
            continue;
        }

        let ring_radius = band.lat.abs().to_radians().cos() * radius;
        let dots = ring_radius * 2.0 * PI * density;
        let steps = dots.ceil() as usize;

        for x in 0..steps {
            let lon = -180.0 + x as f64 * 360.0 / dots;
            if !buckets.is_visible(ring, lon, tolerance_deg) {
                continue;
            }
            points.push(LandPoint {
                lon,
                lat: band.lat,
                position: lonlat_to_position(lon, band.lat, radius),
                phase: phase_for(ring, points.len()),
            });
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::lon_distance;
    use crate::raster::fallback::world_raster;

    const EPS: f64 = 1e-9;

    fn all_strategies() -> [PlacementStrategy; 3] {
        [
            PlacementStrategy::DirectScan { stride: 1 },
            PlacementStrategy::Fibonacci { count: 2000, tolerance_deg: 0.5 },
            PlacementStrategy::default(),
        ]
    }

    #[test]
    fn test_four_by_four_black() {
        let raster = Raster::filled(4, 4, [0, 0, 0]).unwrap();
        let points = build_land_points(
            &raster,
            20.0,
            &LandRule::dark(80),
            &PlacementStrategy::DirectScan { stride: 1 },
        );
        assert_eq!(points.len(), 16);

        let lons = [-180.0, -90.0, 0.0, 90.0];
        let lats = [90.0, 45.0, 0.0, -45.0];
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.lat, lats[i / 4]);
            assert_eq!(p.lon, lons[i % 4]);
            let expected = lonlat_to_position(p.lon, p.lat, 20.0);
            assert!((p.position - expected).length() < EPS);
        }
    }

    #[test]
    fn test_all_land_count_with_stride() {
        let raster = Raster::filled(360, 180, [0, 0, 0]).unwrap();
        for stride in [1usize, 2, 4, 10] {
            let points = build_land_points(
                &raster,
                20.0,
                &LandRule::default(),
                &PlacementStrategy::DirectScan { stride },
            );
            assert_eq!(points.len(), 360 * 180 / (stride * stride));
        }
    }

    #[test]
    fn test_stride_not_dividing_raster_rounds_up() {
        let raster = Raster::filled(7, 5, [0, 0, 0]).unwrap();
        let points = build_land_points(
            &raster,
            20.0,
            &LandRule::default(),
            &PlacementStrategy::DirectScan { stride: 2 },
        );
        // columns 0, 2, 4, 6 and rows 0, 2, 4
        assert_eq!(points.len(), 4 * 3);
        assert_eq!(points.last().map(|p| (p.lon, p.lat)), Some((raster.col_lon(6), raster.row_lat(4))));
    }

    #[test]
    fn test_no_land_is_empty() {
        let raster = Raster::filled(90, 45, [255, 255, 255]).unwrap();
        for strategy in all_strategies() {
            let points = build_land_points(&raster, 20.0, &LandRule::default(), &strategy);
            assert!(points.is_empty(), "{} emitted points", strategy.name());
        }
    }

    #[test]
    fn test_points_lie_on_sphere() {
        let raster = world_raster(180, 90).unwrap();
        for strategy in all_strategies() {
            let points = build_land_points(&raster, 20.0, &LandRule::default(), &strategy);
            assert!(!points.is_empty());
            for p in &points {
                assert!((p.position.length() - 20.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_round_trip_recovers_pixel() {
        let raster = world_raster(120, 60).unwrap();
        let (dlon, dlat) = raster.pixel_size_deg();
        let points = build_land_points(
            &raster,
            7.5,
            &LandRule::default(),
            &PlacementStrategy::DirectScan { stride: 1 },
        );
        for p in points.iter().filter(|p| p.lat.abs() < 89.0) {
            let (lon, lat) = position_to_lonlat(p.position);
            assert!(lon_distance(lon, p.lon) < dlon, "lon {lon} vs {}", p.lon);
            assert!((lat - p.lat).abs() < dlat, "lat {lat} vs {}", p.lat);
        }
    }

    #[test]
    fn test_nearest_match_within_tolerance() {
        let raster = world_raster(360, 180).unwrap();
        let rule = LandRule::default();
        let buckets = LatitudeBuckets::build(&raster, &rule);
        for tolerance in [0.5, 2.0] {
            let strategies = [
                PlacementStrategy::Fibonacci { count: 5000, tolerance_deg: tolerance },
                PlacementStrategy::LatitudeRings { density: 2.5, tolerance_deg: tolerance },
            ];
            for strategy in strategies {
                let points = build_land_points(&raster, 20.0, &rule, &strategy);
                assert!(!points.is_empty());
                for p in &points {
                    let row = raster.nearest_row(p.lat);
                    let closest = buckets.nearest_lon(row, p.lon).unwrap();
                    assert!(lon_distance(closest, p.lon) <= tolerance);
                }
            }
        }
    }

    #[test]
    fn test_direct_scan_has_no_duplicates() {
        let raster = world_raster(72, 36).unwrap();
        let points = build_land_points(
            &raster,
            1.0,
            &LandRule::default(),
            &PlacementStrategy::DirectScan { stride: 1 },
        );
        let mut keys: Vec<(i64, i64)> = points
            .iter()
            .map(|p| ((p.lon * 1000.0) as i64, (p.lat * 1000.0) as i64))
            .collect();
        let before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn test_rings_thin_out_towards_poles() {
        let raster = Raster::filled(360, 180, [0, 0, 0]).unwrap();
        let points = build_land_points(
            &raster,
            20.0,
            &LandRule::default(),
            &PlacementStrategy::default(),
        );
        let equator = points.iter().filter(|p| p.lat == 0.0).count();
        let north = points.iter().filter(|p| p.lat == 80.0).count();
        assert!(equator > north * 4);
        // circumference 2*pi*20 at 2.5 dots per unit
        assert_eq!(equator, (2.0 * PI * 20.0 * 2.5_f64).ceil() as usize);
    }

    #[test]
    fn test_fibonacci_candidates_cover_both_poles() {
        let n = 500;
        let first = fibonacci_candidate(0, n, 1.0);
        let last = fibonacci_candidate(n - 1, n, 1.0);
        assert!(first.y < -0.99);
        assert!(last.y > 0.99);
        for i in 0..n {
            assert!((fibonacci_candidate(i, n, 1.0).length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_phases_are_deterministic() {
        let raster = world_raster(90, 45).unwrap();
        let a = build_land_points(&raster, 20.0, &LandRule::default(), &PlacementStrategy::default());
        let b = build_land_points(&raster, 20.0, &LandRule::default(), &PlacementStrategy::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_transform_axes() {
        let p = lonlat_to_position(-180.0, 0.0, 1.0);
        assert!((p - DVec3::new(-1.0, 0.0, 0.0)).length() < EPS);
        let p = lonlat_to_position(-90.0, 0.0, 1.0);
        assert!((p - DVec3::new(0.0, 0.0, 1.0)).length() < EPS);
        let p = lonlat_to_position(0.0, 90.0, 1.0);
        assert!((p - DVec3::Y).length() < EPS);
    }
}
