use super::Raster;
use anyhow::Result;
use rayon::prelude::*;

/// Coarse continent rings (lon, lat), implicitly closed.
/// Only good enough to make the globe recognisable without an image asset.
const CONTINENTS: &[&[(f64, f64)]] = &[
    // North America
    &[
        (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
        (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
        (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
        (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
        (-55.0, 47.0), (-58.0, 55.0), (-64.0, 60.0), (-80.0, 63.0),
        (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-155.0, 71.0),
    ],
    // Central America
    &[
        (-110.0, 25.0), (-105.0, 19.0), (-92.0, 14.0), (-83.0, 8.0),
        (-78.0, 8.0), (-83.0, 15.0), (-88.0, 21.0), (-97.0, 25.0),
    ],
    // South America
    &[
        (-80.0, 10.0), (-70.0, 12.0), (-60.0, 8.0), (-50.0, 0.0),
        (-35.0, -5.0), (-38.0, -15.0), (-40.0, -22.0), (-48.0, -25.0),
        (-55.0, -34.0), (-65.0, -42.0), (-68.0, -50.0), (-72.0, -54.0),
        (-75.0, -45.0), (-72.0, -30.0), (-70.0, -18.0), (-81.0, -5.0),
    ],
    // Greenland
    &[
        (-55.0, 60.0), (-43.0, 60.0), (-20.0, 70.0), (-18.0, 80.0),
        (-40.0, 83.0), (-65.0, 80.0), (-58.0, 75.0), (-53.0, 68.0),
    ],
    // Europe
    &[
        (-10.0, 36.0), (0.0, 38.0), (5.0, 43.0), (15.0, 45.0),
        (20.0, 40.0), (25.0, 37.0), (30.0, 40.0), (40.0, 43.0),
        (40.0, 55.0), (30.0, 60.0), (25.0, 65.0), (20.0, 70.0),
        (10.0, 71.0), (5.0, 62.0), (10.0, 57.0), (-5.0, 48.0),
        (-10.0, 43.0),
    ],
    // British Isles
    &[(-6.0, 50.0), (2.0, 51.0), (-2.0, 57.0), (-5.0, 59.0), (-10.0, 54.0)],
    // Africa
    &[
        (-17.0, 15.0), (-17.0, 21.0), (-10.0, 30.0), (-5.0, 35.0),
        (10.0, 37.0), (20.0, 33.0), (32.0, 31.0), (35.0, 28.0),
        (43.0, 12.0), (51.0, 12.0), (40.0, -2.0), (40.0, -15.0),
        (35.0, -25.0), (30.0, -32.0), (20.0, -35.0), (15.0, -28.0),
        (12.0, -15.0), (10.0, 0.0), (5.0, 5.0), (-8.0, 4.0),
    ],
    // Asia
    &[
        (40.0, 43.0), (50.0, 40.0), (56.0, 27.0), (60.0, 25.0),
        (70.0, 20.0), (77.0, 8.0), (80.0, 15.0), (88.0, 22.0),
        (95.0, 16.0), (100.0, 14.0), (105.0, 10.0), (110.0, 20.0),
        (120.0, 22.0), (122.0, 30.0), (120.0, 40.0), (130.0, 43.0),
        (140.0, 55.0), (160.0, 60.0), (180.0, 66.0), (180.0, 70.0),
        (140.0, 73.0), (110.0, 77.0), (70.0, 73.0), (60.0, 68.0),
        (40.0, 66.0), (30.0, 60.0), (40.0, 55.0),
    ],
    // Arabia
    &[(35.0, 30.0), (48.0, 30.0), (56.0, 24.0), (58.0, 20.0), (45.0, 13.0), (39.0, 18.0)],
    // Australia
    &[
        (115.0, -20.0), (130.0, -12.0), (140.0, -12.0), (145.0, -15.0),
        (153.0, -28.0), (150.0, -37.0), (140.0, -38.0), (130.0, -32.0),
        (115.0, -35.0),
    ],
    // Antarctica
    &[(-180.0, -70.0), (180.0, -70.0), (180.0, -90.0), (-180.0, -90.0)],
];

/// Even-odd test of (lon, lat) against a closed ring
fn ring_contains(ring: &[(f64, f64)], lon: f64, lat: f64) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether a coordinate falls on one of the built-in continents
pub fn is_land(lon: f64, lat: f64) -> bool {
    CONTINENTS.iter().any(|ring| ring_contains(ring, lon, lat))
}

/// Rasterise the built-in continents: land black, sea white.
/// Matches the dark-land polarity of the default asset.
pub fn world_raster(width: usize, height: usize) -> Result<Raster> {
    let mut rgba = vec![0u8; width * height * 4];
    let (dlon, dlat) = (360.0 / width.max(1) as f64, 180.0 / height.max(1) as f64);

    rgba.par_chunks_mut(width.max(1) * 4)
        .enumerate()
        .for_each(|(row, line)| {
            let lat = 90.0 - row as f64 * dlat;
            for (col, px) in line.chunks_exact_mut(4).enumerate() {
                let lon = -180.0 + col as f64 * dlon;
                let v = if is_land(lon, lat) { 0 } else { 255 };
                px.copy_from_slice(&[v, v, v, 255]);
            }
        });

    Raster::from_rgba(width, height, rgba)
}
