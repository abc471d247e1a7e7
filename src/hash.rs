/// Mix a point index with a seed into a well-spread 64-bit value (xorshift).
/// Placement feeds each dot's emission index through this with a fixed phase
/// seed, so the same raster always twinkles the same way and a different seed
/// gives an unrelated phase pattern.
#[inline(always)]
pub fn hash2(index: u64, seed: u64) -> u64 {
    let mut x = index
        .wrapping_mul(2654435761)
        .wrapping_add(seed.wrapping_mul(2246822519));
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// Deterministic uniform value in [0, 1) using splitmix64.
/// Turns a [`hash2`] output into the `u` of a dot's phase `ring * sin(u)`.
#[inline(always)]
pub fn unit_random(seed: u64) -> f64 {
    let mut x = seed.wrapping_mul(0x9e3779b97f4a7c15);
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    (x >> 11) as f64 / 9007199254740992.0 // 2^53
}
