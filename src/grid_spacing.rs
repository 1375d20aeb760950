// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

const ARCSEC: f64 = 1.0 / 3600.0;
const ARCMIN: f64 = 1.0 / 60.0;

/// Candidate grid intervals, degrees, ascending.
pub const NICE_INTERVALS_DEG: [f64; 20] = [
    1.0 * ARCSEC,
    2.0 * ARCSEC,
    5.0 * ARCSEC,
    10.0 * ARCSEC,
    15.0 * ARCSEC,
    30.0 * ARCSEC,
    1.0 * ARCMIN,
    2.0 * ARCMIN,
    5.0 * ARCMIN,
    10.0 * ARCMIN,
    15.0 * ARCMIN,
    30.0 * ARCMIN,
    1.0,
    2.0,
    5.0,
    10.0,
    15.0,
    20.0,
    30.0,
    45.0,
];

pub const DEFAULT_MIN_LINES: f64 = 2.0;
pub const DEFAULT_MAX_LINES: f64 = 15.0;
pub const DEFAULT_TARGET_LINES: f64 = 6.0;

/// Picks a grid interval (degrees) for a field of view of `fov_deg` degrees:
/// the tabulated interval giving between 2 and 15 lines that is closest to
/// 6 lines, or the coarsest interval if none qualifies.
pub fn choose_spacing(fov_deg: f64) -> f64 {
    choose_spacing_with(fov_deg, DEFAULT_MIN_LINES, DEFAULT_MAX_LINES,
                        DEFAULT_TARGET_LINES)
}

/// As choose_spacing(), with the line-count window and target supplied by
/// the caller.
pub fn choose_spacing_with(fov_deg: f64, min_lines: f64, max_lines: f64,
                           target_lines: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;  // (interval, |count - target|)
    for interval in NICE_INTERVALS_DEG {
        let count = fov_deg / interval;
        if count < min_lines || count > max_lines {
            continue;
        }
        let miss = (count - target_lines).abs();
        // Ties keep the finer interval.
        if best.map_or(true, |(_, best_miss)| miss < best_miss) {
            best = Some((interval, miss));
        }
    }
    match best {
        Some((interval, _)) => interval,
        None => NICE_INTERVALS_DEG[NICE_INTERVALS_DEG.len() - 1],
    }
}

// mod tests.
