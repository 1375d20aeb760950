// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use astro::angle::{anglr_sepr, limit_to_360};

/// Wraps an RA value (degrees) onto [0, 360).
pub fn normalize_ra(ra: f64) -> f64 {
    let limited = limit_to_360(ra);
    // limit_to_360() can yield exactly 360 for tiny negative inputs.
    if limited >= 360.0 {
        limited - 360.0
    } else {
        limited
    }
}

/// Returns the separation, in radians, between the given celestial coordinates
/// (in radians).
pub fn angular_separation(
    p0_ra: f64,
    p0_dec: f64,
    p1_ra: f64,
    p1_dec: f64,
) -> f64 {
    anglr_sepr(p0_ra, p0_dec, p1_ra, p1_dec)
}

/// Formats an RA (degrees) as `HHh MMm SS.SSs`. The value is rounded to
/// hundredths of a second of time before it is split, so carries propagate
/// into minutes and hours.
pub fn format_ra_hms(ra: f64) -> String {
    const HUNDREDTHS_PER_HOUR: i64 = 360_000;
    let total = (normalize_ra(ra) / 15.0 * HUNDREDTHS_PER_HOUR as f64).round()
        as i64
        % (24 * HUNDREDTHS_PER_HOUR);
    let hours = total / HUNDREDTHS_PER_HOUR;
    let minutes = (total / 6000) % 60;
    let seconds = (total % 6000) as f64 / 100.0;
    format!("{:02}h {:02}m {:05.2}s", hours, minutes, seconds)
}

/// Formats a Dec (degrees) as `±DDd MM' SS.S"`, rounded to tenths of an
/// arcsecond.
pub fn format_dec_dms(dec: f64) -> String {
    const TENTHS_PER_DEGREE: i64 = 36_000;
    let total = (dec.abs() * TENTHS_PER_DEGREE as f64).round() as i64;
    let sign = if dec < 0.0 && total > 0 { '-' } else { '+' };
    let degrees = total / TENTHS_PER_DEGREE;
    let minutes = (total / 600) % 60;
    let seconds = (total % 600) as f64 / 10.0;
    format!("{}{:02}d {:02}' {:04.1}\"", sign, degrees, minutes, seconds)
}

// mod tests.
