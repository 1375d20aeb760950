// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

//! Gnomonic (TAN) projection between FITS pixel coordinates and RA/Dec.
//!
//! Pixel coordinates follow the FITS convention: 1-indexed, origin at the
//! bottom-left of the stored array. Sky coordinates are in degrees.

use crate::astro_util::normalize_ra;
use crate::wcs::{WcsParams, SINGULAR_TOLERANCE};

/// A celestial position, degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkyCoord {
    pub ra: f64,
    pub dec: f64,
}

/// A position in FITS pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        PixelPoint { x, y }
    }

    pub fn distance(&self, other: &PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// Points whose tangent-plane denominator is at or below this are on or behind
// the horizon of the tangent plane.
const HORIZON_TOLERANCE: f64 = 1e-10;

/// Forward projection: FITS pixel (x, y) to sky coordinates.
///
/// Returns None only when the WCS has no usable linear transform. RA is
/// normalized to [0, 360); Dec lies in [-90, 90].
pub fn pixel_to_sky(x: f64, y: f64, wcs: &WcsParams) -> Option<SkyCoord> {
    if !wcs.has_transform() {
        return None;
    }
    let m = wcs.linear_transform();
    let dx = x - wcs.crpix[0];
    let dy = y - wcs.crpix[1];
    // Intermediate world coordinates, radians.
    let xi = (m[0][0] * dx + m[0][1] * dy).to_radians();
    let eta = (m[1][0] * dx + m[1][1] * dy).to_radians();

    let rho = xi.hypot(eta);
    if rho == 0.0 {
        return Some(SkyCoord {
            ra: normalize_ra(wcs.crval[0]),
            dec: wcs.crval[1],
        });
    }

    let ra0 = wcs.crval[0].to_radians();
    let dec0 = wcs.crval[1].to_radians();
    let (sin_dec0, cos_dec0) = dec0.sin_cos();
    let c = rho.atan();
    let (sin_c, cos_c) = c.sin_cos();

    let sin_dec = cos_c * sin_dec0 + eta * sin_c * cos_dec0 / rho;
    let dec = sin_dec.clamp(-1.0, 1.0).asin();
    let ra = ra0
        + (xi * sin_c).atan2(rho * cos_dec0 * cos_c - eta * sin_dec0 * sin_c);

    Some(SkyCoord {
        ra: normalize_ra(ra.to_degrees()),
        dec: dec.to_degrees(),
    })
}

/// Inverse projection: sky coordinates (degrees) to FITS pixel (x, y).
///
/// Returns None when:
/// * the axis types name a projection other than TAN,
/// * the WCS has no usable linear transform, or it is singular,
/// * the position is on or behind the horizon of the tangent plane.
///
/// The last case is the normal outcome for far off-axis points. No rounding
/// is applied to the result.
pub fn sky_to_pixel(ra: f64, dec: f64, wcs: &WcsParams) -> Option<PixelPoint> {
    if !wcs.is_tan() || !wcs.has_transform() {
        return None;
    }
    let ra0 = wcs.crval[0].to_radians();
    let dec0 = wcs.crval[1].to_radians();
    let (sin_dec0, cos_dec0) = dec0.sin_cos();
    let (sin_dec, cos_dec) = dec.to_radians().sin_cos();
    let (sin_dra, cos_dra) = (ra.to_radians() - ra0).sin_cos();

    let denom = sin_dec * sin_dec0 + cos_dec * cos_dec0 * cos_dra;
    if denom <= HORIZON_TOLERANCE {
        return None;
    }
    // Intermediate world coordinates, degrees.
    let xi = (cos_dec * sin_dra / denom).to_degrees();
    let eta =
        ((sin_dec * cos_dec0 - cos_dec * sin_dec0 * cos_dra) / denom).to_degrees();

    let (dx, dy) = if wcs.uses_cd_matrix() {
        let cd = &wcs.cd;
        let det = cd[0][0] * cd[1][1] - cd[0][1] * cd[1][0];
        if det.abs() < SINGULAR_TOLERANCE {
            return None;
        }
        (
            (cd[1][1] * xi - cd[0][1] * eta) / det,
            (-cd[1][0] * xi + cd[0][0] * eta) / det,
        )
    } else {
        let cdelt = &wcs.cdelt;
        if cdelt[0].abs() < SINGULAR_TOLERANCE
            || cdelt[1].abs() < SINGULAR_TOLERANCE
        {
            return None;
        }
        (xi / cdelt[0], eta / cdelt[1])
    };

    Some(PixelPoint {
        x: dx + wcs.crpix[0],
        y: dy + wcs.crpix[1],
    })
}

#[cfg(test)]
mod tests {
    extern crate approx;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    // Orion Nebula region, ~0.05"/pixel.
    fn orion_wcs() -> WcsParams {
        WcsParams::from_cd([512.0, 512.0], [83.633, 22.0145],
                           [[-1.39e-5, 0.0], [0.0, 1.39e-5]]).unwrap()
    }

    fn degenerate_wcs() -> WcsParams {
        WcsParams::new([512.0, 512.0], [83.633, 22.0145],
                       [[0.0, 0.0], [0.0, 0.0]], [0.0, 0.0],
                       [Some("RA---TAN".to_string()),
                        Some("DEC--TAN".to_string())]).unwrap()
    }

    // Wraps an RA difference onto [-180, 180).
    fn ra_diff(a: f64, b: f64) -> f64 {
        (a - b + 540.0).rem_euclid(360.0) - 180.0
    }

    #[test]
    fn test_reference_pixel_maps_to_reference_sky() {
        let wcs = orion_wcs();
        let sky = pixel_to_sky(512.0, 512.0, &wcs).unwrap();
        assert_eq!(sky.ra, 83.633);
        assert_eq!(sky.dec, 22.0145);
    }

    #[test]
    fn test_corner_offset() {
        let wcs = orion_wcs();
        let sky = pixel_to_sky(1.0, 1.0, &wcs).unwrap();
        // 511 pixels at 1.39e-5 deg/pixel; RA offset grows by 1/cos(dec).
        assert_abs_diff_eq!(sky.dec - 22.0145, -0.0071029, epsilon = 1e-5);
        assert_abs_diff_eq!(sky.ra - 83.633, 0.0076612, epsilon = 1e-4);
    }

    #[test]
    fn test_inverse_of_reference() {
        let wcs = orion_wcs();
        let p = sky_to_pixel(83.633, 22.0145, &wcs).unwrap();
        assert_abs_diff_eq!(p.x, 512.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 512.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip_sky_pixel_sky() {
        let wcs = orion_wcs();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let ra = 83.633 + rng.gen_range(-0.01..0.01);
            let dec = 22.0145 + rng.gen_range(-0.007..0.007);
            let p = sky_to_pixel(ra, dec, &wcs).unwrap();
            let sky = pixel_to_sky(p.x, p.y, &wcs).unwrap();
            assert_abs_diff_eq!(ra_diff(sky.ra, ra), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(sky.dec, dec, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_round_trip_wide_field_rotated() {
        // 10 arcsec/pixel, rotated 30 degrees, flipped RA axis.
        let s = 10.0 / 3600.0;
        let (sin_t, cos_t) = 30_f64.to_radians().sin_cos();
        let wcs = WcsParams::from_cd(
            [1000.0, 800.0], [10.0, 45.0],
            [[-s * cos_t, s * sin_t], [s * sin_t, s * cos_t]]).unwrap();
        for px in (1..=2000).step_by(250) {
            for py in (1..=1600).step_by(200) {
                let sky = pixel_to_sky(px as f64, py as f64, &wcs).unwrap();
                let p = sky_to_pixel(sky.ra, sky.dec, &wcs).unwrap();
                assert_abs_diff_eq!(p.x, px as f64, epsilon = 1e-6);
                assert_abs_diff_eq!(p.y, py as f64, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_round_trip_across_ra_origin() {
        let wcs = WcsParams::from_cd([100.0, 100.0], [0.0, 0.0],
                                     [[-1e-3, 0.0], [0.0, 1e-3]]).unwrap();
        for (ra, dec) in [(359.95, 0.02), (0.05, -0.03), (0.0, 0.0)] {
            let p = sky_to_pixel(ra, dec, &wcs).unwrap();
            let sky = pixel_to_sky(p.x, p.y, &wcs).unwrap();
            assert_abs_diff_eq!(ra_diff(sky.ra, ra), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(sky.dec, dec, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_output_normalization() {
        // Wide-field WCS near the pole with RA reference at 0, so outputs
        // spread over the whole RA circle.
        let wcs = WcsParams::from_cd([500.0, 500.0], [0.0, 85.0],
                                     [[-0.05, 0.0], [0.0, 0.05]]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = rng.gen_range(-5000.0..5000.0);
            let y = rng.gen_range(-5000.0..5000.0);
            let sky = pixel_to_sky(x, y, &wcs).unwrap();
            assert!(sky.ra >= 0.0 && sky.ra < 360.0, "ra {}", sky.ra);
            assert!(sky.dec >= -90.0 && sky.dec <= 90.0, "dec {}", sky.dec);
        }
    }

    #[test]
    fn test_cdelt_round_trip() {
        let wcs = WcsParams::from_cdelt([50.0, 50.0], [200.0, -30.0],
                                        [-2e-4, 2e-4]).unwrap();
        let sky = pixel_to_sky(10.0, 90.0, &wcs).unwrap();
        let p = sky_to_pixel(sky.ra, sky.dec, &wcs).unwrap();
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_matrix_is_unavailable() {
        let wcs = degenerate_wcs();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let x = rng.gen_range(-1000.0..1000.0);
            let y = rng.gen_range(-1000.0..1000.0);
            assert!(pixel_to_sky(x, y, &wcs).is_none());
            let ra = rng.gen_range(0.0..360.0);
            let dec = rng.gen_range(-90.0..90.0);
            assert!(sky_to_pixel(ra, dec, &wcs).is_none());
        }
    }

    #[test]
    fn test_singular_cd_matrix() {
        // Rank-1 CD matrix: forward works, inverse cannot.
        let wcs = WcsParams::from_cd([1.0, 1.0], [10.0, 10.0],
                                     [[1e-4, 1e-4], [1e-4, 1e-4]]).unwrap();
        assert!(pixel_to_sky(5.0, 5.0, &wcs).is_some());
        assert!(sky_to_pixel(10.0, 10.0, &wcs).is_none());
    }

    #[test]
    fn test_zero_cdelt_axis() {
        let wcs = WcsParams::from_cdelt([1.0, 1.0], [10.0, 10.0],
                                        [1e-4, 0.0]).unwrap();
        assert!(sky_to_pixel(10.0, 10.0, &wcs).is_none());
    }

    #[test]
    fn test_behind_tangent_plane() {
        let wcs = orion_wcs();
        // Antipode.
        assert!(sky_to_pixel(83.633 + 180.0, -22.0145, &wcs).is_none());
        // Exactly 90 degrees away lies on the horizon.
        assert!(sky_to_pixel(83.633 + 90.0, 0.0, &orion_wcs_at_equator())
                .is_none());
    }

    fn orion_wcs_at_equator() -> WcsParams {
        WcsParams::from_cd([512.0, 512.0], [83.633, 0.0],
                           [[-1.39e-5, 0.0], [0.0, 1.39e-5]]).unwrap()
    }

    #[test]
    fn test_non_tan_projection() {
        let mut wcs = orion_wcs();
        wcs.ctype = [Some("RA---SIN".to_string()),
                     Some("DEC--SIN".to_string())];
        assert!(sky_to_pixel(83.633, 22.0145, &wcs).is_none());
        // Forward projection does not consult the axis types.
        assert!(pixel_to_sky(512.0, 512.0, &wcs).is_some());
    }

    #[test]
    fn test_near_pole() {
        let wcs = WcsParams::from_cd([256.0, 256.0], [0.0, 89.99],
                                     [[-1e-4, 0.0], [0.0, 1e-4]]).unwrap();
        for (px, py) in [(256.0, 256.0), (1.0, 1.0), (512.0, 512.0),
                         (1.0, 512.0)] {
            let sky = pixel_to_sky(px, py, &wcs).unwrap();
            let p = sky_to_pixel(sky.ra, sky.dec, &wcs).unwrap();
            assert_abs_diff_eq!(p.x, px, epsilon = 1e-5);
            assert_abs_diff_eq!(p.y, py, epsilon = 1e-5);
        }
    }

}  // mod tests.
