// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use log::debug;

use crate::projection::{pixel_to_sky, PixelPoint, SkyCoord};
use crate::wcs::WcsParams;

/// Rectangular RA/Dec region covered by an image, degrees.
///
/// Derived from samples of the image boundary, so only exact for the sampled
/// points. When `wraps_ra` is set the image straddles RA 0/360 and
/// `max_ra` exceeds 360 so that `min_ra..max_ra` is a continuous interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyBounds {
    pub min_ra: f64,
    pub max_ra: f64,
    pub min_dec: f64,
    pub max_dec: f64,
    pub wraps_ra: bool,
}

impl SkyBounds {
    pub fn ra_extent(&self) -> f64 {
        self.max_ra - self.min_ra
    }

    pub fn dec_extent(&self) -> f64 {
        self.max_dec - self.min_dec
    }

    /// Angular size used to pick a grid spacing: the larger of the
    /// cos(dec)-corrected RA extent and the Dec extent, degrees.
    pub fn field_of_view(&self) -> f64 {
        let mean_dec = 0.5 * (self.min_dec + self.max_dec);
        let ra_size = self.ra_extent() * mean_dec.to_radians().cos();
        ra_size.max(self.dec_extent())
    }
}

// Fewer successful boundary projections than this and the bounds are
// considered unusable.
const MIN_VALID_SAMPLES: usize = 4;

/// Returns the FITS pixel positions sampled along the border of a
/// `width` x `height` native image: corners, edge midpoints and
/// `edge_samples` evenly spaced points per edge.
pub fn boundary_samples(width: f64, height: f64, edge_samples: usize)
                        -> Vec<PixelPoint> {
    let (x0, y0) = (1.0, 1.0);
    let (x1, y1) = (width.max(1.0), height.max(1.0));
    let (xm, ym) = (0.5 * (x0 + x1), 0.5 * (y0 + y1));

    let mut samples = Vec::with_capacity(8 + 4 * edge_samples);
    // Corners.
    samples.push(PixelPoint::new(x0, y0));
    samples.push(PixelPoint::new(x1, y0));
    samples.push(PixelPoint::new(x0, y1));
    samples.push(PixelPoint::new(x1, y1));
    // Edge midpoints.
    samples.push(PixelPoint::new(xm, y0));
    samples.push(PixelPoint::new(xm, y1));
    samples.push(PixelPoint::new(x0, ym));
    samples.push(PixelPoint::new(x1, ym));
    // Interior points along each edge.
    for i in 1..=edge_samples {
        let t = i as f64 / (edge_samples + 1) as f64;
        let x = x0 + t * (x1 - x0);
        let y = y0 + t * (y1 - y0);
        samples.push(PixelPoint::new(x, y0));
        samples.push(PixelPoint::new(x, y1));
        samples.push(PixelPoint::new(x0, y));
        samples.push(PixelPoint::new(x1, y));
    }
    samples
}

/// Estimates the sky region covered by an image.
///
/// `width`, `height` are the (possibly downsampled) preview dimensions and
/// `scale_factor` the ratio of native to preview resolution; sampling
/// happens in native FITS pixels. Returns None if fewer than four boundary
/// samples can be projected.
pub fn estimate_sky_bounds(wcs: &WcsParams,
                           width: f64, height: f64, scale_factor: f64,
                           edge_samples: usize) -> Option<SkyBounds> {
    let native_width = width * scale_factor;
    let native_height = height * scale_factor;
    let sky_samples: Vec<SkyCoord> =
        boundary_samples(native_width, native_height, edge_samples)
        .iter()
        .filter_map(|p| pixel_to_sky(p.x, p.y, wcs))
        .collect();
    if sky_samples.len() < MIN_VALID_SAMPLES {
        debug!("Only {} boundary samples projected; no sky bounds",
               sky_samples.len());
        return None;
    }
    bounds_from_samples(&sky_samples)
}

/// Reduces projected boundary samples to a bounding region, detecting
/// samples that straddle RA 0/360. Returns None if fewer than four samples
/// are given.
pub fn bounds_from_samples(samples: &[SkyCoord]) -> Option<SkyBounds> {
    if samples.len() < MIN_VALID_SAMPLES {
        return None;
    }
    let min_dec = samples.iter().map(|s| s.dec).fold(f64::INFINITY, f64::min);
    let max_dec =
        samples.iter().map(|s| s.dec).fold(f64::NEG_INFINITY, f64::max);

    let mut ras: Vec<f64> = samples.iter().map(|s| s.ra).collect();
    ras.sort_by(|a, b| a.total_cmp(b));
    let first = ras[0];
    let last = ras[ras.len() - 1];

    // Largest gap between consecutive sorted values, and where it ends.
    let mut max_gap = 0.0;
    let mut gap_end = 0;
    for i in 1..ras.len() {
        let gap = ras[i] - ras[i - 1];
        if gap > max_gap {
            max_gap = gap;
            gap_end = i;
        }
    }
    // The gap going from the largest value across 360 back to the smallest.
    let seam_gap = first + 360.0 - last;

    let (min_ra, max_ra, wraps_ra) = if max_gap > seam_gap {
        // The emptiest stretch of RA is inside the sorted range, so the
        // samples occupy the seam: continue past 360.
        (ras[gap_end], ras[gap_end - 1] + 360.0, true)
    } else {
        (first, last, false)
    };

    Some(SkyBounds { min_ra, max_ra, min_dec, max_dec, wraps_ra })
}

#[cfg(test)]
mod tests {
    extern crate approx;
    use approx::assert_abs_diff_eq;

    use super::*;

    fn coords(ras: &[f64]) -> Vec<SkyCoord> {
        ras.iter().map(|ra| SkyCoord { ra: *ra, dec: 1.0 }).collect()
    }

    #[test]
    fn test_boundary_samples() {
        let samples = boundary_samples(100.0, 50.0, 10);
        assert_eq!(samples.len(), 48);
        for p in &samples {
            assert!(p.x >= 1.0 && p.x <= 100.0);
            assert!(p.y >= 1.0 && p.y <= 50.0);
            // Every sample lies on the border.
            assert!(p.x == 1.0 || p.x == 100.0 || p.y == 1.0 || p.y == 50.0);
        }
    }

    #[test]
    fn test_ra_wraparound() {
        let bounds =
            bounds_from_samples(&coords(&[359.9, 0.05, 0.1, 359.95])).unwrap();
        assert!(bounds.wraps_ra);
        assert_abs_diff_eq!(bounds.min_ra, 359.9, epsilon = 1e-9);
        assert_abs_diff_eq!(bounds.max_ra, 360.1, epsilon = 1e-9);
    }

    #[test]
    fn test_no_wraparound() {
        let bounds =
            bounds_from_samples(&coords(&[10.0, 10.5, 11.0, 10.2])).unwrap();
        assert!(!bounds.wraps_ra);
        assert_eq!(bounds.min_ra, 10.0);
        assert_eq!(bounds.max_ra, 11.0);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(bounds_from_samples(&coords(&[1.0, 2.0, 3.0])).is_none());
    }

    #[test]
    fn test_estimate_orion() {
        let wcs = WcsParams::from_cd([512.0, 512.0], [83.633, 22.0145],
                                     [[-1.39e-5, 0.0], [0.0, 1.39e-5]])
            .unwrap();
        let bounds = estimate_sky_bounds(&wcs, 1024.0, 1024.0, 1.0, 10)
            .unwrap();
        assert!(!bounds.wraps_ra);
        assert!(bounds.min_ra < 83.633 && bounds.max_ra > 83.633);
        assert!(bounds.min_dec < 22.0145 && bounds.max_dec > 22.0145);
        // 1024 pixels * 1.39e-5 deg/pixel.
        assert_abs_diff_eq!(bounds.dec_extent(), 0.01422, epsilon = 1e-4);
        assert_abs_diff_eq!(bounds.field_of_view(), 0.01422, epsilon = 1e-4);
    }

    #[test]
    fn test_estimate_uses_scale_factor() {
        let wcs = WcsParams::from_cd([512.0, 512.0], [83.633, 22.0145],
                                     [[-1.39e-5, 0.0], [0.0, 1.39e-5]])
            .unwrap();
        let full = estimate_sky_bounds(&wcs, 1024.0, 1024.0, 1.0, 10).unwrap();
        let preview = estimate_sky_bounds(&wcs, 256.0, 256.0, 4.0, 10).unwrap();
        assert_abs_diff_eq!(full.min_dec, preview.min_dec, epsilon = 1e-9);
        assert_abs_diff_eq!(full.max_ra, preview.max_ra, epsilon = 1e-9);
    }

    #[test]
    fn test_estimate_across_ra_origin() {
        let wcs = WcsParams::from_cd([500.0, 500.0], [0.0, 10.0],
                                     [[-1e-4, 0.0], [0.0, 1e-4]]).unwrap();
        let bounds = estimate_sky_bounds(&wcs, 1000.0, 1000.0, 1.0, 10)
            .unwrap();
        assert!(bounds.wraps_ra);
        assert!(bounds.min_ra > 359.0 && bounds.min_ra < 360.0);
        assert!(bounds.max_ra > 360.0 && bounds.max_ra < 361.0);
        // About 0.1 degree / cos(10 deg).
        assert_abs_diff_eq!(bounds.ra_extent(), 0.1015, epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate_wcs_has_no_bounds() {
        let wcs = WcsParams::new([1.0, 1.0], [10.0, 10.0],
                                 [[0.0, 0.0], [0.0, 0.0]], [0.0, 0.0],
                                 [None, None]).unwrap();
        assert!(estimate_sky_bounds(&wcs, 100.0, 100.0, 1.0, 10).is_none());
    }

}  // mod tests.
