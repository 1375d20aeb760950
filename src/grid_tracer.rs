// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use crate::projection::{sky_to_pixel, PixelPoint};
use crate::wcs::WcsParams;

/// Which coordinate a grid line holds constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Constant RA; the line sweeps declination.
    Ra,
    /// Constant Dec; the line sweeps right ascension.
    Dec,
}

/// A traced grid line in FITS pixel coordinates of the native image.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLine {
    /// The constant coordinate, degrees. RA values are on [0, 360).
    pub value: f64,
    pub points: Vec<PixelPoint>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceOptions {
    /// Number of evenly spaced samples swept along the line.
    pub samples: usize,
    /// Clip margin around the image, as a fraction of the larger native
    /// image dimension.
    pub margin_fraction: f64,
}

impl Default for TraceOptions {
    fn default() -> Self {
        TraceOptions {
            samples: 60,
            margin_fraction: 0.05,
        }
    }
}

/// Traces the grid line `axis` = `value` (degrees) by inverse-projecting
/// `options.samples` points swept linearly across `range` of the other
/// coordinate.
///
/// For `Axis::Dec` the sweep is over RA (the range may extend past 360 when
/// the field straddles RA 0). For `Axis::Ra` the sweep is over Dec and is
/// clamped to [-90, 90]. Points that cannot be projected, or that land
/// outside the native image expanded by the clip margin, are dropped.
pub fn trace_line(axis: Axis, value: f64, range: (f64, f64),
                  wcs: &WcsParams,
                  width: f64, height: f64, scale_factor: f64,
                  options: &TraceOptions) -> Vec<PixelPoint> {
    let native_width = width * scale_factor;
    let native_height = height * scale_factor;
    let margin = options.margin_fraction * native_width.max(native_height);
    let (x_min, x_max) = (1.0 - margin, native_width + margin);
    let (y_min, y_max) = (1.0 - margin, native_height + margin);

    let (start, end) = match axis {
        Axis::Dec => range,
        Axis::Ra => (range.0.max(-90.0), range.1.min(90.0)),
    };
    let samples = options.samples.max(2);
    let step = (end - start) / (samples - 1) as f64;

    let mut points = Vec::with_capacity(samples);
    for i in 0..samples {
        let sweep = start + step * i as f64;
        let (ra, dec) = match axis {
            Axis::Dec => (sweep, value),
            Axis::Ra => (value, sweep),
        };
        let Some(p) = sky_to_pixel(ra, dec, wcs) else {
            continue;
        };
        if p.x >= x_min && p.x <= x_max && p.y >= y_min && p.y <= y_max {
            points.push(p);
        }
    }
    points
}

/// As trace_line(), packaged as a GridLine. Returns None when fewer than two
/// points survive, since nothing can be drawn.
pub fn trace_grid_line(axis: Axis, value: f64, range: (f64, f64),
                       wcs: &WcsParams,
                       width: f64, height: f64, scale_factor: f64,
                       options: &TraceOptions) -> Option<GridLine> {
    let points = trace_line(axis, value, range, wcs,
                            width, height, scale_factor, options);
    if points.len() < 2 {
        return None;
    }
    Some(GridLine { value, points })
}

// mod tests.
