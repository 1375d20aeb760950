// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use crate::astro_util::angular_separation;
use crate::projection::{pixel_to_sky, sky_to_pixel, SkyCoord};
use crate::wcs::WcsParams;

/// Candidate scale bar lengths, arcseconds, ascending: 1" to 5 degrees.
pub const SCALE_BAR_LENGTHS_ARCSEC: [f64; 15] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0,
    60.0, 120.0, 300.0, 600.0, 900.0, 1800.0,
    3600.0, 7200.0, 18000.0,
];

const MIN_WIDTH_PX: f64 = 50.0;
const MAX_WIDTH_PX: f64 = 150.0;
const TARGET_WIDTH_PX: f64 = 100.0;

/// An on-screen ruler of a round angular length.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBar {
    /// E.g. `30"`, `2'`, `1°`.
    pub label: String,
    /// Screen pixels.
    pub width_px: f64,
    pub arcsec: f64,
}

// Pixel offset over which the scale is measured. A single-pixel step is too
// short for an acos-based separation at sub-arcsecond scales.
const BASELINE_PX: f64 = 100.0;

/// Arcseconds spanned by one native pixel at the reference point, averaged
/// over the x and y pixel axes. None if the reference point cannot be
/// projected.
pub fn arcsec_per_pixel(wcs: &WcsParams) -> Option<f64> {
    let center = sky_to_pixel(wcs.crval[0], wcs.crval[1], wcs)?;
    let origin = pixel_to_sky(center.x, center.y, wcs)?;
    let step_x = pixel_to_sky(center.x + BASELINE_PX, center.y, wcs)?;
    let step_y = pixel_to_sky(center.x, center.y + BASELINE_PX, wcs)?;
    let separation = |other: &SkyCoord| {
        angular_separation(origin.ra.to_radians(), origin.dec.to_radians(),
                           other.ra.to_radians(), other.dec.to_radians())
            .to_degrees() * 3600.0
    };
    let arcsec = 0.5 * (separation(&step_x) + separation(&step_y)) / BASELINE_PX;
    if arcsec.is_finite() && arcsec > 0.0 {
        Some(arcsec)
    } else {
        None
    }
}

/// Chooses a scale bar for the image at the given `zoom` (screen pixels per
/// preview pixel). `scale_factor` is the ratio of native to preview
/// resolution.
///
/// The longest tabulated length drawn between 50 and 150 screen pixels is
/// used; failing that, the one closest to 100 pixels. Returns None when the
/// WCS cannot be projected at its reference point, or for a non-positive
/// zoom or scale factor.
pub fn compute_scale_bar(wcs: &WcsParams, scale_factor: f64, zoom: f64)
                         -> Option<ScaleBar> {
    if !(scale_factor > 0.0 && zoom > 0.0) {
        return None;
    }
    let arcsec_per_native_px = arcsec_per_pixel(wcs)?;
    let screen_px_per_native_px = zoom / scale_factor;
    let px_per_arcsec = screen_px_per_native_px / arcsec_per_native_px;

    let in_range = SCALE_BAR_LENGTHS_ARCSEC
        .iter()
        .rev()
        .find(|len| {
            let w = *len * px_per_arcsec;
            (MIN_WIDTH_PX..=MAX_WIDTH_PX).contains(&w)
        });
    let arcsec = match in_range {
        Some(len) => *len,
        None => SCALE_BAR_LENGTHS_ARCSEC
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = (a * px_per_arcsec - TARGET_WIDTH_PX).abs();
                let db = (b * px_per_arcsec - TARGET_WIDTH_PX).abs();
                da.total_cmp(&db)
            })?,
    };
    Some(ScaleBar {
        label: format_length(arcsec),
        width_px: arcsec * px_per_arcsec,
        arcsec,
    })
}

fn format_length(arcsec: f64) -> String {
    if arcsec >= 3600.0 {
        format!("{}°", arcsec / 3600.0)
    } else if arcsec >= 60.0 {
        format!("{}'", arcsec / 60.0)
    } else {
        format!("{}\"", arcsec)
    }
}

// mod tests.
