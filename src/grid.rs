// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

//! Coordinate grid synthesis: the lines and edge labels overlaid on an image.
//!
//! The grid lives in native FITS pixel space, so it only needs recomputing
//! when the WCS or image dimensions change; pan and zoom are applied by the
//! renderer.

use canonical_error::{CanonicalError, invalid_argument_error};
use log::{debug, warn};

use crate::astro_util::{format_dec_dms, format_ra_hms, normalize_ra};
use crate::grid_labels::{deduplicate, label_min_distance, pick_edge_anchor,
                         Edge, GridLabel};
use crate::grid_spacing::choose_spacing_with;
use crate::grid_tracer::{trace_grid_line, Axis, GridLine, TraceOptions};
use crate::sky_bounds::{estimate_sky_bounds, SkyBounds};
use crate::wcs::WcsParams;

/// Tunable constants for grid synthesis. These are display choices rather
/// than derived quantities; the defaults suit a typical image viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSettings {
    /// Samples swept along each traced line.
    pub line_samples: usize,
    /// Interior points sampled along each image edge for sky bounds.
    pub edge_samples: usize,
    /// Clip margin around the image, fraction of the larger dimension.
    pub margin_fraction: f64,
    /// Minimum label separation, as a fraction of one grid step in pixels.
    pub label_distance_fraction: f64,
    /// Lower limit on label separation, pixels.
    pub label_distance_floor_px: f64,
    /// Acceptable number of lines across the field of view.
    pub min_lines: f64,
    pub max_lines: f64,
    /// Preferred number of lines across the field of view.
    pub target_lines: f64,
    /// Cap on lines per axis. Fields enclosing a pole span all RA values and
    /// would otherwise get a line every spacing step around the circle.
    pub max_lines_per_axis: usize,
    pub dec_label_edge: Edge,
    pub ra_label_edge: Edge,
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            line_samples: 60,
            edge_samples: 10,
            margin_fraction: 0.05,
            label_distance_fraction: 0.4,
            label_distance_floor_px: 40.0,
            min_lines: 2.0,
            max_lines: 15.0,
            target_lines: 6.0,
            max_lines_per_axis: 180,
            dec_label_edge: Edge::Left,
            ra_label_edge: Edge::Bottom,
        }
    }
}

impl GridSettings {
    /// Returns InvalidArgument describing the first nonsensical setting.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.line_samples < 2 {
            return Err(invalid_argument_error(
                format!("line_samples must be at least 2, got {}",
                        self.line_samples).as_str()));
        }
        if !self.margin_fraction.is_finite() || self.margin_fraction < 0.0 {
            return Err(invalid_argument_error(
                format!("margin_fraction must be non-negative, got {}",
                        self.margin_fraction).as_str()));
        }
        if !self.label_distance_fraction.is_finite()
            || self.label_distance_fraction < 0.0
            || !self.label_distance_floor_px.is_finite()
            || self.label_distance_floor_px < 0.0
        {
            return Err(invalid_argument_error(
                format!("label distance settings must be non-negative, got \
                         fraction {} floor {}",
                        self.label_distance_fraction,
                        self.label_distance_floor_px).as_str()));
        }
        if !(self.min_lines > 0.0
             && self.min_lines <= self.target_lines
             && self.target_lines <= self.max_lines)
        {
            return Err(invalid_argument_error(
                format!("need 0 < min_lines <= target_lines <= max_lines, got \
                         {} {} {}",
                        self.min_lines, self.target_lines,
                        self.max_lines).as_str()));
        }
        if self.max_lines_per_axis == 0 {
            return Err(invalid_argument_error(
                "max_lines_per_axis must be positive"));
        }
        Ok(())
    }

    fn trace_options(&self) -> TraceOptions {
        TraceOptions {
            samples: self.line_samples,
            margin_fraction: self.margin_fraction,
        }
    }
}

/// Everything needed to draw a coordinate grid over one image.
#[derive(Clone, Debug, PartialEq)]
pub struct GridData {
    pub ra_lines: Vec<GridLine>,
    pub dec_lines: Vec<GridLine>,
    pub ra_labels: Vec<GridLabel>,
    pub dec_labels: Vec<GridLabel>,
    /// Angular interval between adjacent Dec lines, degrees.
    pub spacing_deg: f64,
    /// Angular interval between adjacent RA lines, degrees. A multiple of
    /// `spacing_deg`; larger when the RA lines were thinned to
    /// `max_lines_per_axis`, as for fields enclosing a pole.
    pub ra_spacing_deg: f64,
}

const RA_TOLERANCE: f64 = 1e-9;

// Multiples of `spacing` on [lo, hi], thinned so at most `max_count` remain.
// Also returns the interval between the surviving values.
fn grid_values(lo: f64, hi: f64, spacing: f64, max_count: usize)
               -> (Vec<f64>, f64) {
    let first = (lo / spacing).ceil() as i64;
    let last = (hi / spacing).floor() as i64;
    if last < first {
        return (Vec::new(), spacing);
    }
    let count = (last - first + 1) as usize;
    let stride = count.div_ceil(max_count).max(1);
    let values = (first..=last)
        .step_by(stride)
        .map(|k| k as f64 * spacing)
        .collect();
    (values, spacing * stride as f64)
}

/// Computes the coordinate grid for an image described by `wcs`.
///
/// `width`, `height` are the preview dimensions and `scale_factor` the
/// ratio of native to preview resolution; the returned geometry is in
/// native FITS pixels. Returns None (and logs why at debug level) when no
/// grid can be drawn: unusable WCS, non-TAN projection, too few projectable
/// boundary samples, or a field of view that is empty or over 180 degrees.
pub fn compute_grid(wcs: &WcsParams,
                    width: f64, height: f64, scale_factor: f64,
                    settings: &GridSettings) -> Option<GridData> {
    if let Err(e) = settings.validate() {
        warn!("Ignoring grid request: {}", e.message);
        return None;
    }
    if !wcs.has_transform() {
        debug!("No grid: WCS has no linear transform");
        return None;
    }
    if !wcs.is_tan() {
        debug!("No grid: projection {:?} is not TAN", wcs.ctype);
        return None;
    }
    let bounds = estimate_sky_bounds(wcs, width, height, scale_factor,
                                     settings.edge_samples)?;
    let fov = bounds.field_of_view();
    if !(fov > 0.0 && fov <= 180.0) {
        debug!("No grid: field of view {} degrees", fov);
        return None;
    }
    let spacing = choose_spacing_with(fov, settings.min_lines,
                                      settings.max_lines, settings.target_lines);
    debug!("Grid spacing {} deg for field of view {} deg", spacing, fov);

    let native_width = width * scale_factor;
    let native_height = height * scale_factor;
    let options = settings.trace_options();

    let dec_lines = trace_dec_lines(wcs, &bounds, spacing, width, height,
                                    scale_factor, settings, &options);
    let (ra_lines, ra_spacing) = trace_ra_lines(wcs, &bounds, spacing,
                                                width, height, scale_factor,
                                                settings, &options);
    if ra_spacing > spacing {
        debug!("RA lines thinned to every {} deg", ra_spacing);
    }

    let min_distance = label_min_distance(
        wcs, native_width, native_height, spacing,
        settings.label_distance_fraction, settings.label_distance_floor_px);
    let dec_labels = deduplicate(
        make_labels(&dec_lines, settings.dec_label_edge,
                    native_width, native_height, format_dec_dms),
        min_distance);
    let ra_labels = deduplicate(
        make_labels(&ra_lines, settings.ra_label_edge,
                    native_width, native_height, format_ra_hms),
        min_distance);

    Some(GridData {
        ra_lines,
        dec_lines,
        ra_labels,
        dec_labels,
        spacing_deg: spacing,
        ra_spacing_deg: ra_spacing,
    })
}

fn trace_dec_lines(wcs: &WcsParams, bounds: &SkyBounds, spacing: f64,
                   width: f64, height: f64, scale_factor: f64,
                   settings: &GridSettings, options: &TraceOptions)
                   -> Vec<GridLine> {
    let lo = bounds.min_dec.max(-90.0);
    let hi = bounds.max_dec.min(90.0);
    grid_values(lo, hi, spacing, settings.max_lines_per_axis).0
        .into_iter()
        .filter_map(|dec| {
            trace_grid_line(Axis::Dec, dec, (bounds.min_ra, bounds.max_ra),
                            wcs, width, height, scale_factor, options)
        })
        .collect()
}

fn trace_ra_lines(wcs: &WcsParams, bounds: &SkyBounds, spacing: f64,
                  width: f64, height: f64, scale_factor: f64,
                  settings: &GridSettings, options: &TraceOptions)
                  -> (Vec<GridLine>, f64) {
    let dec_range = (bounds.min_dec - 0.5 * spacing,
                     bounds.max_dec + 0.5 * spacing);
    let (candidates, ra_spacing) = grid_values(
        bounds.min_ra, bounds.max_ra, spacing, settings.max_lines_per_axis);
    let mut values: Vec<f64> = Vec::new();
    for ra in candidates {
        // Values a rounding error short of 360 are the 0h line.
        let ra = match normalize_ra(ra) {
            v if v > 360.0 - RA_TOLERANCE => 0.0,
            v => v,
        };
        // A range spanning the whole circle reaches the same RA twice.
        if values.iter().any(|v| (v - ra).abs() < RA_TOLERANCE) {
            continue;
        }
        values.push(ra);
    }
    let lines = values
        .into_iter()
        .filter_map(|ra| {
            trace_grid_line(Axis::Ra, ra, dec_range,
                            wcs, width, height, scale_factor, options)
        })
        .collect();
    (lines, ra_spacing)
}

fn make_labels(lines: &[GridLine], edge: Edge,
               native_width: f64, native_height: f64,
               format: fn(f64) -> String) -> Vec<GridLabel> {
    lines
        .iter()
        .filter_map(|line| {
            let anchor = pick_edge_anchor(&line.points, edge,
                                          native_width, native_height)?;
            Some(GridLabel {
                value: line.value,
                anchor,
                edge,
                formatted: format(line.value),
            })
        })
        .collect()
}

// mod tests.
