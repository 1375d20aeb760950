// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use crate::projection::{pixel_to_sky, sky_to_pixel, PixelPoint};
use crate::wcs::WcsParams;

/// Image edge, in FITS orientation: `Bottom` is y = 1, `Left` is x = 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Text label for one grid line.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLabel {
    /// Grid line value, degrees.
    pub value: f64,
    /// Where the text is placed, native FITS pixels.
    pub anchor: PixelPoint,
    pub edge: Edge,
    /// Sexagesimal rendering of `value`.
    pub formatted: String,
}

impl Edge {
    // Distance from `p` to this edge of a `width` x `height` native image.
    fn distance(&self, p: &PixelPoint, width: f64, height: f64) -> f64 {
        match self {
            Edge::Left => (p.x - 1.0).abs(),
            Edge::Right => (p.x - width).abs(),
            Edge::Bottom => (p.y - 1.0).abs(),
            Edge::Top => (p.y - height).abs(),
        }
    }
}

/// Returns the polyline point closest to `edge` of the native image, or None
/// for an empty polyline. Ties keep the earliest point.
pub fn pick_edge_anchor(points: &[PixelPoint], edge: Edge,
                        width: f64, height: f64) -> Option<PixelPoint> {
    let mut best: Option<(PixelPoint, f64)> = None;
    for p in points {
        let d = edge.distance(p, width, height);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((*p, d));
        }
    }
    best.map(|(p, _)| p)
}

/// Minimum on-image distance between two labels on the same edge: `fraction`
/// of the pixel length of one `spacing` step of declination at the image
/// center, but never less than `floor_px`.
///
/// Falls back to `floor_px` when the step cannot be projected.
pub fn label_min_distance(wcs: &WcsParams, width: f64, height: f64,
                          spacing: f64, fraction: f64, floor_px: f64) -> f64 {
    let center = PixelPoint::new(0.5 * (1.0 + width), 0.5 * (1.0 + height));
    let Some(sky) = pixel_to_sky(center.x, center.y, wcs) else {
        return floor_px;
    };
    // Step away from the nearer pole so the step stays on the sphere.
    let dec = if sky.dec + spacing <= 90.0 {
        sky.dec + spacing
    } else {
        sky.dec - spacing
    };
    let (Some(p0), Some(p1)) = (sky_to_pixel(sky.ra, sky.dec, wcs),
                                sky_to_pixel(sky.ra, dec, wcs)) else {
        return floor_px;
    };
    (fraction * p0.distance(&p1)).max(floor_px)
}

/// Drops labels that would overlap an earlier label on the same edge: a
/// label closer than `min_distance_px` to an already kept label on its edge
/// is discarded. Labels on different edges never collide.
pub fn deduplicate(labels: Vec<GridLabel>, min_distance_px: f64)
                   -> Vec<GridLabel> {
    let mut kept: Vec<GridLabel> = Vec::with_capacity(labels.len());
    for label in labels {
        let collides = kept.iter().any(|k| {
            k.edge == label.edge
                && k.anchor.distance(&label.anchor) < min_distance_px
        });
        if !collides {
            kept.push(label);
        }
    }
    kept
}

// mod tests.
