// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

//! Maps a pointer position over the displayed preview back to image pixels,
//! the sampled intensity there, and its sky position. Runs on every pointer
//! move, so everything here is closed-form.

use crate::projection::pixel_to_sky;
use crate::wcs::WcsParams;

/// Current pan/zoom of the viewer. A preview pixel `p` is drawn at
/// `(p - c) * scale + c + offset`, where `c` is the preview center; that is,
/// zoom about the center followed by pan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub preview_width: f64,
    pub preview_height: f64,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewState {
    /// Unzoomed, unpanned view of a `width` x `height` preview.
    pub fn new(preview_width: f64, preview_height: f64) -> Self {
        ViewState {
            preview_width,
            preview_height,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    fn center(&self) -> (f64, f64) {
        (0.5 * self.preview_width, 0.5 * self.preview_height)
    }

    /// Screen position to preview image position (top-left origin). Returns
    /// None for a non-positive or non-finite scale.
    pub fn screen_to_image(&self, screen_x: f64, screen_y: f64)
                           -> Option<(f64, f64)> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return None;
        }
        let (cx, cy) = self.center();
        Some(((screen_x - self.offset_x - cx) / self.scale + cx,
              (screen_y - self.offset_y - cy) / self.scale + cy))
    }

    /// Preview image position (top-left origin) to screen position; the
    /// inverse of screen_to_image().
    pub fn image_to_screen(&self, image_x: f64, image_y: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        ((image_x - cx) * self.scale + cx + self.offset_x,
         (image_y - cy) * self.scale + cy + self.offset_y)
    }
}

/// Downsampled intensities of the image, row-major with the first row at the
/// top. The grid need not match the preview size; lookups are scaled onto it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelSamples {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl PixelSamples {
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Self {
        PixelSamples { width, height, values }
    }

    /// Nearest sample to preview position (`ix`, `iy`) of a preview of the
    /// given size. NaN when there are no samples.
    fn lookup(&self, ix: usize, iy: usize,
              preview_width: f64, preview_height: f64) -> f64 {
        if self.width == 0 || self.height == 0
            || self.values.len() < self.width * self.height
        {
            return f64::NAN;
        }
        let sx = (ix as f64 * self.width as f64 / preview_width).floor() as usize;
        let sy = (iy as f64 * self.height as f64 / preview_height).floor() as usize;
        let sx = sx.min(self.width - 1);
        let sy = sy.min(self.height - 1);
        self.values[sy * self.width + sx] as f64
    }
}

/// Readout for the pixel under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorInfo {
    /// Preview pixel, top-left origin.
    pub pixel_x: usize,
    pub pixel_y: usize,
    /// Native-resolution FITS pixel, 1-based with bottom-left origin.
    pub fits_x: i64,
    pub fits_y: i64,
    /// Sampled intensity; NaN when unavailable.
    pub value: f64,
    /// Sky position, degrees. Present only when a usable WCS is supplied.
    pub ra: Option<f64>,
    pub dec: Option<f64>,
}

/// Returns the readout for the pointer at screen position (`mouse_x`,
/// `mouse_y`), or None when the pointer is not over the image.
///
/// `scale_factor` is the ratio of native to preview resolution.
pub fn cursor_to_info(mouse_x: f64, mouse_y: f64,
                      view: &ViewState, scale_factor: f64,
                      samples: &PixelSamples,
                      wcs: Option<&WcsParams>) -> Option<CursorInfo> {
    let (px, py) = view.screen_to_image(mouse_x, mouse_y)?;
    let (w, h) = (view.preview_width, view.preview_height);
    if !(px >= 0.0 && px < w && py >= 0.0 && py < h) {
        return None;
    }
    let ix = px.floor() as usize;
    let iy = py.floor() as usize;

    // Flip to the FITS convention where row 1 is at the bottom.
    let fits_preview_y = h.floor() - 1.0 - iy as f64;
    let fits_x = (ix as f64 * scale_factor).round() as i64 + 1;
    let fits_y = (fits_preview_y * scale_factor).round() as i64 + 1;

    let value = samples.lookup(ix, iy, w, h);

    let sky = wcs
        .filter(|wcs| wcs.has_transform())
        .and_then(|wcs| pixel_to_sky(fits_x as f64, fits_y as f64, wcs));

    Some(CursorInfo {
        pixel_x: ix,
        pixel_y: iy,
        fits_x,
        fits_y,
        value,
        ra: sky.map(|s| s.ra),
        dec: sky.map(|s| s.dec),
    })
}

// mod tests.
