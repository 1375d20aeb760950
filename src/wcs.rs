// Copyright (c) 2024 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use canonical_error::{CanonicalError, invalid_argument_error};

/// Tangent-plane (TAN) WCS parameters for one image.
///
/// Constructed once at the header-parsing boundary via `WcsParams::new()`;
/// every projection function downstream takes it by reference and performs
/// no further type checks.
#[derive(Clone, Debug, PartialEq)]
pub struct WcsParams {
    /// Reference pixel `(crpix1, crpix2)`, FITS 1-indexed convention.
    pub crpix: [f64; 2],
    /// Reference sky position `(crval1, crval2)` = (RA, Dec) in degrees.
    pub crval: [f64; 2],
    /// CD matrix, degrees per pixel. `cd[0] = [cd1_1, cd1_2]`,
    /// `cd[1] = [cd2_1, cd2_2]`. All zero means "use `cdelt`".
    pub cd: [[f64; 2]; 2],
    /// Per-axis scale `(cdelt1, cdelt2)`, degrees per pixel. Only consulted
    /// when the CD matrix is all zero.
    pub cdelt: [f64; 2],
    /// Axis type strings `(ctype1, ctype2)`, e.g. "RA---TAN".
    pub ctype: [Option<String>; 2],
}

// Determinants (and CDELT magnitudes) below this are treated as singular.
pub(crate) const SINGULAR_TOLERANCE: f64 = 1e-20;

impl WcsParams {
    /// Validates and constructs a WCS record.
    ///
    /// Returns InvalidArgument if any numeric field is not finite or if
    /// `crval2` is not a valid declination. A degenerate (all-zero) transform
    /// is accepted: projection simply reports "unavailable" for it.
    pub fn new(
        crpix: [f64; 2],
        crval: [f64; 2],
        cd: [[f64; 2]; 2],
        cdelt: [f64; 2],
        ctype: [Option<String>; 2],
    ) -> Result<Self, CanonicalError> {
        let numbers = crpix
            .iter()
            .chain(crval.iter())
            .chain(cd[0].iter())
            .chain(cd[1].iter())
            .chain(cdelt.iter());
        for value in numbers {
            if !value.is_finite() {
                return Err(invalid_argument_error(
                    format!("WCS parameter {} is not finite", value).as_str(),
                ));
            }
        }
        if !(-90.0..=90.0).contains(&crval[1]) {
            return Err(invalid_argument_error(
                format!("CRVAL2 {} is outside [-90, 90]", crval[1]).as_str(),
            ));
        }
        Ok(WcsParams { crpix, crval, cd, cdelt, ctype })
    }

    /// Convenience constructor for the common CD-matrix TAN header.
    pub fn from_cd(
        crpix: [f64; 2],
        crval: [f64; 2],
        cd: [[f64; 2]; 2],
    ) -> Result<Self, CanonicalError> {
        Self::new(
            crpix,
            crval,
            cd,
            [0.0, 0.0],
            [Some("RA---TAN".to_string()), Some("DEC--TAN".to_string())],
        )
    }

    /// Convenience constructor for a CDELT-only TAN header.
    pub fn from_cdelt(
        crpix: [f64; 2],
        crval: [f64; 2],
        cdelt: [f64; 2],
    ) -> Result<Self, CanonicalError> {
        Self::new(
            crpix,
            crval,
            [[0.0, 0.0], [0.0, 0.0]],
            cdelt,
            [Some("RA---TAN".to_string()), Some("DEC--TAN".to_string())],
        )
    }

    /// True unless every CD matrix entry is zero.
    pub fn uses_cd_matrix(&self) -> bool {
        self.cd.iter().flatten().any(|v| *v != 0.0)
    }

    /// False when neither the CD matrix nor CDELT carries any scale; both
    /// projectors are unavailable for such a WCS.
    pub fn has_transform(&self) -> bool {
        self.uses_cd_matrix() || self.cdelt.iter().any(|v| *v != 0.0)
    }

    /// True when the axis types are absent or both name the TAN projection.
    pub fn is_tan(&self) -> bool {
        self.ctype
            .iter()
            .all(|ctype| ctype.as_ref().map_or(true, |c| c.contains("TAN")))
    }

    /// The effective pixel -> intermediate world coordinate matrix, degrees
    /// per pixel. CDELT is expanded to a diagonal matrix.
    pub fn linear_transform(&self) -> [[f64; 2]; 2] {
        if self.uses_cd_matrix() {
            self.cd
        } else {
            [[self.cdelt[0], 0.0], [0.0, self.cdelt[1]]]
        }
    }

    /// Approximate pixel scale, degrees per pixel, from the determinant of
    /// the linear transform.
    pub fn pixel_scale(&self) -> f64 {
        let m = self.linear_transform();
        let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
        det.abs().sqrt()
    }
}

// mod tests.
