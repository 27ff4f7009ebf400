//! Decides whether a plate fits a free rectangle, and in which orientation.

use crate::types::{Plate, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitResult {
    NoFit,
    Fits { rotated: bool },
}

impl FitResult {
    pub fn fits(&self) -> bool {
        matches!(self, FitResult::Fits { .. })
    }
}

/// Tests `plate` against a free rectangle of size `space`.
///
/// Grain-locked plates are only ever tried as given. Otherwise the given
/// orientation wins whenever it fits; rotation is reported only when it is
/// the sole way in.
pub fn evaluate(plate: &Plate, space: Rect) -> FitResult {
    let piece = plate.size();
    if piece.fits_in(&space) {
        return FitResult::Fits { rotated: false };
    }
    if !plate.grain_locked() && piece.rotated().fits_in(&space) {
        return FitResult::Fits { rotated: true };
    }
    FitResult::NoFit
}
