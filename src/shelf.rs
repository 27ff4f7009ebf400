//! Row-based placement: plates run left to right along horizontal shelves,
//! each as tall as the first plate placed on it. New shelves stack below
//! everything already on the sheet.
//!
//! Shelves are read back from the sheet's placements rather than stored,
//! so a sheet carries no state beyond its placement list.

use crate::fit::{self, FitResult};
use crate::types::{Placement, Plate, Rect, Sheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shelf {
    pub y: u32,
    pub height: u32,
    /// Right edge of the furthest placement reaching into this shelf's band.
    pub used_width: u32,
}

/// Shelves in the order they were opened.
pub fn shelves(sheet: &Sheet) -> Vec<Shelf> {
    let mut bands: Vec<(u32, u32)> = Vec::new();
    for p in sheet.placements() {
        if !bands.iter().any(|&(y, _)| y == p.y) {
            bands.push((p.y, p.height));
        }
    }

    bands
        .into_iter()
        .map(|(y, height)| Shelf {
            y,
            height,
            used_width: sheet
                .placements()
                .iter()
                .filter(|p| p.y < y + height && y < p.bottom())
                .map(Placement::right)
                .max()
                .unwrap_or(0),
        })
        .collect()
}

/// First y below every placement on the sheet.
fn stack_top(sheet: &Sheet) -> u32 {
    sheet
        .placements()
        .iter()
        .map(Placement::bottom)
        .max()
        .unwrap_or(0)
}

pub fn attempt_place(sheet: &mut Sheet, plate: &Plate) -> bool {
    for shelf in shelves(sheet) {
        let space = Rect::new(sheet.width() - shelf.used_width, shelf.height);
        if let FitResult::Fits { rotated } = fit::evaluate(plate, space) {
            commit(sheet, plate, shelf.used_width, shelf.y, rotated);
            return true;
        }
    }

    let top = stack_top(sheet);
    if top >= sheet.height() {
        return false;
    }
    let space = Rect::new(sheet.width(), sheet.height() - top);
    match fit::evaluate(plate, space) {
        FitResult::Fits { rotated } => {
            tracing::debug!(sheet = sheet.name(), y = top, "opened shelf");
            commit(sheet, plate, 0, top, rotated);
            true
        }
        FitResult::NoFit => false,
    }
}

fn commit(sheet: &mut Sheet, plate: &Plate, x: u32, y: u32, rotated: bool) {
    let placement = Placement::new(plate, x, y, rotated);
    tracing::debug!(
        sheet = sheet.name(),
        plate = plate.label(),
        x,
        y,
        rotated,
        "placed plate on shelf"
    );
    sheet.commit(placement);
}
