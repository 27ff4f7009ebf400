use serde::{Deserialize, Serialize};

use crate::fit::{self, FitResult};
use crate::free_space::free_regions;
use crate::shelf;
use crate::types::{FreeRegion, Placement, Plate, Sheet};

/// How plates are positioned on a single sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Best-fit over the free rectangles left by splitting around placements.
    #[default]
    RectangleSplit,
    /// Left-to-right rows whose height is set by their first plate.
    #[serde(rename = "shelf", alias = "shelf-packing")]
    ShelfPacking,
}

impl Strategy {
    /// Commits `plate` to `sheet` if it fits, returning whether it did.
    /// A `false` return leaves the sheet untouched.
    pub fn attempt_place(self, sheet: &mut Sheet, plate: &Plate) -> bool {
        match self {
            Strategy::RectangleSplit => attempt_place(sheet, plate),
            Strategy::ShelfPacking => shelf::attempt_place(sheet, plate),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::RectangleSplit => write!(f, "rectangle-split"),
            Strategy::ShelfPacking => write!(f, "shelf"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredRegion {
    pub region: FreeRegion,
    pub rotated: bool,
    pub waste: u64,
}

/// Picks the free region leaving the least unused area around `plate`.
/// On equal waste the region enumerated first wins.
pub fn find_best(free: &[FreeRegion], plate: &Plate) -> Option<ScoredRegion> {
    let mut best: Option<ScoredRegion> = None;

    for &region in free {
        let FitResult::Fits { rotated } = fit::evaluate(plate, region.rect) else {
            continue;
        };
        let waste = region.rect.area() - plate.area();
        if best.is_none_or(|b| waste < b.waste) {
            best = Some(ScoredRegion {
                region,
                rotated,
                waste,
            });
        }
    }

    best
}

/// Rectangle-splitting best-fit placement on one sheet.
pub fn attempt_place(sheet: &mut Sheet, plate: &Plate) -> bool {
    let free = free_regions(sheet);
    let Some(best) = find_best(&free, plate) else {
        return false;
    };

    let placement = Placement::new(plate, best.region.x, best.region.y, best.rotated);
    tracing::debug!(
        sheet = sheet.name(),
        plate = plate.label(),
        x = placement.x,
        y = placement.y,
        rotated = placement.rotated,
        waste = best.waste,
        "placed plate"
    );
    sheet.commit(placement);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate(label: &str, w: u32, h: u32, grain: bool) -> Plate {
        Plate::new(label, w, h, grain).unwrap()
    }

    #[test]
    fn test_place_single_plate() {
        let mut sheet = Sheet::new("S", 100, 100).unwrap();
        assert!(attempt_place(&mut sheet, &plate("A", 50, 30, false)));
        let p = &sheet.placements()[0];
        assert_eq!((p.x, p.y, p.width, p.height), (0, 0, 50, 30));
        assert!(!p.rotated);
    }

    #[test]
    fn test_plate_too_large_leaves_sheet_untouched() {
        let mut sheet = Sheet::new("S", 100, 100).unwrap();
        assert!(!attempt_place(&mut sheet, &plate("A", 200, 50, false)));
        assert!(sheet.placements().is_empty());
    }

    #[test]
    fn test_rotation_fit() {
        let mut sheet = Sheet::new("S", 100, 50).unwrap();
        assert!(!attempt_place(&mut sheet, &plate("G", 50, 100, true)));
        assert!(attempt_place(&mut sheet, &plate("R", 50, 100, false)));
        let p = &sheet.placements()[0];
        assert!(p.rotated);
        assert_eq!((p.width, p.height), (100, 50));
    }

    #[test]
    fn test_picks_least_waste() {
        let free = vec![
            FreeRegion::new(0, 0, 100, 100),
            FreeRegion::new(200, 0, 60, 60),
            FreeRegion::new(300, 0, 80, 80),
        ];
        let best = find_best(&free, &plate("A", 50, 50, false)).unwrap();
        assert_eq!(best.region, FreeRegion::new(200, 0, 60, 60));
        assert_eq!(best.waste, 1100);
    }

    #[test]
    fn test_tie_goes_to_first_region() {
        let free = vec![
            FreeRegion::new(600, 0, 600, 2400),
            FreeRegion::new(300, 800, 900, 1600),
        ];
        let best = find_best(&free, &plate("B", 300, 800, false)).unwrap();
        assert_eq!(best.region.x, 600);
        assert_eq!(best.region.y, 0);

        let reversed: Vec<FreeRegion> = free.into_iter().rev().collect();
        let best = find_best(&reversed, &plate("B", 300, 800, false)).unwrap();
        assert_eq!((best.region.x, best.region.y), (300, 800));
    }

    #[test]
    fn test_fill_exact() {
        let mut sheet = Sheet::new("S", 100, 100).unwrap();
        for label in ["A", "B", "C", "D"] {
            assert!(attempt_place(&mut sheet, &plate(label, 50, 50, false)));
        }
        assert!(!attempt_place(&mut sheet, &plate("E", 1, 1, false)));
        assert!(free_regions(&sheet).is_empty());
    }

    #[test]
    fn test_strategy_parses_from_json() {
        let s: Strategy = serde_json::from_str(r#""rectangle-split""#).unwrap();
        assert_eq!(s, Strategy::RectangleSplit);
        let s: Strategy = serde_json::from_str(r#""shelf""#).unwrap();
        assert_eq!(s, Strategy::ShelfPacking);
        let s: Strategy = serde_json::from_str(r#""shelf-packing""#).unwrap();
        assert_eq!(s, Strategy::ShelfPacking);
        assert_eq!(Strategy::default(), Strategy::RectangleSplit);
    }

    #[test]
    fn test_strategy_serializes_as_displayed() {
        for strategy in [Strategy::RectangleSplit, Strategy::ShelfPacking] {
            assert_eq!(
                serde_json::to_string(&strategy).unwrap(),
                format!("\"{strategy}\"")
            );
        }
    }
}
