use serde::Serialize;

use crate::allocator::Strategy;
use crate::error::{NestError, Result};
use crate::types::{Plate, Sheet};

/// Outcome of one nesting run. Committed placements live on the sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestReport {
    /// Plates that fit on no sheet, in the order they were attempted.
    pub unplaced: Vec<Plate>,
    pub placed: usize,
}

impl NestReport {
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Full sheets to buy so every plate can be cut, counted one per
    /// unplaced plate.
    pub fn extra_sheets_needed(&self) -> usize {
        self.unplaced.len()
    }
}

/// Nests `plates` onto `sheets`, trying sheets in the order given.
///
/// Plates are attempted largest side first (stable, so equal plates keep
/// their input order). Each plate goes on the first sheet that accepts it;
/// a plate no sheet accepts is reported in [`NestReport::unplaced`].
///
/// Sheets are mutated in place and nothing is rolled back. Placements already
/// on a sheet are treated as permanent occupancy, so calling this again on
/// the same sheets nests incrementally around the earlier run.
///
/// # Errors
///
/// [`NestError::Configuration`] when `sheets` is empty or a sheet has a zero
/// dimension. No sheet is touched in that case.
pub fn nest(plates: &[Plate], sheets: &mut [Sheet], strategy: Strategy) -> Result<NestReport> {
    if sheets.is_empty() {
        return Err(NestError::Configuration("no sheets supplied".to_string()));
    }
    if let Some(bad) = sheets.iter().find(|s| s.size().is_empty()) {
        return Err(NestError::Configuration(format!(
            "sheet '{}' has non-positive dimensions {}",
            bad.name(),
            bad.size()
        )));
    }

    let mut order: Vec<&Plate> = plates.iter().collect();
    order.sort_by_key(|p| std::cmp::Reverse(p.longest_side()));

    let mut unplaced = Vec::new();
    let mut placed = 0;
    for plate in order {
        if sheets
            .iter_mut()
            .any(|sheet| strategy.attempt_place(sheet, plate))
        {
            placed += 1;
        } else {
            tracing::debug!(plate = plate.label(), size = %plate.size(), "plate fits no sheet");
            unplaced.push(plate.clone());
        }
    }

    tracing::info!(
        %strategy,
        plates = plates.len(),
        placed,
        unplaced = unplaced.len(),
        sheets_used = sheets.iter().filter(|s| s.is_used()).count(),
        "nesting finished"
    );

    Ok(NestReport { unplaced, placed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate(label: &str, w: u32, h: u32, grain: bool) -> Plate {
        Plate::new(label, w, h, grain).unwrap()
    }

    #[test]
    fn test_no_sheets_is_configuration_error() {
        let plates = vec![plate("D01", 300, 800, false)];
        let err = nest(&plates, &mut [], Strategy::RectangleSplit).unwrap_err();
        assert!(matches!(err, NestError::Configuration(_)));
    }

    #[test]
    fn test_no_plates() {
        let mut sheets = vec![Sheet::new("Sheet-1", 1200, 2400).unwrap()];
        let report = nest(&[], &mut sheets, Strategy::RectangleSplit).unwrap();
        assert!(report.all_placed());
        assert_eq!(report.placed, 0);
        assert!(!sheets[0].is_used());
    }

    #[test]
    fn test_largest_first() {
        let plates = vec![plate("small", 100, 100, true), plate("big", 1200, 1000, true)];
        let mut sheets = vec![Sheet::new("Sheet-1", 1200, 2400).unwrap()];
        nest(&plates, &mut sheets, Strategy::RectangleSplit).unwrap();
        let labels: Vec<&str> = sheets[0]
            .placements()
            .iter()
            .map(|p| p.source_label.as_str())
            .collect();
        assert_eq!(labels, vec!["big", "small"]);
    }

    #[test]
    fn test_equal_sizes_keep_input_order() {
        let plates = vec![
            plate("first", 300, 800, false),
            plate("second", 800, 300, false),
            plate("third", 300, 800, false),
        ];
        let mut sheets = vec![Sheet::new("Sheet-1", 1200, 2400).unwrap()];
        nest(&plates, &mut sheets, Strategy::RectangleSplit).unwrap();
        let labels: Vec<&str> = sheets[0]
            .placements()
            .iter()
            .map(|p| p.source_label.as_str())
            .collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_earlier_sheets_consumed_first() {
        let plates = vec![plate("D01", 300, 900, true), plate("D02", 300, 900, true)];
        let mut sheets = vec![
            Sheet::new("Offcut-1", 300, 900).unwrap(),
            Sheet::new("Sheet-1", 1200, 2400).unwrap(),
        ];
        let report = nest(&plates, &mut sheets, Strategy::RectangleSplit).unwrap();
        assert!(report.all_placed());
        assert_eq!(sheets[0].placements()[0].source_label, "D01");
        assert_eq!(sheets[1].placements()[0].source_label, "D02");
    }

    #[test]
    fn test_oversized_plate_is_unplaced() {
        let plates = vec![plate("huge", 3000, 3000, false), plate("ok", 300, 800, false)];
        let mut sheets = vec![
            Sheet::new("Offcut-1", 300, 900).unwrap(),
            Sheet::new("Sheet-1", 1200, 2400).unwrap(),
        ];
        let report = nest(&plates, &mut sheets, Strategy::ShelfPacking).unwrap();
        assert_eq!(report.placed, 1);
        assert_eq!(report.unplaced.len(), 1);
        assert_eq!(report.unplaced[0].label(), "huge");
        assert_eq!(report.extra_sheets_needed(), 1);
    }

    #[test]
    fn test_rerun_treats_previous_placements_as_occupied() {
        let plates = vec![plate("A", 1200, 2400, true)];
        let mut sheets = vec![Sheet::new("Sheet-1", 1200, 2400).unwrap()];
        let first = nest(&plates, &mut sheets, Strategy::RectangleSplit).unwrap();
        assert!(first.all_placed());
        let second = nest(&plates, &mut sheets, Strategy::RectangleSplit).unwrap();
        assert_eq!(second.unplaced.len(), 1);
        assert_eq!(sheets[0].placements().len(), 1);
    }
}
