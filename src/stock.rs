use serde::{Deserialize, Serialize};

use crate::error::{NestError, Result};
use crate::types::{Rect, Sheet};

pub const FULL_SHEET: Rect = Rect { w: 1200, h: 2400 };

/// Upper bound on sheets (offcuts plus full sheets) in one run.
pub const MAX_SHEETS: u64 = 500;

/// Available stock for one run. Offcuts are consumed before full sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    pub full_sheets: u32,
    pub sheet_size: Rect,
    pub offcuts: Vec<Rect>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            full_sheets: 2,
            sheet_size: FULL_SHEET,
            offcuts: Vec::new(),
        }
    }
}

impl StockConfig {
    pub fn sheet_count(&self) -> u64 {
        self.offcuts.len() as u64 + u64::from(self.full_sheets)
    }

    /// Rejects stock lists larger than [`MAX_SHEETS`] before anything is allocated.
    pub fn check_limit(&self) -> Result<()> {
        let count = self.sheet_count();
        if count > MAX_SHEETS {
            return Err(NestError::Configuration(format!(
                "{count} sheets requested, the limit is {MAX_SHEETS}"
            )));
        }
        Ok(())
    }

    /// Builds fresh sheets in consumption order: `Offcut-1..n` then `Sheet-1..n`.
    pub fn build_sheets(&self) -> Result<Vec<Sheet>> {
        self.check_limit()?;
        let offcuts = self
            .offcuts
            .iter()
            .enumerate()
            .map(|(i, r)| Sheet::new(format!("Offcut-{}", i + 1), r.w, r.h));
        let full = (0..self.full_sheets).map(|i| {
            Sheet::new(
                format!("Sheet-{}", i + 1),
                self.sheet_size.w,
                self.sheet_size.h,
            )
        });
        offcuts.chain(full).collect()
    }
}
