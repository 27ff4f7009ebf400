use serde::Serialize;

use crate::types::Sheet;

/// One printable label per committed placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub sheet: String,
    pub plate: String,
    pub width: u32,
    pub height: u32,
    pub area: u64,
    pub grain_locked: bool,
}

/// Flattens every placement across `sheets`, sheet by sheet in commit order.
pub fn labels(sheets: &[Sheet]) -> Vec<Label> {
    sheets
        .iter()
        .flat_map(|sheet| {
            sheet.placements().iter().map(|p| Label {
                sheet: sheet.name().to_string(),
                plate: p.source_label.clone(),
                width: p.width,
                height: p.height,
                area: p.area(),
                grain_locked: p.grain_locked,
            })
        })
        .collect()
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Door: {}", self.plate)?;
        writeln!(f, "Size: {}x{}", self.width, self.height)?;
        writeln!(f, "Area: {}", self.area)?;
        write!(f, "Sheet: {}", self.sheet)?;
        if self.grain_locked {
            write!(f, "\nGrain: locked")?;
        }
        Ok(())
    }
}
