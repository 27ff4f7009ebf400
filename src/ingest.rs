//! Plate lists from CSV exports.
//!
//! Header names are matched loosely: case, surrounding whitespace, spaces,
//! underscores and hyphens are ignored, and each field accepts several
//! aliases (`Door No`, `W`, `Plate_Height`, `Grain-Req`, ...). Columns that
//! match no field are ignored.

use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::error::{NestError, Result};
use crate::types::Plate;

/// Field name and the normalised header names that map onto it.
const COLUMN_MAP: [(&str, &[&str]); 4] = [
    ("label", &["door", "doorno", "doornumber", "d", "doors"]),
    ("width", &["width", "w", "platewidth"]),
    ("height", &["height", "h", "plateheight"]),
    ("grain", &["grain", "graindirection", "grainrequired", "g", "grainreq"]),
];

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    width: String,
    height: String,
    grain: String,
}

pub fn normalise_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect()
}

/// Renames the first header matching each field to the field name and blanks
/// every other header.
fn resolve_headers(raw: &StringRecord) -> Result<StringRecord> {
    let normalised: Vec<String> = raw.iter().map(normalise_header).collect();
    let mut resolved = vec![""; normalised.len()];
    let mut missing = Vec::new();

    for (field, aliases) in COLUMN_MAP {
        match normalised.iter().position(|h| aliases.contains(&h.as_str())) {
            Some(index) => resolved[index] = field,
            None => missing.push(field.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(NestError::MissingColumns {
            missing,
            found: normalised,
        });
    }
    Ok(StringRecord::from(resolved))
}

/// Accepts `300` and `300.0`, like the JSON number form.
fn parse_dimension(value: &str) -> std::result::Result<u32, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if parsed < 0.0 || parsed.fract() != 0.0 || parsed > u32::MAX as f64 {
        return Err(format!("'{value}' is not a non-negative whole number"));
    }
    Ok(parsed as u32)
}

pub fn parse_grain(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

fn row_to_plate(row: CsvRow, line: usize) -> Result<Plate> {
    let in_row =
        |reason: String| NestError::invalid_plate(&row.label, format!("line {line}: {reason}"));
    let width = parse_dimension(&row.width).map_err(|e| in_row(format!("width {e}")))?;
    let height = parse_dimension(&row.height).map_err(|e| in_row(format!("height {e}")))?;

    Plate::new(row.label.as_str(), width, height, parse_grain(&row.grain)).map_err(|e| match e {
        NestError::InvalidPlate { reason, .. } => in_row(reason),
        other => other,
    })
}

/// Reads plates from CSV with a header row.
pub fn read_plates<R: io::Read>(reader: R) -> Result<Vec<Plate>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = resolve_headers(reader.headers()?)?;

    let mut plates = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row: CsvRow = record?.deserialize(Some(&headers))?;
        plates.push(row_to_plate(row, i + 2)?);
    }

    tracing::debug!(count = plates.len(), "read plates from csv");
    Ok(plates)
}

pub fn load_plates(path: &Path) -> Result<Vec<Plate>> {
    let file = std::fs::File::open(path)
        .map_err(|e| NestError::Input(format!("{}: {e}", path.display())))?;
    read_plates(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_normalisation() {
        assert_eq!(normalise_header("  Door No "), "doorno");
        assert_eq!(normalise_header("Plate_Height"), "plateheight");
        assert_eq!(normalise_header("Grain-Req"), "grainreq");
        assert_eq!(normalise_header("door_number"), "doornumber");
    }

    #[test]
    fn test_reads_aliased_columns() {
        let csv = "\
Door No,W,Plate_Height,Grain-Req,Q Reference
D01,300,800,yes,Q-1001
D02,250.0,2100,N,Q-1001
D03,900,300,TRUE,Q-1002
";
        let plates = read_plates(csv.as_bytes()).unwrap();
        assert_eq!(plates.len(), 3);
        assert_eq!(plates[0].label(), "D01");
        assert_eq!((plates[0].width(), plates[0].height()), (300, 800));
        assert!(plates[0].grain_locked());
        assert_eq!(plates[1].width(), 250);
        assert!(!plates[1].grain_locked());
        assert!(plates[2].grain_locked());
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "grain,height,width,door\n0,800,300,D01\n";
        let plates = read_plates(csv.as_bytes()).unwrap();
        assert_eq!(plates[0].size(), crate::types::Rect::new(300, 800));
        assert!(!plates[0].grain_locked());
    }

    #[test]
    fn test_first_matching_column_wins() {
        let csv = "door,width,w,height,grain\nD01,300,999,800,1\n";
        let plates = read_plates(csv.as_bytes()).unwrap();
        assert_eq!(plates[0].width(), 300);
    }

    #[test]
    fn test_grain_values() {
        for value in ["true", "1", "yes", "y", " YES "] {
            assert!(parse_grain(value), "{value}");
        }
        for value in ["false", "0", "no", "", "locked"] {
            assert!(!parse_grain(value), "{value}");
        }
    }

    #[test]
    fn test_missing_columns_lists_detected_headers() {
        let csv = "Door,Plate Width,Notes\nD01,300,x\n";
        let err = read_plates(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            NestError::MissingColumns {
                missing: vec!["height".to_string(), "grain".to_string()],
                found: vec![
                    "door".to_string(),
                    "platewidth".to_string(),
                    "notes".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_invalid_row_names_plate_and_line() {
        let csv = "door,width,height,grain\nD01,300,800,0\nD02,0,800,0\n";
        let err = read_plates(csv.as_bytes()).unwrap_err();
        match err {
            NestError::InvalidPlate { label, reason } => {
                assert_eq!(label, "D02");
                assert!(reason.contains("line 3"), "{reason}");
                assert!(reason.contains("width"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let csv = "door,width,height,grain\nD01,3OO,800,0\n";
        assert!(matches!(
            read_plates(csv.as_bytes()),
            Err(NestError::InvalidPlate { .. })
        ));
    }

    #[test]
    fn test_ragged_row_is_input_error() {
        let csv = "door,width,height,grain\nD01,300\n";
        assert!(matches!(
            read_plates(csv.as_bytes()),
            Err(NestError::Input(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_plates(Path::new("/nonexistent/plates.csv")).unwrap_err();
        assert!(matches!(err, NestError::Input(_)));
    }
}
