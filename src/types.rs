use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{NestError, Result};

/// Accepts any JSON number that is a non-negative whole value (`300` or `300.0`).
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub w: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// A piece to be cut. Immutable once constructed; where it ends up is
/// recorded on a [`Placement`] owned by the receiving [`Sheet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PlateRecord")]
pub struct Plate {
    label: String,
    width: u32,
    height: u32,
    grain_locked: bool,
}

/// Unvalidated wire form of a [`Plate`]. Convert with `Plate::try_from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateRecord {
    pub label: String,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub height: u32,
    #[serde(default, alias = "grain")]
    pub grain_locked: bool,
}

impl TryFrom<PlateRecord> for Plate {
    type Error = NestError;

    fn try_from(record: PlateRecord) -> Result<Self> {
        Plate::new(record.label, record.width, record.height, record.grain_locked)
    }
}

impl Plate {
    pub fn new(
        label: impl Into<String>,
        width: u32,
        height: u32,
        grain_locked: bool,
    ) -> Result<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(NestError::invalid_plate(&label, "label must not be empty"));
        }
        if width == 0 {
            return Err(NestError::invalid_plate(&label, "width must be non-zero"));
        }
        if height == 0 {
            return Err(NestError::invalid_plate(&label, "height must be non-zero"));
        }
        Ok(Self {
            label,
            width,
            height,
            grain_locked,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn grain_locked(&self) -> bool {
        self.grain_locked
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> u64 {
        self.size().area()
    }

    /// The larger of the two sides, used to order plates largest-first.
    pub fn longest_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// A committed position and orientation of one plate on one sheet.
///
/// `x`/`y` are the top-left corner in sheet-local coordinates and
/// `width`/`height` are the post-rotation dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub source_label: String,
    pub grain_locked: bool,
    pub rotated: bool,
}

impl Placement {
    pub fn new(plate: &Plate, x: u32, y: u32, rotated: bool) -> Self {
        let size = if rotated {
            plate.size().rotated()
        } else {
            plate.size()
        };
        Self {
            x,
            y,
            width: size.w,
            height: size.h,
            source_label: plate.label().to_string(),
            grain_locked: plate.grain_locked(),
            rotated,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> u64 {
        self.rect().area()
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the two rectangles share interior area. Touching edges do not count.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// An axis-aligned rectangle of currently unused sheet area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRegion {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

impl FreeRegion {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            rect: Rect::new(w, h),
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.rect.w
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.rect.h
    }

    pub fn overlaps(&self, p: &Placement) -> bool {
        p.x < self.right() && self.x < p.right() && p.y < self.bottom() && self.y < p.bottom()
    }
}

/// A stock rectangle (full sheet or offcut) that accumulates placements.
///
/// Occupied and free area are always derived from `placements`; nothing
/// else is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    name: String,
    width: u32,
    height: u32,
    placements: Vec<Placement>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Result<Self> {
        let name = name.into();
        if width == 0 || height == 0 {
            return Err(NestError::Configuration(format!(
                "sheet '{name}' has non-positive dimensions {width}x{height}"
            )));
        }
        Ok(Self {
            name,
            width,
            height,
            placements: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn is_used(&self) -> bool {
        !self.placements.is_empty()
    }

    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(Placement::area).sum()
    }

    pub fn waste_area(&self) -> u64 {
        self.size().area() - self.used_area()
    }

    pub fn waste_percent(&self) -> f64 {
        let area = self.size().area();
        if area == 0 {
            return 0.0;
        }
        self.waste_area() as f64 / area as f64 * 100.0
    }

    /// Appends a placement. Placements are never removed or edited afterwards.
    pub(crate) fn commit(&mut self, placement: Placement) {
        debug_assert!(placement.right() <= self.width && placement.bottom() <= self.height);
        debug_assert!(!self.placements.iter().any(|p| p.overlaps(&placement)));
        self.placements.push(placement);
    }
}

/// Waste across every sheet that received at least one placement.
pub fn total_waste_percent(sheets: &[Sheet]) -> f64 {
    let used: Vec<&Sheet> = sheets.iter().filter(|s| s.is_used()).collect();
    let stock_area: u64 = used.iter().map(|s| s.size().area()).sum();
    if stock_area == 0 {
        return 0.0;
    }
    let placed: u64 = used.iter().map(|s| s.used_area()).sum();
    (stock_area - placed) as f64 / stock_area as f64 * 100.0
}
