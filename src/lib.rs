//! Nests rectangular plates onto stock sheets and offcuts.
//!
//! [`nest`] walks plates largest-first and commits each to the first sheet
//! that accepts it under the chosen [`Strategy`]. Plates that fit nowhere
//! come back in [`NestReport::unplaced`].

pub mod allocator;
pub mod error;
pub mod fit;
pub mod free_space;
pub mod ingest;
pub mod labels;
pub mod nester;
pub mod render;
pub mod shelf;
pub mod stock;
pub mod types;

pub use allocator::Strategy;
pub use error::{NestError, Result};
pub use nester::{NestReport, nest};
pub use stock::StockConfig;
pub use types::{FreeRegion, Placement, Plate, PlateRecord, Rect, Sheet};
