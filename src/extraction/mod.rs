//! Field tool kit extraction
//!
//! Reads the fixed-but-drifting workbook layout into typed records:
//!
//! ```text
//! Workbook ─┬─ General Info ──► job_info      ──► JobRecord
//!           ├─ SP1..SP10    ──► service_plan  ──► Vec<DailyOperationRecord>
//!           ├─ FT1..FT15    ──► equipment     ──► EquipmentUsage
//!           ├─ Mill Data    ──► drill_ops     ──► Vec<DrillOperation>
//!           └─ CT Milling   ──► drill_ops     ──► Vec<DrillOperation>
//! ```
//!
//! Every extractor is total: a missing or unreadable sheet yields that
//! section's default data set plus an [`ExtractionNote`], never an error.
//! Placeholder values come from [`synth`] and are tagged on each record.

pub mod drill_ops;
pub mod equipment;
pub mod grid;
pub mod job_info;
pub mod layout;
pub mod service_plan;
pub mod synth;
pub mod workbook;

pub use grid::{serial_to_date, CellRef, CellValue, Grid};
pub use synth::Synthesizer;
pub use workbook::Workbook;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::types::ExtractionNote;

/// Failure to read a workbook or one of its sheets.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to open workbook {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("sheet `{0}` not found")]
    MissingSheet(String),

    #[error("sheet `{sheet}` could not be read: {reason}")]
    MalformedSheet { sheet: String, reason: String },

    #[error("workbook parsing exceeded {0:?}")]
    Timeout(Duration),

    #[error("workbook loader task failed: {0}")]
    Loader(String),
}

impl ExtractionError {
    /// Note recorded when a section falls back to its default data set.
    pub fn to_note(&self) -> ExtractionNote {
        use crate::types::NoteKind;
        match self {
            Self::MissingSheet(sheet) => ExtractionNote::new(
                NoteKind::MissingSheet,
                Some(sheet),
                "sheet not found; section defaults used",
            ),
            Self::MalformedSheet { sheet, reason } => ExtractionNote::new(
                NoteKind::MalformedSheet,
                Some(sheet),
                format!("sheet unreadable ({reason}); section defaults used"),
            ),
            other => ExtractionNote::new(NoteKind::DemoFallback, None, other.to_string()),
        }
    }
}

/// Section value plus the notes gathered while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub value: T,
    pub notes: Vec<ExtractionNote>,
}

impl<T> Extracted<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            notes: Vec::new(),
        }
    }

    pub fn with_notes(value: T, notes: Vec<ExtractionNote>) -> Self {
        Self { value, notes }
    }

    pub fn note(&mut self, note: ExtractionNote) {
        self.notes.push(note);
    }
}
