//! Drillout Analytics: field tool kit extraction and job analysis
//!
//! Reads drillout field tool kit workbooks (job info, service-plan day
//! sheets, tool sheets, mill and coiled-tubing data) and produces a complete
//! frequency/efficiency analysis for the operations dashboard.
//!
//! ## Architecture
//!
//! - **Extraction**: label-first cell lookup with fixed-coordinate fallback,
//!   per-section defaults and tagged placeholder synthesis
//! - **Metrics**: pure aggregates over the extracted records
//! - **Advisory**: fixed-order rule table producing themed recommendations
//! - **Assembler**: orchestration with demo fallback and a parse deadline
//! - **Export**: JSON report and CSV tables

pub mod advisory;
pub mod assembler;
pub mod config;
pub mod demo;
pub mod export;
pub mod extraction;
pub mod metrics;
pub mod types;

// Re-export configuration
pub use config::{AnalysisConfig, ConfigError};

// Re-export entry points
pub use assembler::{
    analyze_file, analyze_file_bounded, analyze_workbook, demo_fallback, load_workbook_bounded,
    Sections,
};

// Re-export extraction building blocks
pub use extraction::{CellRef, CellValue, ExtractionError, Grid, Workbook};

// Re-export commonly used types
pub use types::{
    AnalysisResult, DailyOperationRecord, DataSource, DrillOperation, EquipmentRecord,
    EquipmentUsage, ExtractionNote, JobRecord, NoteKind, Recommendation, Severity, ToolId,
};
