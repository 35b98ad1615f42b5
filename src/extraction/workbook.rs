//! Workbook loading
//!
//! Opens `.xlsx` / `.xlsm` / `.xls` / `.ods` through calamine and eagerly
//! materializes every sheet into an A1-anchored [`Grid`]. The file handle is
//! released before any section is extracted.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::{debug, warn};

use super::grid::{CellValue, Grid};
use super::ExtractionError;

/// A sheet as loaded: either its grid or the reason it could not be read.
#[derive(Debug, Clone)]
struct Sheet {
    name: String,
    content: Result<Grid, String>,
}

/// All sheets of one workbook, looked up by trimmed, case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Open and fully read a workbook file.
    ///
    /// Only an unopenable container is an error; individual sheets that fail
    /// to parse are recorded and surface later as malformed sections.
    pub fn open(path: &Path) -> Result<Self, ExtractionError> {
        // Malformed containers have been known to panic inside the reader
        std::panic::catch_unwind(|| Self::read_all(path)).unwrap_or_else(|_| {
            warn!(path = %path.display(), "Spreadsheet reader panicked");
            Err(ExtractionError::Open {
                path: path.to_path_buf(),
                reason: "spreadsheet reader panicked".to_string(),
            })
        })
    }

    fn read_all(path: &Path) -> Result<Self, ExtractionError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| ExtractionError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let names = workbook.sheet_names().to_owned();
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let content = match workbook.worksheet_range(&name) {
                Ok(range) => Ok(grid_from_range(&range)),
                Err(e) => {
                    warn!(sheet = %name, error = %e, "Sheet could not be read");
                    Err(e.to_string())
                }
            };
            sheets.push(Sheet { name, content });
        }

        debug!(path = %path.display(), sheets = sheets.len(), "Workbook loaded");
        Ok(Self { sheets })
    }

    /// Assemble a workbook from in-memory grids.
    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, Grid)>,
        S: Into<String>,
    {
        Self {
            sheets: sheets
                .into_iter()
                .map(|(name, grid)| Sheet {
                    name: name.into(),
                    content: Ok(grid),
                })
                .collect(),
        }
    }

    /// Register a sheet that exists but could not be parsed.
    #[must_use]
    pub fn with_malformed_sheet(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.sheets.push(Sheet {
            name: name.into(),
            content: Err(reason.into()),
        });
        self
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Grid of the named sheet.
    ///
    /// Matching ignores surrounding whitespace and case, so `" CT Milling"`
    /// in a field kit resolves for `"CT Milling"`.
    pub fn sheet(&self, name: &str) -> Result<&Grid, ExtractionError> {
        let sheet = self
            .find(name)
            .ok_or_else(|| ExtractionError::MissingSheet(name.to_string()))?;
        sheet
            .content
            .as_ref()
            .map_err(|reason| ExtractionError::MalformedSheet {
                sheet: sheet.name.clone(),
                reason: reason.clone(),
            })
    }

    fn find(&self, name: &str) -> Option<&Sheet> {
        let wanted = normalize_sheet_name(name);
        self.sheets
            .iter()
            .find(|s| normalize_sheet_name(&s.name) == wanted)
    }
}

fn normalize_sheet_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Re-anchor a calamine range at A1.
///
/// Calamine ranges start at the first used cell; lookups by fixed
/// coordinate need absolute positions.
fn grid_from_range(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows: Vec<Vec<Option<CellValue>>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![None; start_col];
        cells.extend(row.iter().map(convert_value));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn convert_value(value: &Data) -> Option<CellValue> {
    match value {
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        #[allow(clippy::cast_precision_loss)]
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::DateTime(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(_) | Data::Empty => None,
    }
}
