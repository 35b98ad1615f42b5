//! Cell lookup over an unstructured rectangular sheet grid
//!
//! Field tool kit sheets are hand-formatted forms, not tables: a value sits
//! next to (or under) a free-text label whose position drifts between kit
//! revisions. [`Grid`] supports both lookup strategies:
//!
//! - **Label search** ([`Grid::find_labeled`]): row-major scan for the first
//!   cell containing the label (case-insensitive), then the value to its
//!   right, else the value below it.
//! - **Fixed coordinate** ([`Grid::cell_at`] / [`Grid::cell_at_ref`]).
//!
//! Absence is always `None`, never an error. Lookups return raw values;
//! callers convert serial dates explicitly with [`serial_to_date`].

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Seconds in one spreadsheet day.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Serial number of the phantom 1900-02-29 carried over from Lotus 1-2-3.
const PHANTOM_LEAP_DAY: i64 = 60;

// ============================================================================
// Serial Dates
// ============================================================================

/// Convert a spreadsheet day serial to a calendar date.
///
/// Uses the 1899-12-30 epoch with the 1900 leap-year bug reproduced:
/// serial 1 is 1900-01-01 and serial 61 is 1900-03-01. Serial 60 (the
/// non-existent 1900-02-29) maps to 1900-02-28. The fractional time-of-day
/// part is truncated. Returns `None` for serials below 1 or non-finite input.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let days = serial.trunc() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;

    match days {
        // Before the phantom leap day every serial is one day "late"
        1..=59 => epoch.checked_add_days(Days::new(u64::try_from(days + 1).ok()?)),
        PHANTOM_LEAP_DAY => NaiveDate::from_ymd_opt(1900, 2, 28),
        _ => epoch.checked_add_days(Days::new(u64::try_from(days).ok()?)),
    }
}

/// Time-of-day carried in the fractional part of a serial.
pub fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let secs = (serial.fract() * SECONDS_PER_DAY).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

// ============================================================================
// Cell Values
// ============================================================================

/// Raw, typed cell content.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Spreadsheet serial (days since epoch, fraction = time of day)
    DateTime(f64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whitespace-only text counts as an empty cell.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// Display form used for label matching and pattern scans.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Numeric value; numeric text (with optional thousands separators) parses too.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            Self::Bool(_) | Self::DateTime(_) => None,
        }
        .filter(|n| n.is_finite())
    }

    /// Calendar date from a serial, a datetime cell or date-like text.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::DateTime(serial) | Self::Number(serial) => serial_to_date(*serial),
            Self::Text(s) => parse_date_text(s.trim()),
            Self::Bool(_) => None,
        }
    }

    /// Time of day from `H:MM` text or a serial's fractional part.
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::DateTime(serial) => serial_to_time(*serial),
            Self::Number(n) if (0.0..1.0).contains(n) => serial_to_time(*n),
            Self::Text(s) => parse_time_text(s.trim()),
            Self::Number(_) | Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::DateTime(serial) => {
                let time = serial_to_time(*serial);
                match (serial_to_date(*serial), time) {
                    // Time-only cell
                    (None, Some(t)) => write!(f, "{}", t.format("%H:%M")),
                    (Some(d), Some(t)) if t.num_seconds_from_midnight() > 0 => {
                        write!(f, "{} {}", d.format("%Y-%m-%d"), t.format("%H:%M"))
                    }
                    (Some(d), _) => write!(f, "{}", d.format("%Y-%m-%d")),
                    (None, None) => write!(f, "{serial}"),
                }
            }
        }
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_time_text(s: &str) -> Option<NaiveTime> {
    const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%I:%M %p"];
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

// ============================================================================
// Cell References
// ============================================================================

/// Zero-based (row, column) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse A1 notation (`"C12"` → row 11, col 2).
    pub fn parse(a1: &str) -> Option<Self> {
        let a1 = a1.trim();
        let split = a1.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = a1.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let col = letters
            .chars()
            .try_fold(0usize, |acc, c| {
                let v = (c.to_ascii_uppercase() as usize).checked_sub('A' as usize)? + 1;
                acc.checked_mul(26)?.checked_add(v)
            })?
            .checked_sub(1)?;
        let row = digits.parse::<usize>().ok()?.checked_sub(1)?;
        Some(Self { row, col })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.col + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            #[allow(clippy::cast_possible_truncation)]
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        let col: String = letters.into_iter().rev().collect();
        write!(f, "{}{}", col, self.row + 1)
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Rectangular sheet content anchored at A1; rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Option<CellValue>>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Option<CellValue>>>) -> Self {
        Self { rows }
    }

    /// Build from text rows; empty strings become empty cells.
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|s| {
                            let s = s.as_ref();
                            (!s.is_empty()).then(|| CellValue::text(s))
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// Place a value, growing the grid as needed.
    pub fn set(&mut self, at: CellRef, value: CellValue) {
        if self.rows.len() <= at.row {
            self.rows.resize_with(at.row + 1, Vec::new);
        }
        let row = &mut self.rows[at.row];
        if row.len() <= at.col {
            row.resize(at.col + 1, None);
        }
        row[at.col] = Some(value);
    }

    /// Builder-style [`Grid::set`] taking A1 notation; invalid references are ignored.
    #[must_use]
    pub fn with(mut self, a1: &str, value: CellValue) -> Self {
        if let Some(at) = CellRef::parse(a1) {
            self.set(at, value);
        }
        self
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True when no cell holds a non-blank value.
    pub fn is_empty(&self) -> bool {
        self.cells().next().is_none()
    }

    /// Value at a coordinate; `None` when out of bounds, empty or blank.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(Option::as_ref)
            .filter(|v| !v.is_blank())
    }

    pub fn cell_at_ref(&self, at: CellRef) -> Option<&CellValue> {
        self.cell_at(at.row, at.col)
    }

    /// Non-blank cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, cell)| {
                cell.as_ref()
                    .filter(|v| !v.is_blank())
                    .map(|v| (CellRef::new(r, c), v))
            })
        })
    }

    /// Position of the first cell whose text contains `label` (case-insensitive).
    pub fn find_label(&self, label: &str) -> Option<CellRef> {
        let needle = label.to_lowercase();
        self.cells()
            .find(|(_, v)| v.as_text().to_lowercase().contains(&needle))
            .map(|(at, _)| at)
    }

    /// Value next to the first occurrence of `label`: right, else below.
    ///
    /// Only the first occurrence governs; a label with no adjacent value is
    /// "not found" even if the text appears again further down.
    pub fn find_labeled(&self, label: &str) -> Option<&CellValue> {
        let at = self.find_label(label)?;
        self.cell_at(at.row, at.col + 1)
            .or_else(|| self.cell_at(at.row + 1, at.col))
    }

    /// [`Grid::find_labeled`] over several label spellings, first hit wins.
    pub fn find_any_labeled(&self, labels: &[&str]) -> Option<&CellValue> {
        labels.iter().find_map(|label| self.find_labeled(label))
    }
}
