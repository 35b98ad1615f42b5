//! Job metadata extraction (`General Info` sheet)

use chrono::NaiveDate;
use tracing::{debug, info};

use super::grid::{CellRef, CellValue, Grid};
use super::layout::{FieldShape, FieldSpec, JOB_FIELDS};
use super::{Extracted, Workbook};
use crate::config::WorkbookConfig;
use crate::demo;
use crate::types::{ExtractionNote, JobField, JobRecord, NoteKind, DEFAULT_DURATION_DAYS};

/// Read job identification and customer data.
///
/// A missing or unreadable sheet yields the section default record. Fields
/// that cannot be located individually take their placeholder and are
/// listed in `defaulted_fields`.
pub fn extract_job_info(workbook: &Workbook, config: &WorkbookConfig) -> Extracted<JobRecord> {
    let sheet = config.general_info_sheet.as_str();
    match workbook.sheet(sheet) {
        Ok(grid) => read_job_record(grid, sheet),
        Err(e) => {
            info!(sheet, error = %e, "Job info unavailable, using section defaults");
            Extracted::with_notes(demo::section_default_job(), vec![e.to_note()])
        }
    }
}

fn read_job_record(grid: &Grid, sheet: &str) -> Extracted<JobRecord> {
    let mut notes = Vec::new();
    let mut defaulted = Vec::new();
    let mut texts: Vec<(JobField, String)> = Vec::new();
    let mut dates: Vec<(JobField, NaiveDate)> = Vec::new();

    for spec in JOB_FIELDS {
        let raw = resolve(grid, spec, sheet, &mut notes);
        match spec.shape {
            FieldShape::Text => {
                let value = raw
                    .map(|v| v.as_text().trim().to_string())
                    .filter(|s| !s.is_empty());
                let value = value.unwrap_or_else(|| {
                    defaulted.push(spec.field);
                    spec.field.placeholder().to_string()
                });
                texts.push((spec.field, value));
            }
            FieldShape::Date => {
                let value = match raw {
                    Some(v) => v.as_date().or_else(|| {
                        notes.push(ExtractionNote::new(
                            NoteKind::DefaultedField,
                            Some(sheet),
                            format!("{} value '{}' is not a date", spec.field.key(), v),
                        ));
                        None
                    }),
                    None => None,
                };
                let value = value.unwrap_or_else(|| {
                    defaulted.push(spec.field);
                    placeholder_date(spec.field)
                });
                dates.push((spec.field, value));
            }
        }
    }

    let text = |field: JobField| {
        texts
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| field.placeholder().to_string())
    };
    let date = |field: JobField| {
        dates
            .iter()
            .find(|(f, _)| *f == field)
            .map_or_else(|| placeholder_date(field), |(_, d)| *d)
    };

    let date_started = date(JobField::DateStarted);
    let date_ended = date(JobField::DateEnded);
    let dates_known =
        !defaulted.contains(&JobField::DateStarted) && !defaulted.contains(&JobField::DateEnded);
    let duration_days = if dates_known {
        JobRecord::duration_between(date_started, date_ended).unwrap_or_else(|| {
            notes.push(ExtractionNote::new(
                NoteKind::DefaultedField,
                Some(sheet),
                format!("job ends ({date_ended}) before it starts ({date_started}); duration defaulted"),
            ));
            DEFAULT_DURATION_DAYS
        })
    } else {
        DEFAULT_DURATION_DAYS
    };

    if !defaulted.is_empty() {
        let keys: Vec<&str> = defaulted.iter().map(|f| f.key()).collect();
        debug!(sheet, fields = ?keys, "Job fields defaulted");
        notes.push(ExtractionNote::new(
            NoteKind::DefaultedField,
            Some(sheet),
            format!("{} field(s) defaulted: {}", keys.len(), keys.join(", ")),
        ));
    }

    let record = JobRecord {
        customer_name: text(JobField::CustomerName),
        ticket_number: text(JobField::TicketNumber),
        job_type: text(JobField::JobType),
        well_number: text(JobField::WellNumber),
        lease: text(JobField::Lease),
        county: text(JobField::County),
        rig_name: text(JobField::RigName),
        afe_po: text(JobField::AfePo),
        date_started,
        date_ended,
        day_supervisor: text(JobField::DaySupervisor),
        night_supervisor: text(JobField::NightSupervisor),
        duration_days,
        defaulted_fields: defaulted,
    };

    info!(
        ticket = %record.ticket_number,
        customer = %record.customer_name,
        duration_days = record.duration_days,
        "Job info extracted"
    );
    Extracted::with_notes(record, notes)
}

/// Locate a field by label first, then by its fixed coordinate.
///
/// Records a layout-shift note when only the coordinate matched or when the
/// two disagree; the label value wins a disagreement.
fn resolve<'g>(
    grid: &'g Grid,
    spec: &FieldSpec,
    sheet: &str,
    notes: &mut Vec<ExtractionNote>,
) -> Option<&'g CellValue> {
    let labeled = grid.find_any_labeled(spec.labels);
    let fixed_at = spec.fallback.and_then(CellRef::parse);
    let fixed = fixed_at.and_then(|at| grid.cell_at_ref(at));

    match (labeled, fixed, fixed_at) {
        (Some(l), Some(f), Some(at)) if l.as_text().trim() != f.as_text().trim() => {
            notes.push(ExtractionNote::new(
                NoteKind::LayoutShift,
                Some(sheet),
                format!(
                    "{}: label gives '{}' but {} holds '{}'; label value used",
                    spec.field.key(),
                    l,
                    at,
                    f
                ),
            ));
            Some(l)
        }
        (Some(l), _, _) => Some(l),
        (None, Some(f), Some(at)) => {
            notes.push(ExtractionNote::new(
                NoteKind::LayoutShift,
                Some(sheet),
                format!("{}: label not found, read fixed cell {}", spec.field.key(), at),
            ));
            Some(f)
        }
        _ => None,
    }
}

fn placeholder_date(field: JobField) -> NaiveDate {
    NaiveDate::parse_from_str(field.placeholder(), "%Y-%m-%d").unwrap_or_default()
}
