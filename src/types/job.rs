//! Job identification and customer metadata

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Job duration assumed when the start/end dates cannot both be resolved.
pub const DEFAULT_DURATION_DAYS: u32 = 7;

/// Individually addressable job metadata fields.
///
/// Used to tag which fields fell back to a placeholder during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobField {
    CustomerName,
    TicketNumber,
    JobType,
    WellNumber,
    Lease,
    County,
    RigName,
    AfePo,
    DateStarted,
    DateEnded,
    DaySupervisor,
    NightSupervisor,
}

impl JobField {
    /// Placeholder used when the field cannot be read from the sheet.
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::CustomerName => "Extracted Customer",
            Self::TicketNumber => "EXT-2024-001",
            Self::JobType => "Drillout Operation",
            Self::WellNumber => "Well #1",
            Self::Lease => "Unknown Lease",
            Self::County => "Extracted County",
            Self::RigName => "Unknown Rig",
            Self::AfePo => "N/A",
            Self::DateStarted => "2024-06-15",
            Self::DateEnded => "2024-06-21",
            Self::DaySupervisor => "Field Supervisor",
            Self::NightSupervisor => "Night Supervisor",
        }
    }

    /// Output key name, matching the serialized `JobRecord` field.
    pub const fn key(self) -> &'static str {
        match self {
            Self::CustomerName => "customer_name",
            Self::TicketNumber => "ticket_number",
            Self::JobType => "job_type",
            Self::WellNumber => "well_number",
            Self::Lease => "lease",
            Self::County => "county",
            Self::RigName => "rig_name",
            Self::AfePo => "afe_po",
            Self::DateStarted => "date_started",
            Self::DateEnded => "date_ended",
            Self::DaySupervisor => "day_supervisor",
            Self::NightSupervisor => "night_supervisor",
        }
    }
}

/// Job identification and customer data from the `General Info` sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub customer_name: String,
    pub ticket_number: String,
    pub job_type: String,
    pub well_number: String,
    pub lease: String,
    pub county: String,
    pub rig_name: String,
    pub afe_po: String,
    pub date_started: NaiveDate,
    pub date_ended: NaiveDate,
    pub day_supervisor: String,
    pub night_supervisor: String,
    /// Inclusive day count between start and end, or the default of 7
    pub duration_days: u32,
    /// Fields that were not found and carry a placeholder value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted_fields: Vec<JobField>,
}

impl JobRecord {
    /// Inclusive duration in days, `None` when the range is inverted.
    pub fn duration_between(start: NaiveDate, end: NaiveDate) -> Option<u32> {
        let days = (end - start).num_days() + 1;
        u32::try_from(days).ok().filter(|d| *d > 0)
    }

    pub fn is_defaulted(&self, field: JobField) -> bool {
        self.defaulted_fields.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 11).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2025, 6, 18).expect("valid date");
        assert_eq!(JobRecord::duration_between(start, end), Some(8));
        assert_eq!(JobRecord::duration_between(start, start), Some(1));
    }

    #[test]
    fn test_inverted_range_has_no_duration() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 18).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2025, 6, 11).expect("valid date");
        assert_eq!(JobRecord::duration_between(start, end), None);
    }

    #[test]
    fn test_placeholder_dates_parse() {
        for field in [JobField::DateStarted, JobField::DateEnded] {
            assert!(NaiveDate::parse_from_str(field.placeholder(), "%Y-%m-%d").is_ok());
        }
    }
}
