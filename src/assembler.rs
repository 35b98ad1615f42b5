//! Analysis assembly
//!
//! ```text
//! Workbook ──► Sections::extract ──► Sections ──► Sections::analyze ──► AnalysisResult
//!                 │                                  │
//!                 ├─ job_info                        ├─ metrics
//!                 ├─ service_plan (needs job)        └─ advisory
//!                 ├─ equipment
//!                 └─ drill_ops (shared Synthesizer)
//! ```
//!
//! Every entry point returns a complete [`AnalysisResult`]. A workbook that
//! cannot be opened, contains none of the expected sheets, panics the reader
//! or exceeds the parse deadline yields the demo result with a
//! [`NoteKind::DemoFallback`] note.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::advisory::{generate_recommendations, AdvisoryInputs};
use crate::config::AnalysisConfig;
use crate::demo;
use crate::extraction::drill_ops::{extract_ct_operations, extract_mill_operations};
use crate::extraction::equipment::extract_equipment;
use crate::extraction::job_info::extract_job_info;
use crate::extraction::service_plan::extract_daily_operations;
use crate::extraction::{Extracted, ExtractionError, Synthesizer, Workbook};
use crate::metrics;
use crate::types::{
    AnalysisResult, DailyOperationRecord, DataSource, DrillOperation, EquipmentUsage,
    ExtractionNote, JobRecord, NoteKind,
};

// ============================================================================
// Sections
// ============================================================================

/// Raw records of one job, before any aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sections {
    pub job: JobRecord,
    pub daily: Vec<DailyOperationRecord>,
    pub equipment: EquipmentUsage,
    pub mill: Vec<DrillOperation>,
    pub ct: Vec<DrillOperation>,
    pub notes: Vec<ExtractionNote>,
}

impl Sections {
    pub fn builder() -> SectionsBuilder {
        SectionsBuilder::default()
    }

    /// Run every section extractor against one workbook.
    ///
    /// Job metadata is read first since daily dates fall back to the job
    /// start date. Mill and CT share one [`Synthesizer`], so a configured
    /// seed makes the whole extraction deterministic.
    pub fn extract(workbook: &Workbook, config: &AnalysisConfig) -> Self {
        let mut synth = Synthesizer::new(&config.synthesis);

        let job = extract_job_info(workbook, &config.workbook);
        let daily = extract_daily_operations(workbook, config, &job.value);
        let equipment = extract_equipment(workbook, &config.workbook);
        let mill = extract_mill_operations(workbook, config, &mut synth);
        let ct = extract_ct_operations(workbook, config, &mut synth);

        Self::builder()
            .job(job)
            .daily(daily)
            .equipment(equipment)
            .mill(mill)
            .ct(ct)
            .build()
    }

    /// Compute every metric group and the advisories.
    pub fn analyze(self, config: &AnalysisConfig, data_source: DataSource) -> AnalysisResult {
        let operational_frequency = metrics::operational_frequency(&self.daily);
        let time_analysis = metrics::time_analysis(&self.daily);
        let equipment_frequency = metrics::equipment_frequency(&self.equipment, &config.equipment);
        let mill_performance = metrics::mill_performance(&self.mill, &config.drilling);
        let ct_performance = metrics::ct_performance(&self.ct, &config.drilling);
        let efficiency_metrics = metrics::efficiency_metrics(
            &self.daily,
            &self.job,
            &self.equipment,
            mill_performance.as_ref(),
            &config.drilling,
        );

        let recommendations = generate_recommendations(
            &AdvisoryInputs {
                mill: mill_performance.as_ref(),
                ct: ct_performance.as_ref(),
                equipment: equipment_frequency.as_ref(),
                efficiency: efficiency_metrics.as_ref(),
                time: time_analysis.as_ref(),
            },
            config,
        );

        info!(
            source = ?data_source,
            days = self.daily.len(),
            tools = self.equipment.len(),
            mill_ops = self.mill.len(),
            ct_ops = self.ct.len(),
            recommendations = recommendations.len(),
            notes = self.notes.len(),
            "Analysis assembled"
        );

        AnalysisResult {
            job_summary: self.job,
            operational_frequency,
            equipment_frequency,
            time_analysis,
            efficiency_metrics,
            daily_breakdown: self.daily,
            equipment_usage: self.equipment,
            mill_performance,
            ct_performance,
            recommendations,
            data_source,
            extraction_notes: self.notes,
        }
    }
}

/// Collects extracted sections and their notes.
///
/// Sections never supplied fall back to the all-placeholder job and empty
/// collections, which the metrics engine reports as `{}` groups.
#[derive(Debug, Default)]
pub struct SectionsBuilder {
    job: Option<JobRecord>,
    daily: Vec<DailyOperationRecord>,
    equipment: EquipmentUsage,
    mill: Vec<DrillOperation>,
    ct: Vec<DrillOperation>,
    notes: Vec<ExtractionNote>,
}

impl SectionsBuilder {
    #[must_use]
    pub fn job(mut self, section: Extracted<JobRecord>) -> Self {
        self.job = Some(section.value);
        self.notes.extend(section.notes);
        self
    }

    #[must_use]
    pub fn daily(mut self, section: Extracted<Vec<DailyOperationRecord>>) -> Self {
        self.daily = section.value;
        self.notes.extend(section.notes);
        self
    }

    #[must_use]
    pub fn equipment(mut self, section: Extracted<EquipmentUsage>) -> Self {
        self.equipment = section.value;
        self.notes.extend(section.notes);
        self
    }

    #[must_use]
    pub fn mill(mut self, section: Extracted<Vec<DrillOperation>>) -> Self {
        self.mill = section.value;
        self.notes.extend(section.notes);
        self
    }

    #[must_use]
    pub fn ct(mut self, section: Extracted<Vec<DrillOperation>>) -> Self {
        self.ct = section.value;
        self.notes.extend(section.notes);
        self
    }

    #[must_use]
    pub fn note(mut self, note: ExtractionNote) -> Self {
        self.notes.push(note);
        self
    }

    pub fn build(self) -> Sections {
        Sections {
            job: self.job.unwrap_or_else(demo::section_default_job),
            daily: self.daily,
            equipment: self.equipment,
            mill: self.mill,
            ct: self.ct,
            notes: self.notes,
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Analyze an already-loaded workbook.
pub fn analyze_workbook(workbook: &Workbook, config: &AnalysisConfig) -> AnalysisResult {
    if !has_known_sheet(workbook, config) {
        let names: Vec<&str> = workbook.sheet_names().collect();
        warn!(sheets = ?names, "Workbook has none of the expected sheets");
        return demo_fallback(
            config,
            &format!("workbook contains none of the expected sheets (found: {})", names.join(", ")),
        );
    }

    let start = Instant::now();
    let extracted = catch_unwind(AssertUnwindSafe(|| Sections::extract(workbook, config)));
    match extracted {
        Ok(sections) => {
            info!(elapsed_ms = start.elapsed().as_millis(), "Workbook extracted");
            sections.analyze(config, DataSource::Extracted)
        }
        Err(_) => {
            warn!("Extraction panicked, using demo dataset");
            demo_fallback(config, "extraction failed unexpectedly")
        }
    }
}

/// Open and analyze a workbook file.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> AnalysisResult {
    match Workbook::open(path) {
        Ok(workbook) => analyze_workbook(&workbook, config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Workbook unreadable, using demo dataset");
            demo_fallback(config, &e.to_string())
        }
    }
}

/// Run a blocking workbook loader under a deadline.
///
/// The loader runs on the blocking pool. On timeout the task is abandoned
/// and finishes in the background; its result is discarded.
pub async fn load_workbook_bounded<F>(load: F, limit: Duration) -> Result<Workbook, ExtractionError>
where
    F: FnOnce() -> Result<Workbook, ExtractionError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(load);
    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ExtractionError::Loader(join_error.to_string())),
        Err(_elapsed) => Err(ExtractionError::Timeout(limit)),
    }
}

/// [`analyze_file`] with the configured parse deadline applied to loading.
pub async fn analyze_file_bounded(path: &Path, config: &AnalysisConfig) -> AnalysisResult {
    let owned = path.to_path_buf();
    let limit = config.workbook.parse_timeout();
    match load_workbook_bounded(move || Workbook::open(&owned), limit).await {
        Ok(workbook) => analyze_workbook(&workbook, config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Bounded load failed, using demo dataset");
            demo_fallback(config, &e.to_string())
        }
    }
}

/// Complete demo result annotated with why it was used.
pub fn demo_fallback(config: &AnalysisConfig, reason: &str) -> AnalysisResult {
    demo::fallback(
        config,
        ExtractionNote::new(
            NoteKind::DemoFallback,
            None,
            format!("{reason}; demo dataset shown"),
        ),
    )
}

fn has_known_sheet(workbook: &Workbook, config: &AnalysisConfig) -> bool {
    let wb = &config.workbook;
    [&wb.general_info_sheet, &wb.mill_sheet, &wb.ct_sheet]
        .into_iter()
        .any(|name| workbook.has_sheet(name))
        || (1..=wb.day_sheet_count).any(|n| workbook.has_sheet(&wb.day_sheet_name(n)))
        || (1..=wb.tool_sheet_count).any(|n| workbook.has_sheet(&wb.tool_sheet_name(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{CellValue, Grid};

    fn seeded() -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.synthesis.seed = Some(17);
        config
    }

    fn sparse_kit() -> Workbook {
        Workbook::from_sheets([
            (
                "General Info",
                Grid::default()
                    .with("B3", CellValue::text("Customer Name:"))
                    .with("C3", CellValue::text("Permian Basin Services"))
                    .with("B4", CellValue::text("Ticket #:"))
                    .with("C4", CellValue::text("PBS-2025-114")),
            ),
            ("Mill Data", Grid::default()),
            (
                "SP1",
                Grid::from_strings([vec!["06:00 rig up", "07:30 tag plug", "09:15 mill plug 1"]]),
            ),
        ])
    }

    #[test]
    fn test_builder_merges_notes_in_order() {
        let note = |msg: &str| ExtractionNote::new(NoteKind::LayoutShift, None, msg);
        let sections = Sections::builder()
            .job(Extracted::with_notes(demo::job_record(), vec![note("job")]))
            .mill(Extracted::with_notes(Vec::new(), vec![note("mill")]))
            .note(note("extra"))
            .build();
        let messages: Vec<&str> = sections.notes.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["job", "mill", "extra"]);
        assert!(sections.daily.is_empty());
    }

    #[test]
    fn test_builder_defaults_missing_job() {
        let sections = Sections::builder().build();
        assert_eq!(sections.job, demo::section_default_job());
    }

    #[test]
    fn test_empty_sections_produce_empty_groups() {
        let result = Sections::builder().build().analyze(&AnalysisConfig::default(), DataSource::Extracted);
        assert!(result.operational_frequency.is_none());
        assert!(result.mill_performance.is_none());
        assert!(result.efficiency_metrics.is_none());
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_sparse_workbook_is_extracted() {
        let result = analyze_workbook(&sparse_kit(), &seeded());
        assert_eq!(result.data_source, DataSource::Extracted);
        assert_eq!(result.job_summary.ticket_number, "PBS-2025-114");
        assert_eq!(result.daily_breakdown.len(), 1);
        assert_eq!(result.daily_breakdown[0].activities, 3);
        // Empty mill sheet gets the nominal synthesized set
        let mill = result.mill_performance.as_ref().expect("mill");
        assert_eq!(mill.total_plugs_drilled, 10);
        assert_eq!(mill.synthesized_operations, 10);
        assert!(result
            .extraction_notes
            .iter()
            .any(|n| n.kind == NoteKind::Synthesized));
    }

    #[test]
    fn test_seeded_extraction_is_deterministic() {
        let config = seeded();
        let a = analyze_workbook(&sparse_kit(), &config);
        let b = analyze_workbook(&sparse_kit(), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unrelated_workbook_falls_back_to_demo() {
        let wb = Workbook::from_sheets([("Sheet1", Grid::from_strings([vec!["hello"]]))]);
        let result = analyze_workbook(&wb, &AnalysisConfig::default());
        assert!(result.is_demo());
        assert_eq!(
            result.extraction_notes.last().map(|n| n.kind),
            Some(NoteKind::DemoFallback)
        );
    }

    #[test]
    fn test_unreadable_file_falls_back_to_demo() {
        let result = analyze_file(Path::new("/nonexistent/field_kit.xlsx"), &AnalysisConfig::default());
        assert!(result.is_demo());
        assert_eq!(result.extraction_notes.len(), 1);
        assert_eq!(result.extraction_notes[0].kind, NoteKind::DemoFallback);
    }

    #[tokio::test]
    async fn test_bounded_load_times_out() {
        let limit = Duration::from_millis(20);
        let result = load_workbook_bounded(
            || {
                std::thread::sleep(Duration::from_millis(300));
                Ok(Workbook::default())
            },
            limit,
        )
        .await;
        assert!(matches!(result, Err(ExtractionError::Timeout(d)) if d == limit));
    }

    #[tokio::test]
    async fn test_bounded_load_passes_result_through() {
        let wb = load_workbook_bounded(|| Ok(sparse_kit()), Duration::from_secs(5))
            .await
            .expect("loaded");
        assert!(wb.has_sheet("SP1"));
    }

    #[tokio::test]
    async fn test_bounded_load_reports_loader_panic() {
        let result = load_workbook_bounded(|| panic!("loader crashed"), Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ExtractionError::Loader(_))));
    }
}
