//! Analysis run orchestration
//!
//! Walks days, then activities, then sides, then trials. Each
//! `(day, activity, side)` unit reads its own workbooks and collects its own
//! results and counters; the two sides of an activity run in parallel and
//! are joined before aggregation.

use crate::analysis::{analyze_trial, group_averages};
use crate::config::AnalysisSettings;
use crate::context::RunContext;
use crate::error::AnalyzerResult;
use crate::services::{extract_trial, ColumnSource, DataFolderScanner, DayFiles, Workbook};
use crate::workflow::statistics::RunStatistics;
use chrono::{DateTime, Utc};
use gait_common::{Activity, GroupAverage, Side, TrialResult};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub root_folder: PathBuf,
    pub results: Vec<TrialResult>,
    pub averages: Vec<GroupAverage>,
    pub statistics: RunStatistics,
}

impl RunReport {
    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> AnalyzerResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Results and counters of a unit of work
type UnitOutcome = (Vec<TrialResult>, RunStatistics);

/// One analysis run over a collection root
pub struct AnalysisRun {
    settings: AnalysisSettings,
    scanner: DataFolderScanner,
}

impl AnalysisRun {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            scanner: DataFolderScanner::new(),
        }
    }

    /// Process every configured day and aggregate the results
    ///
    /// Trial-local problems are counted and skipped. Scan and workbook I/O
    /// failures end the run; the elapsed time is logged either way.
    pub fn run(&self) -> AnalyzerResult<RunReport> {
        let start_time = Instant::now();

        info!(
            root_folder = %self.settings.root_folder.display(),
            first_day = self.settings.first_day,
            day_count = self.settings.day_count,
            "Starting analysis"
        );

        let outcome = self.process_days();

        let elapsed = start_time.elapsed();
        info!("Total elapsed time: {:.2} s", elapsed.as_secs_f64());

        let (results, mut statistics) = outcome?;
        statistics.elapsed_ms = elapsed.as_millis() as u64;

        let averages = group_averages(&results);

        info!(
            trials = results.len(),
            groups = averages.len(),
            "Analysis completed: {}",
            statistics.display_string()
        );
        if statistics.trials_skipped() > 0 {
            warn!("Skipped trials: {}", statistics.skipped.display_string());
        }

        Ok(RunReport {
            generated_at: Utc::now(),
            root_folder: self.settings.root_folder.clone(),
            results,
            averages,
            statistics,
        })
    }

    fn process_days(&self) -> AnalyzerResult<UnitOutcome> {
        let mut results = Vec::new();
        let mut statistics = RunStatistics::new();

        for day in self.settings.days() {
            info!("Processing day {}", day);
            let files = self.scanner.scan_day(&self.settings.root_folder, day)?;
            statistics.days_scanned += 1;
            statistics.missing_folders += files.missing_folders.len();

            let before = results.len();
            for activity in Activity::ALL {
                let (activity_results, activity_stats) = self.process_activity(&files, activity)?;
                results.extend(activity_results);
                statistics.merge(&activity_stats);
            }

            info!(
                "Day {} finished: {} records",
                day,
                results.len() - before
            );
        }

        Ok((results, statistics))
    }

    fn process_activity(&self, files: &DayFiles, activity: Activity) -> AnalyzerResult<UnitOutcome> {
        match activity {
            Activity::Sldl | Activity::Slhfd => {
                info!("Day {}: processing {}", files.day, activity);

                let outcomes: Vec<AnalyzerResult<UnitOutcome>> = Side::ALL
                    .par_iter()
                    .map(|&side| self.process_side(files, RunContext::new(files.day, activity, side)))
                    .collect();

                let mut results = Vec::new();
                let mut statistics = RunStatistics::new();
                for outcome in outcomes {
                    let (side_results, side_stats) = outcome?;
                    results.extend(side_results);
                    statistics.merge(&side_stats);
                }

                info!(
                    "Day {}: {} finished with {} results",
                    files.day,
                    activity,
                    results.len()
                );
                Ok((results, statistics))
            }
            Activity::Sllv => {
                info!("Day {}: no analysis available for {}", files.day, activity);
                let statistics = RunStatistics {
                    unimplemented_units: 1,
                    ..RunStatistics::default()
                };
                Ok((Vec::new(), statistics))
            }
        }
    }

    fn process_side(&self, files: &DayFiles, ctx: RunContext) -> AnalyzerResult<UnitOutcome> {
        let mut statistics = RunStatistics::new();

        let workbooks = files.workbooks(ctx.activity, ctx.side);
        let Some((markers_path, kinematics_path)) = workbooks.pair() else {
            warn!(
                "{}: markers or kinematics workbook missing, side skipped",
                ctx
            );
            statistics.sides_missing_workbooks += 1;
            return Ok((Vec::new(), statistics));
        };

        info!(
            "{}: markers {}, kinematics {}",
            ctx,
            markers_path.display(),
            kinematics_path.display()
        );

        let markers = Workbook::open(markers_path)?;
        let kinematics = Workbook::open(kinematics_path)?;

        let results = analyze_side(
            &ctx,
            &markers,
            &kinematics,
            self.settings.trials_per_side,
            &mut statistics,
        );
        Ok((results, statistics))
    }
}

/// Analyze trials `1..=trials` of one side
///
/// Every failure is trial-local: it is logged, counted and the next trial
/// is processed.
pub fn analyze_side<M, K>(
    ctx: &RunContext,
    markers: &M,
    kinematics: &K,
    trials: u32,
    statistics: &mut RunStatistics,
) -> Vec<TrialResult>
where
    M: ColumnSource + ?Sized,
    K: ColumnSource + ?Sized,
{
    let mut results = Vec::new();

    for trial in 1..=trials {
        info!("{}: processing trial {}", ctx, trial);

        let signals = match extract_trial(markers, kinematics, ctx, trial) {
            Ok(signals) => signals,
            Err(e) => {
                warn!("{}: trial {} skipped: {}", ctx, trial, e);
                statistics.record_extract_failure(&e);
                continue;
            }
        };

        match analyze_trial(&signals) {
            Ok(analysis) => {
                let cut = analysis.cut_points;
                info!(
                    "{}: trial {} cut points found: heel return {}, pelvis trough {}",
                    ctx,
                    trial,
                    cut.heel_return
                        .map(|i| i.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    cut.pelvis_trough
                );
                let maxima = analysis.result.maxima;
                info!(
                    "{}: trial {} maxima: adduction {:.2}, flexion {:.2}, knee flexion {:.2}, internal rotation {:.2}",
                    ctx,
                    trial,
                    maxima.hip_adduction,
                    maxima.hip_flexion,
                    maxima.knee_flexion,
                    maxima.hip_internal_rotation
                );
                statistics.trials_processed += 1;
                results.push(analysis.result);
            }
            Err(reason) => {
                warn!("{}: trial {} skipped: {}", ctx, trial, reason);
                statistics.record_skip(&reason);
            }
        }
    }

    results
}
