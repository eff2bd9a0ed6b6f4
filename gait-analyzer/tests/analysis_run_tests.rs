//! End-to-end tests over a collection folder built in a temp directory
//!
//! Fixture workbooks are written with rust_xlsxwriter and read back through
//! the same calamine path the tool uses.

use calamine::{open_workbook, Data, Reader, Xlsx};
use gait_analyzer::export::{sink_for, write_reports};
use gait_analyzer::{AnalysisRun, AnalysisSettings, AnalyzerError};
use gait_common::config::OutputFormat;
use gait_common::layout::{column_index, REPORT_SHEET_NAME};
use gait_common::{Activity, JointAngles, Side};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEEL: [f64; 7] = [3.0, 5.0, 6.0, 2.0, 1.0, 4.0, 3.5];
const PELVIS: [f64; 7] = [9.0, 9.0, 9.0, 4.0, 1.0, 6.0, 1.0];

/// Series whose maximum inside the window [3, 4] is `peak`
///
/// Samples outside the window are larger, so a wrong window shows up.
fn angle_series(peak: f64) -> Vec<f64> {
    vec![99.0, 99.0, 99.0, peak - 1.0, peak, 99.0, 99.0]
}

/// Write a workbook with one sheet per entry; each column gets a header
fn write_workbook(path: &Path, sheets: &[(&str, Vec<(&str, Vec<f64>)>)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut workbook = Workbook::new();
    for (name, columns) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (letters, values) in columns {
            let col = column_index(letters).unwrap() as u16;
            sheet.write_string(0, col, "header").unwrap();
            for (row, value) in values.iter().enumerate() {
                sheet.write_number(row as u32 + 1, col, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

fn markers_sheet(name: &str) -> (&str, Vec<(&str, Vec<f64>)>) {
    (name, vec![("BI", HEEL.to_vec()), ("BL", PELVIS.to_vec())])
}

fn kinematics_sheet(name: &str, maxima: [f64; 4]) -> (&str, Vec<(&str, Vec<f64>)>) {
    let [adduction, flexion, rotation, knee] = maxima;
    (
        name,
        vec![
            ("H", angle_series(flexion)),
            ("I", angle_series(adduction)),
            ("J", angle_series(rotation)),
            ("K", angle_series(knee)),
        ],
    )
}

/// Day 1, SLDL, right side only, trials 1 and 2
fn build_collection(root: &Path) {
    write_workbook(
        &root.join("Dia_1_Marcadores/SLDL/P01_SLDL_Direita.xlsx"),
        &[markers_sheet("Tentativa 1"), markers_sheet("Tentativa 2")],
    );
    write_workbook(
        &root.join("Dia_1_Cinematica/SLDL/P01_SLDL_Direita.xlsx"),
        &[
            kinematics_sheet("Tentativa 1", [10.0, 20.0, 30.0, 40.0]),
            kinematics_sheet("Tentativa 2", [30.0, 40.0, 50.0, 60.0]),
        ],
    );
}

fn settings(root: &Path, format: OutputFormat) -> AnalysisSettings {
    AnalysisSettings {
        day_count: 1,
        trials_per_side: 3,
        output_format: format,
        ..AnalysisSettings::new(root)
    }
}

#[test]
fn test_run_produces_results_and_group_average() {
    let dir = TempDir::new().unwrap();
    build_collection(dir.path());

    let report = AnalysisRun::new(settings(dir.path(), OutputFormat::Xlsx))
        .run()
        .unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].maxima.hip_adduction, 10.0);
    assert_eq!(report.results[1].maxima.knee_flexion, 60.0);

    assert_eq!(report.averages.len(), 1);
    let average = &report.averages[0];
    assert_eq!(
        (average.activity, average.day, average.side),
        (Activity::Sldl, 1, Side::Right)
    );
    assert_eq!(
        average.means,
        JointAngles {
            hip_adduction: 20.0,
            hip_flexion: 30.0,
            hip_internal_rotation: 40.0,
            knee_flexion: 50.0,
        }
    );
    assert!(!report.averages.iter().any(|a| a.side == Side::Left));

    let stats = &report.statistics;
    assert_eq!(stats.days_scanned, 1);
    assert_eq!(stats.trials_processed, 2);
    // trial 3 has no sheet
    assert_eq!(stats.skipped.sheet_missing, 1);
    // SLDL left side has no workbooks, SLHFD sides have no folders
    assert_eq!(stats.sides_missing_workbooks, 3);
    // SLHFD and SLLV under both day folders
    assert_eq!(stats.missing_folders, 4);
    assert_eq!(stats.unimplemented_units, 1);
}

#[test]
fn test_xlsx_reports_round_trip_through_calamine() {
    let dir = TempDir::new().unwrap();
    build_collection(dir.path());
    let run = AnalysisRun::new(settings(dir.path(), OutputFormat::Xlsx));
    let report = run.run().unwrap();

    let out = dir.path().join("out");
    let written = write_reports(
        sink_for(OutputFormat::Xlsx).as_ref(),
        &out,
        &report.results,
        &report.averages,
    )
    .unwrap();
    assert_eq!(written.len(), 3);

    let mut wb: Xlsx<_> = open_workbook(out.join("SLDL_Resultados.xlsx")).unwrap();
    let range = wb.worksheet_range(REPORT_SHEET_NAME).unwrap();

    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("Arquivo".to_string()))
    );
    assert_eq!(
        range.get_value((1, 0)),
        Some(&Data::String("SLDL - Tentativa 1".to_string()))
    );
    assert_eq!(
        range.get_value((1, 1)),
        Some(&Data::String("Direita".to_string()))
    );
    assert_eq!(
        range.get_value((1, 2)),
        Some(&Data::String("Dia 1".to_string()))
    );
    assert!(matches!(range.get_value((3, 0)), None | Some(Data::Empty)));
    assert_eq!(
        range.get_value((4, 0)),
        Some(&Data::String("Média - SLDL".to_string()))
    );
    // adduction, flexion, knee flexion, internal rotation
    assert_eq!(range.get_value((4, 3)), Some(&Data::Float(20.0)));
    assert_eq!(range.get_value((4, 4)), Some(&Data::Float(30.0)));
    assert_eq!(range.get_value((4, 5)), Some(&Data::Float(50.0)));
    assert_eq!(range.get_value((4, 6)), Some(&Data::Float(40.0)));

    let mut sllv: Xlsx<_> = open_workbook(out.join("SLLV_Resultados.xlsx")).unwrap();
    assert_eq!(sllv.worksheet_range(REPORT_SHEET_NAME).unwrap().height(), 1);
}

#[test]
fn test_csv_reports_cover_every_activity() {
    let dir = TempDir::new().unwrap();
    build_collection(dir.path());
    let report = AnalysisRun::new(settings(dir.path(), OutputFormat::Csv))
        .run()
        .unwrap();

    let written = write_reports(
        sink_for(OutputFormat::Csv).as_ref(),
        dir.path(),
        &report.results,
        &report.averages,
    )
    .unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "SLDL_Resultados.csv",
            "SLHFD_Resultados.csv",
            "SLLV_Resultados.csv"
        ]
    );

    let sldl = fs::read_to_string(dir.path().join("SLDL_Resultados.csv")).unwrap();
    assert_eq!(sldl.lines().count(), 5);
    let slhfd = fs::read_to_string(dir.path().join("SLHFD_Resultados.csv")).unwrap();
    // header plus the blank separator
    assert_eq!(slhfd.lines().count(), 2);
}

#[test]
fn test_summary_json_carries_statistics() {
    let dir = TempDir::new().unwrap();
    build_collection(dir.path());
    let report = AnalysisRun::new(settings(dir.path(), OutputFormat::Xlsx))
        .run()
        .unwrap();

    let path = dir.path().join("summary.json");
    report.write_json(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["statistics"]["trials_processed"], 2);
    assert_eq!(value["averages"][0]["activity"], "SLDL");
    assert_eq!(value["averages"][0]["side"], "Right");
    assert_eq!(value["results"].as_array().unwrap().len(), 2);
}

#[test]
fn test_malformed_trial_does_not_affect_other_side() {
    let dir = TempDir::new().unwrap();
    build_collection(dir.path());

    // Left side trial 1 has a heel peak at the last sample
    let left_markers = (
        "Tentativa 1",
        vec![
            ("AZ", vec![1.0, 2.0, 3.0, 4.0]),
            ("BO", vec![4.0, 3.0, 2.0, 1.0]),
        ],
    );
    let left_kinematics = (
        "Tentativa 1",
        vec![
            ("O", vec![1.0; 4]),
            ("P", vec![1.0; 4]),
            ("Q", vec![1.0; 4]),
            ("R", vec![1.0; 4]),
        ],
    );
    write_workbook(
        &dir.path().join("Dia_1_Marcadores/SLDL/P01_SLDL_Esquerda.xlsx"),
        &[left_markers],
    );
    write_workbook(
        &dir.path().join("Dia_1_Cinematica/SLDL/P01_SLDL_Esquerda.xlsx"),
        &[left_kinematics],
    );

    let report = AnalysisRun::new(settings(dir.path(), OutputFormat::Xlsx))
        .run()
        .unwrap();

    assert_eq!(report.averages.len(), 1);
    assert_eq!(report.averages[0].side, Side::Right);
    assert_eq!(report.averages[0].means.hip_adduction, 20.0);
    assert_eq!(report.statistics.skipped.no_pelvis_after_peak, 1);
}

#[test]
fn test_unreadable_workbook_fails_the_run() {
    let dir = TempDir::new().unwrap();
    build_collection(dir.path());
    let bad = dir.path().join("Dia_1_Marcadores/SLHFD/P01_SLHFD_Direita.xlsx");
    fs::create_dir_all(bad.parent().unwrap()).unwrap();
    fs::write(&bad, b"not a spreadsheet").unwrap();
    write_workbook(
        &dir.path().join("Dia_1_Cinematica/SLHFD/P01_SLHFD_Direita.xlsx"),
        &[kinematics_sheet("Tentativa 1", [1.0, 2.0, 3.0, 4.0])],
    );

    let result = AnalysisRun::new(settings(dir.path(), OutputFormat::Xlsx)).run();
    assert!(matches!(result, Err(AnalyzerError::Workbook(_))));
}
