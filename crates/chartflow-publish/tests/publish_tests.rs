//! Writing artifacts into a temporary output directory

use chartflow_aggregate::{frequency, CategoryOrder, SummaryResult};
use chartflow_core::{Column, Field, Table};
use chartflow_publish::{Artifact, ArtifactKind, Error, OutputDir, ReportDocument, ReportFormat, MANIFEST};
use chartflow_render::{render, BarChart, ChartKind, ChartSpec};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Deserialize)]
struct Manifest {
    run: Option<String>,
    artifacts: Vec<Artifact>,
}

fn quarters() -> Table {
    Table::builder()
        .categorical("quarter", vec!["Q1", "Q2"])
        .column(
            Field::numeric("retention").with_decimals(2),
            Column::Numeric(vec![72.26, 71.5]),
        )
        .build()
        .unwrap()
}

#[test]
fn test_nested_directories_are_created() {
    let tmp = TempDir::new().unwrap();
    let mut out = OutputDir::create(tmp.path().join("run")).unwrap();
    let path = out.write_table_csv("data/retention_quarterly.csv", &quarters()).unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text, "quarter,retention\nQ1,72.26\nQ2,71.50\n");
}

#[test]
fn test_summary_csv_percentages() {
    let tmp = TempDir::new().unwrap();
    let table = Table::builder()
        .categorical("department", vec!["IT", "IT", "Marketing"])
        .build()
        .unwrap();
    let freq = frequency(&table, "department", &CategoryOrder::ByCount).unwrap();
    let mut out = OutputDir::create(tmp.path()).unwrap();
    let path = out
        .write_summary_csv("departments.csv", &SummaryResult::from(freq))
        .unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text, "category,count,percent\nIT,2,66.67\nMarketing,1,33.33\n");
}

#[test]
fn test_png_overwrite_and_manifest() {
    let tmp = TempDir::new().unwrap();
    let mut out = OutputDir::create(tmp.path()).unwrap();
    let chart = BarChart::new(vec![("a".to_string(), 1.0)]);

    let small = render(&ChartSpec::square(ChartKind::Bar, 32), &chart).unwrap();
    let large = render(&ChartSpec::square(ChartKind::Bar, 64), &chart).unwrap();
    out.write_png("chart.png", &small).unwrap();
    let path = out.write_png("chart.png", &large).unwrap();
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 64));

    let report = ReportDocument::new("Run").image_path("chart", "chart.png");
    out.write_report("report.md", &report, ReportFormat::Markdown).unwrap();
    out.write_manifest(Some("test")).unwrap();

    assert_eq!(out.artifacts().len(), 3);
    assert_eq!(out.artifacts()[0].path, "chart.png");
    assert_eq!(out.artifacts()[1].kind, ArtifactKind::Markdown);

    let manifest: Manifest = serde_json::from_str(&fs::read_to_string(out.join(MANIFEST)).unwrap()).unwrap();
    assert_eq!(manifest.run.as_deref(), Some("test"));
    assert_eq!(manifest.artifacts.len(), 2);
}

#[test]
fn test_unwritable_root_reports_path() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("file");
    fs::write(&blocker, b"x").unwrap();
    let err = OutputDir::create(blocker.join("nested")).unwrap_err();
    match err {
        Error::Io { path, .. } => assert!(path.ends_with("nested")),
        other => panic!("unexpected error: {other}"),
    }
}
