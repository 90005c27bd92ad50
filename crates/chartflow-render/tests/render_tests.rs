//! Encoded charts decode to exactly the declared size

use chartflow_aggregate::{correlation_matrix, describe, frequency, CategoryOrder, ZeroVariancePolicy};
use chartflow_core::Table;
use chartflow_render::{
    render, BarChart, BoxPlot, Chart, ChartKind, ChartSpec, DashPattern, FlowColoring, FlowDiagram, Heatmap,
    LineChart, RGBColor, ReferenceLine,
};

fn staff() -> Table {
    Table::builder()
        .categorical("department", vec!["IT", "Sales", "IT", "HR", "Sales", "IT"])
        .numeric("score", vec![3.1, 4.0, 3.8, 2.9, 4.4, 3.5])
        .numeric("years", vec![2.0, 7.0, 4.0, 1.0, 9.0, 3.0])
        .build()
        .unwrap()
}

fn decoded_size<C: Chart>(spec: &ChartSpec, chart: &C) -> (u32, u32) {
    let png = render(spec, chart).unwrap().to_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    (decoded.width(), decoded.height())
}

#[test]
fn test_heatmap_standard_and_hd() {
    let matrix = correlation_matrix(&staff(), &["score", "years"], ZeroVariancePolicy::Nan).unwrap();
    let heatmap = Heatmap::new(&matrix);
    assert_eq!(decoded_size(&ChartSpec::square(ChartKind::Heatmap, 512), &heatmap), (512, 512));
    assert_eq!(decoded_size(&ChartSpec::square(ChartKind::Heatmap, 1024), &heatmap), (1024, 1024));
}

#[test]
fn test_bar_and_box() {
    let table = staff();
    let freq = frequency(&table, "department", &CategoryOrder::ByCount).unwrap();
    let bar = BarChart::from_frequency(&freq).with_highlight("Sales");
    assert_eq!(decoded_size(&ChartSpec::square(ChartKind::Bar, 512), &bar), (512, 512));

    let groups = describe(&table, "department", "score", &["IT", "Sales", "HR"]).unwrap();
    let boxes = BoxPlot::new(groups);
    assert_eq!(decoded_size(&ChartSpec::new(ChartKind::Box, 640, 480), &boxes), (640, 480));
}

#[test]
fn test_flow_native_800_to_512() {
    let table = Table::builder()
        .categorical("Channel", vec!["Social", "Email"])
        .categorical("Stage", vec!["Awareness", "Decision"])
        .categorical("Outcome", vec!["Converted", "Pending"])
        .numeric("Count", vec![10.0, 4.0])
        .build()
        .unwrap();
    let flow = FlowDiagram::from_table(
        &table,
        &["Channel", "Stage", "Outcome"],
        "Count",
        &[FlowColoring::Source, FlowColoring::Target],
    )
    .unwrap();
    let spec = ChartSpec::square(ChartKind::Flow, 512).with_native(800, 800);
    assert_eq!(decoded_size(&spec, &flow), (512, 512));
}

#[test]
fn test_line_wide_and_letterboxed() {
    let line = LineChart::new("Retention", vec![("Q1".to_string(), 72.26), ("Q2".to_string(), 71.57)])
        .with_reference(ReferenceLine::new(85.0, RGBColor(0xE6, 0x39, 0x46), DashPattern::Dashed, "Benchmark"))
        .with_y_range(65.0, 90.0)
        .unwrap();
    assert_eq!(decoded_size(&ChartSpec::new(ChartKind::Line, 1500, 900), &line), (1500, 900));

    // aspect change without a square target: letterboxed, corners stay white
    let spec = ChartSpec::new(ChartKind::Line, 300, 100).with_native(200, 200);
    let image = render(&spec, &line).unwrap();
    assert_eq!(image.dimensions(), (300, 100));
    assert_eq!(image.pixel(0, 50), Some([255, 255, 255]));
    assert_eq!(image.pixel(299, 50), Some([255, 255, 255]));
}
