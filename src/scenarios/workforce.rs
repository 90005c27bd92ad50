//! Department headcounts of a 100-employee roster, published as HTML

use super::{finish, text_mode, WATERMARK};
use crate::Result;
use chartflow_aggregate::{
    arg_max, describe, frequency, group_means, mean, CategoryOrder, FrequencyTable, SummaryResult,
};
use chartflow_core::{DataSource, LiteralSource, PipelineContext, Table, TableSource};
use chartflow_publish::{Artifact, OutputDir, ReportDocument, ReportFormat};
use chartflow_render::{
    render, BarChart, BarStyle, BoxPlot, BoxStyle, ChartKind, ChartSpec, RenderedImage, TextMode,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

/// The roster shipped with the analysis
pub const EMPLOYEES: &str = include_str!("../../data/employees.csv");

const COLUMNS: [&str; 5] = [
    "department",
    "region",
    "performance_score",
    "years_experience",
    "satisfaction_rating",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: DataSource,
    /// Department whose share is reported and whose bar is highlighted
    pub focus: String,
    pub chart_width: u32,
    pub chart_height: u32,
    pub text: Option<TextMode>,
    pub watermark: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DataSource::Literal(LiteralSource::new(EMPLOYEES)),
            focus: "Marketing".to_string(),
            chart_width: 1000,
            chart_height: 600,
            text: None,
            watermark: WATERMARK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub employees: usize,
    pub focus_count: usize,
    /// Percentage of all employees in the focus department
    pub focus_share: f64,
    pub departments: FrequencyTable,
    pub artifacts: Vec<Artifact>,
}

/// Everything the report states, computed from the roster
#[derive(Debug, Clone)]
struct Figures {
    departments: FrequencyTable,
    performance_by_department: Vec<(String, f64)>,
    experience_by_region: Vec<(String, f64)>,
    regions: usize,
    mean_performance: f64,
}

impl Figures {
    fn compute(table: &Table) -> Result<Self> {
        table.require_columns(&COLUMNS)?;
        Ok(Self {
            departments: frequency(table, "department", &CategoryOrder::ByCount)?,
            performance_by_department: group_means(table, "department", "performance_score")?,
            experience_by_region: group_means(table, "region", "years_experience")?,
            regions: table.distinct("region")?.len(),
            mean_performance: mean(table.numeric("performance_score")?),
        })
    }

    fn department_performance(&self, department: &str) -> f64 {
        self.performance_by_department
            .iter()
            .find(|(d, _)| d == department)
            .map_or(f64::NAN, |(_, m)| *m)
    }
}

#[instrument(skip_all, fields(focus = %config.focus), level = "info")]
pub fn run(config: &Config, out_dir: &Path) -> Result<Outcome> {
    let mut ctx = PipelineContext::new("workforce");
    let mut out = OutputDir::create(out_dir)?;

    let table = ctx.stage("source", || {
        info!("loading {}", config.source.describe());
        config.source.load()
    })?;
    info!("Total employees: {}", table.n_rows());

    let figures = ctx.stage("aggregate", || Figures::compute(&table))?;
    let focus_count = figures.departments.count(&config.focus);
    let focus_share = figures.departments.share(&config.focus);
    ctx.set_metadata("focus_share", format!("{focus_share:.1}%"));
    info!("Frequency count for '{}' department: {focus_count}", config.focus);
    for (department, count) in figures.departments.entries() {
        info!("  {department}: {count}");
    }

    let text = text_mode(config.text);
    let (bars, boxes) = ctx.stage("render", || -> Result<_> {
        let spec = |kind: ChartKind, title: &str| {
            ChartSpec::new(kind, config.chart_width, config.chart_height)
                .with_title(title)
                .with_watermark(config.watermark.clone())
                .with_text(text)
        };

        let bar = BarChart::from_frequency(&figures.departments)
            .with_style(BarStyle {
                y_desc: Some("Number of Employees".to_string()),
                ..BarStyle::default()
            })
            .with_highlight(config.focus.clone());
        let bars = render(&spec(ChartKind::Bar, "Employee Distribution by Department"), &bar)?;

        let order = figures.departments.categories();
        let stats = describe(&table, "department", "performance_score", &order)?;
        let boxplot = BoxPlot::new(stats).with_style(BoxStyle {
            y_desc: Some("Performance Score".to_string()),
            ..BoxStyle::default()
        });
        let boxes = render(
            &spec(ChartKind::Box, "Performance Score Distribution by Department"),
            &boxplot,
        )?;
        Ok((bars, boxes))
    })?;

    ctx.stage("publish", || -> Result<()> {
        out.write_summary_csv(
            "department_counts.csv",
            &SummaryResult::from(figures.departments.clone()),
        )?;
        out.write_png("department_distribution.png", &bars)?;
        out.write_png("performance_by_department.png", &boxes)?;
        let report = report(config, &table, &figures, &bars, &boxes)?;
        out.write_report("employee_analysis.html", &report, ReportFormat::Html)?;
        Ok(())
    })?;

    let artifacts = finish(&ctx, out)?;
    Ok(Outcome {
        employees: table.n_rows(),
        focus_count,
        focus_share,
        departments: figures.departments,
        artifacts,
    })
}

fn report(
    config: &Config,
    table: &Table,
    figures: &Figures,
    bars: &RenderedImage,
    boxes: &RenderedImage,
) -> Result<ReportDocument> {
    let focus = config.focus.as_str();
    let total = table.n_rows();
    let departments = &figures.departments;
    let focus_count = departments.count(focus);
    let focus_share = departments.share(focus);

    let rows = departments
        .entries()
        .iter()
        .map(|(department, count)| {
            vec![
                department.clone(),
                count.to_string(),
                format!("{:.1}%", departments.share(department)),
                format!("{:.2}", figures.department_performance(department)),
            ]
        })
        .collect();

    let mut findings = vec![(
        format!("{focus} Department"),
        format!("{focus_count} employees ({focus_share:.1}% of workforce)"),
    )];
    if let Some((name, count)) = departments.first() {
        findings.push(("Largest Department".to_string(), format!("{name} with {count} employees")));
    }
    if let Some((name, count)) = departments.last() {
        findings.push(("Smallest Department".to_string(), format!("{name} with {count} employees")));
    }
    if let Some((name, m)) = arg_max(&figures.performance_by_department) {
        findings.push(("Highest Avg Performance".to_string(), format!("{name} ({m:.2})")));
    }
    if let Some((name, m)) = arg_max(&figures.experience_by_region) {
        findings.push(("Most Experienced Region".to_string(), format!("{name} (avg {m:.1} years)")));
    }

    let report = ReportDocument::new("Employee Performance Analysis")
        .with_subtitle("Departmental distribution and performance patterns")
        .with_footer(config.watermark.clone())
        .heading(2, "Dataset Overview")
        .stats(vec![
            ("Total Employees", total.to_string()),
            ("Departments", departments.len().to_string()),
            ("Regions", figures.regions.to_string()),
            ("Avg Performance", format!("{:.1}", figures.mean_performance)),
        ])
        .heading(2, format!("{focus} Department Frequency"))
        .highlight(format!("{focus_count} employees in {focus} department"))
        .paragraph(format!("{focus} represents {focus_share:.1}% of total workforce"))
        .heading(2, "Department Distribution")
        .table(
            vec![
                "Department".to_string(),
                "Employee Count".to_string(),
                "Percentage".to_string(),
                "Avg Performance".to_string(),
            ],
            rows,
        )
        .heading(2, "Department Distribution Histogram")
        .image_inline("Department Distribution Histogram", bars)?
        .paragraph(format!("{focus} department highlighted with red border"))
        .heading(2, "Performance Score Distribution by Department")
        .image_inline("Performance by Department", boxes)?
        .heading(2, "Key Findings")
        .findings(findings);
    Ok(report)
}
