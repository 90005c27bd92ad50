//! Labelled trend line with horizontal reference lines

use crate::chart::{category_frame, font, Chart, Frame};
use crate::color::parse_hex;
use crate::layout::{dash_segments, DashPattern};
use crate::spec::{ChartKind, ChartSpec};
use crate::{Error, Result};
use chartflow_core::numeric::format_number;
use plotters::chart::SeriesLabelPosition;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use serde::{Deserialize, Serialize};

/// Corner holding the legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendPosition {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl From<LegendPosition> for SeriesLabelPosition {
    fn from(position: LegendPosition) -> Self {
        match position {
            LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
            LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

/// Horizontal line at a fixed value
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub color: RGBColor,
    pub pattern: DashPattern,
    pub width: u32,
    pub label: String,
}

impl ReferenceLine {
    pub fn new(value: f64, color: RGBColor, pattern: DashPattern, label: impl Into<String>) -> Self {
        Self {
            value,
            color,
            pattern,
            width: 2,
            label: label.into(),
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: RGBColor,
    pub width: u32,
    pub marker_radius: u32,
    /// Appended to each point label, e.g. `%`
    pub suffix: String,
    /// Decimals of the point labels; shortest form when `None`
    pub decimals: Option<u32>,
    pub y_desc: Option<String>,
    pub legend: LegendPosition,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: RGBColor(0x2E, 0x86, 0xAB),
            width: 3,
            marker_radius: 6,
            suffix: String::new(),
            decimals: None,
            y_desc: None,
            legend: LegendPosition::LowerRight,
        }
    }
}

/// Ordered `(label, value)` points joined by straight segments
#[derive(Debug, Clone)]
pub struct LineChart {
    points: Vec<(String, f64)>,
    series: String,
    references: Vec<ReferenceLine>,
    y_range: Option<(f64, f64)>,
    style: LineStyle,
}

impl LineChart {
    pub fn new(series: impl Into<String>, points: Vec<(String, f64)>) -> Self {
        Self {
            points,
            series: series.into(),
            references: Vec::new(),
            y_range: None,
            style: LineStyle::default(),
        }
    }

    pub fn with_reference(mut self, line: ReferenceLine) -> Self {
        self.references.push(line);
        self
    }

    /// Fix the y axis; `min` must be below `max`
    pub fn with_y_range(mut self, min: f64, max: f64) -> Result<Self> {
        if !(min < max) {
            return Err(Error::InvalidChart(format!("empty y range {min}..{max}")));
        }
        self.y_range = Some((min, max));
        Ok(self)
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Line colour from `#rrggbb`
    pub fn with_color(mut self, hex: &str) -> Result<Self> {
        self.style.color = parse_hex(hex)?;
        Ok(self)
    }

    pub fn points(&self) -> &[(String, f64)] {
        &self.points
    }

    pub fn references(&self) -> &[ReferenceLine] {
        &self.references
    }

    /// Text printed next to a point
    pub fn point_label(&self, value: f64) -> String {
        format!("{}{}", format_number(value, self.style.decimals), self.style.suffix)
    }

    /// The fixed range, or the data and reference values with 10% padding
    pub fn y_range(&self) -> (f64, f64) {
        if let Some(range) = self.y_range {
            return range;
        }
        let values = self
            .points
            .iter()
            .map(|(_, v)| *v)
            .chain(self.references.iter().map(|r| r.value));
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
        (lo - pad, hi + pad)
    }

    fn draw_reference<DB: DrawingBackend>(&self, chart: &mut Frame<'_, DB>, line: &ReferenceLine, spec: &ChartSpec) -> Result<()> {
        let n = self.points.len().max(1) as f64;
        let style = line.color.stroke_width(line.width);
        let pieces = match line.pattern.runs(line.width as f64 * spec.scale()) {
            None => vec![(0.0, n)],
            Some((on, off)) => {
                // runs are in pixels; convert through the plotting width
                let (w, _) = chart.plotting_area().dim_in_pixel();
                let per_px = n / w.max(1) as f64;
                dash_segments(0.0, n, on * per_px, off * per_px)
            }
        };
        let color = line.color;
        let width = line.width;
        chart
            .draw_series(
                pieces
                    .into_iter()
                    .map(|(a, b)| PathElement::new(vec![(a, line.value), (b, line.value)], style)),
            )?
            .label(line.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width)));
        Ok(())
    }
}

impl Chart for LineChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()> {
        let glyphs = spec.text.glyphs();
        let names: Vec<String> = self.points.iter().map(|(c, _)| c.clone()).collect();
        let (lo, hi) = self.y_range();
        let mut chart = category_frame(area, spec, &names, (lo, hi), self.style.y_desc.as_deref())?;

        for line in &self.references {
            self.draw_reference(&mut chart, line, spec)?;
        }

        let color = self.style.color;
        let width = self.style.width;
        let coords: Vec<(f64, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (i as f64 + 0.5, *v))
            .collect();
        chart
            .draw_series(LineSeries::new(coords.clone(), color.stroke_width(width)))?
            .label(self.series.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width)));
        chart.draw_series(
            coords
                .iter()
                .map(|&p| Circle::new(p, self.style.marker_radius, color.filled())),
        )?;

        if glyphs {
            let style = font(spec, 10.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            let lift = (hi - lo) * 0.025;
            chart.draw_series(
                self.points
                    .iter()
                    .zip(&coords)
                    .map(|((_, v), &(x, y))| Text::new(self.point_label(*v), (x, y + lift), style.clone())),
            )?;
            chart
                .configure_series_labels()
                .position(self.style.legend.into())
                .label_font(font(spec, 10.0, FontStyle::Normal))
                .background_style(&WHITE.mix(0.85))
                .border_style(&BLACK)
                .draw()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render;

    fn retention() -> LineChart {
        let quarters = [("Q1", 72.26), ("Q2", 71.57), ("Q3", 74.89), ("Q4", 77.52)];
        LineChart::new(
            "Retention Rate",
            quarters.iter().map(|(q, v)| (q.to_string(), *v)).collect(),
        )
        .with_style(LineStyle {
            suffix: "%".to_string(),
            ..LineStyle::default()
        })
        .with_reference(ReferenceLine::new(
            85.0,
            RGBColor(0xE6, 0x39, 0x46),
            DashPattern::Dashed,
            "Industry Benchmark (85%)",
        ))
        .with_reference(
            ReferenceLine::new(74.06, RGBColor(0x45, 0x7B, 0x9D), DashPattern::Dotted, "Average").with_width(1),
        )
    }

    #[test]
    fn test_point_labels() {
        let chart = retention();
        assert_eq!(chart.point_label(72.26), "72.26%");
        assert_eq!(chart.point_label(85.0), "85%");
    }

    #[test]
    fn test_y_range() {
        let chart = retention();
        let (lo, hi) = chart.y_range();
        assert!(lo < 71.57 && hi > 85.0);
        let fixed = retention().with_y_range(65.0, 90.0).unwrap();
        assert_eq!(fixed.y_range(), (65.0, 90.0));
        assert!(retention().with_y_range(90.0, 65.0).is_err());
    }

    #[test]
    fn test_benchmark_colour_is_drawn() {
        let chart = retention().with_y_range(65.0, 90.0).unwrap();
        let image = render(&ChartSpec::new(ChartKind::Line, 1500, 900), &chart).unwrap();
        assert_eq!(image.dimensions(), (1500, 900));
        assert!(image.image().pixels().any(|p| p.0 == [0xE6, 0x39, 0x46]));
    }
}
