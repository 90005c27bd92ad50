//! Box-and-whisker chart, one box per category

use crate::chart::{category_frame, font, Chart};
use crate::color::{hue_palette, CategoryColors};
use crate::spec::{ChartKind, ChartSpec};
use crate::Result;
use chartflow_aggregate::BoxStats;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStyle {
    /// Colours assigned to boxes in order; evenly spaced hues when `None`
    pub palette: Option<Vec<RGBColor>>,
    /// Fraction of the category slot taken by a box
    pub box_width: f64,
    pub line_width: u32,
    pub outlier_radius: u32,
    /// Prefix of the median label, e.g. `$`; no labels when `None`
    pub median_prefix: Option<String>,
    pub median_decimals: usize,
    pub y_desc: Option<String>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            palette: None,
            box_width: 0.6,
            line_width: 2,
            outlier_radius: 3,
            median_prefix: None,
            median_decimals: 0,
            y_desc: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoxPlot {
    groups: Vec<(String, BoxStats)>,
    style: BoxStyle,
}

impl BoxPlot {
    /// Boxes in the given order, typically the output of `describe`
    pub fn new(groups: Vec<(String, BoxStats)>) -> Self {
        Self {
            groups,
            style: BoxStyle::default(),
        }
    }

    pub fn with_style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    pub fn groups(&self) -> &[(String, BoxStats)] {
        &self.groups
    }

    pub fn colors(&self) -> CategoryColors {
        let names: Vec<&str> = self.groups.iter().map(|(c, _)| c.as_str()).collect();
        match &self.style.palette {
            Some(palette) => CategoryColors::assign(&names, palette),
            None => CategoryColors::assign(&names, &hue_palette(names.len())),
        }
    }

    /// Median annotation, `None` without a prefix
    pub fn median_label(&self, stats: &BoxStats) -> Option<String> {
        self.style
            .median_prefix
            .as_ref()
            .map(|prefix| format!("{prefix}{:.*}", self.style.median_decimals, stats.median))
    }

    /// Y range covering every whisker and outlier with 5% padding
    pub fn y_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .groups
            .iter()
            .flat_map(|(_, s)| {
                s.outliers
                    .iter()
                    .copied()
                    .chain([s.lower_whisker, s.upper_whisker])
            })
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        (lo - pad, hi + pad)
    }
}

impl Chart for BoxPlot {
    fn kind(&self) -> ChartKind {
        ChartKind::Box
    }

    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()> {
        let names: Vec<String> = self.groups.iter().map(|(c, _)| c.clone()).collect();
        let mut chart = category_frame(area, spec, &names, self.y_range(), self.style.y_desc.as_deref())?;
        let colors = self.colors();
        let half = self.style.box_width / 2.0;
        let ink = ShapeStyle::from(&RGBColor(0x33, 0x33, 0x33)).stroke_width(self.style.line_width);

        for (i, (name, stats)) in self.groups.iter().enumerate() {
            let cx = i as f64 + 0.5;
            let color = colors.get(name);

            chart.draw_series([
                PathElement::new(vec![(cx, stats.lower_whisker), (cx, stats.q1)], ink),
                PathElement::new(vec![(cx, stats.q3), (cx, stats.upper_whisker)], ink),
                PathElement::new(
                    vec![(cx - half / 2.0, stats.lower_whisker), (cx + half / 2.0, stats.lower_whisker)],
                    ink,
                ),
                PathElement::new(
                    vec![(cx - half / 2.0, stats.upper_whisker), (cx + half / 2.0, stats.upper_whisker)],
                    ink,
                ),
            ])?;
            chart.draw_series([
                Rectangle::new([(cx - half, stats.q1), (cx + half, stats.q3)], color.filled()),
                Rectangle::new([(cx - half, stats.q1), (cx + half, stats.q3)], ink),
            ])?;
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(cx - half, stats.median), (cx + half, stats.median)],
                ink,
            )))?;
            chart.draw_series(stats.outliers.iter().map(|&v| {
                Circle::new((cx, v), self.style.outlier_radius, ShapeStyle::from(&ink.color).stroke_width(1))
            }))?;

            if let (Some(label), true) = (self.median_label(stats), spec.text.glyphs()) {
                let style = font(spec, 10.0, FontStyle::Bold)
                    .color(&WHITE)
                    .pos(Pos::new(HPos::Center, VPos::Bottom));
                chart.draw_series(std::iter::once(Text::new(label, (cx, stats.median), style)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render;
    use chartflow_aggregate::box_stats;

    fn plot() -> BoxPlot {
        let budget = box_stats(&[10.0, 20.0, 30.0, 40.0, 50.0, 300.0]).unwrap();
        let vip = box_stats(&[400.0, 500.0, 600.0, 700.0]).unwrap();
        BoxPlot::new(vec![("Budget".to_string(), budget), ("VIP".to_string(), vip)])
    }

    #[test]
    fn test_median_label() {
        let p = plot();
        assert_eq!(p.median_label(&p.groups()[1].1), None);
        let p = p.with_style(BoxStyle {
            median_prefix: Some("$".to_string()),
            ..BoxStyle::default()
        });
        assert_eq!(p.median_label(&p.groups()[1].1).as_deref(), Some("$550"));
    }

    #[test]
    fn test_y_range_includes_outliers() {
        let p = plot();
        assert_eq!(p.groups()[0].1.outliers, vec![300.0]);
        let (lo, hi) = p.y_range();
        assert!(lo < 10.0);
        assert!(hi > 700.0);
        assert_eq!(BoxPlot::new(vec![]).y_range(), (0.0, 1.0));
    }

    #[test]
    fn test_render_square() {
        let image = render(&ChartSpec::square(ChartKind::Box, 512), &plot()).unwrap();
        assert_eq!(image.dimensions(), (512, 512));
    }
}
