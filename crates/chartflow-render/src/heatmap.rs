//! Annotated correlation heatmap

use crate::chart::{centered, draw_axes, font, Chart};
use crate::color::{luminance, DivergingScale};
use crate::spec::{ChartKind, ChartSpec};
use crate::Result;
use chartflow_aggregate::CorrelationMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

/// Heatmap appearance
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapStyle {
    pub scale: DivergingScale,
    /// Decimals of the per-cell annotation
    pub decimals: usize,
    pub grid: RGBColor,
    pub colorbar: bool,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            scale: DivergingScale::default(),
            decimals: 3,
            grid: RGBColor(0x80, 0x80, 0x80),
            colorbar: true,
        }
    }
}

/// A correlation matrix drawn as coloured, annotated cells
#[derive(Debug, Clone)]
pub struct Heatmap<'a> {
    matrix: &'a CorrelationMatrix,
    style: HeatmapStyle,
}

impl<'a> Heatmap<'a> {
    pub fn new(matrix: &'a CorrelationMatrix) -> Self {
        Self {
            matrix,
            style: HeatmapStyle::default(),
        }
    }

    pub fn with_style(mut self, style: HeatmapStyle) -> Self {
        self.style = style;
        self
    }

    /// Annotation text of one cell
    pub fn cell_label(&self, value: f64) -> String {
        if value.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.*}", self.style.decimals, value)
        }
    }

    /// Fill colour of one cell
    pub fn cell_color(&self, value: f64) -> RGBColor {
        self.style.scale.color(value)
    }

    fn draw_colorbar<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()> {
        let glyphs = spec.text.glyphs();
        let (_, h) = area.dim_in_pixel();
        let mut chart = ChartBuilder::on(area)
            .margin_top(h / 10)
            .margin_bottom(h / 10)
            .margin_left(4)
            .margin_right(if glyphs { (spec.font_size(9.0) * 3.5) as u32 } else { 4 })
            .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

        let steps = 100;
        chart.draw_series((0..steps).map(|i| {
            let lo = -1.0 + 2.0 * i as f64 / steps as f64;
            let hi = -1.0 + 2.0 * (i + 1) as f64 / steps as f64;
            let color = self.style.scale.color((lo + hi) / 2.0);
            Rectangle::new([(0.0, lo), (1.0, hi)], color.filled())
        }))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, -1.0), (1.0, 1.0)],
            ShapeStyle::from(&self.style.grid).stroke_width(1),
        )))?;

        if glyphs {
            let style = font(spec, 9.0, FontStyle::Normal)
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center));
            chart.draw_series([-1.0, -0.5, 0.0, 0.5, 1.0].into_iter().map(|v| {
                Text::new(format!("{v:.1}"), (1.15, v), style.clone())
            }))?;
        }
        Ok(())
    }
}

impl Chart for Heatmap<'_> {
    fn kind(&self) -> ChartKind {
        ChartKind::Heatmap
    }

    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()> {
        let glyphs = spec.text.glyphs();
        let n = self.matrix.len();
        let names = self.matrix.columns();
        let (w, _) = area.dim_in_pixel();

        let (main, bar) = if self.style.colorbar {
            let (main, bar) = area.split_horizontally(w * 86 / 100);
            (main, Some(bar))
        } else {
            (area.clone(), None)
        };

        let label_px = if glyphs { (spec.font_size(10.0) * 4.5) as u32 } else { 0 };
        let mut chart = ChartBuilder::on(&main)
            .margin(8)
            .x_label_area_size(label_px)
            .y_label_area_size(label_px * 2)
            .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;

        let top = n as f64;
        chart.draw_series((0..n).flat_map(|i| {
            (0..n).map(move |j| (i, j))
        }).map(|(i, j)| {
            let r = self.matrix.at(i, j);
            Rectangle::new(
                [(j as f64, top - i as f64 - 1.0), (j as f64 + 1.0, top - i as f64)],
                self.cell_color(r).filled(),
            )
        }))?;

        let grid = ShapeStyle::from(&self.style.grid).stroke_width(1);
        chart.draw_series((0..=n).map(|k| {
            PathElement::new(vec![(k as f64, 0.0), (k as f64, top)], grid)
        }))?;
        chart.draw_series((0..=n).map(|k| {
            PathElement::new(vec![(0.0, k as f64), (top, k as f64)], grid)
        }))?;

        if glyphs {
            let bold = TextStyle::from(font(spec, 11.0, FontStyle::Bold))
                .pos(Pos::new(HPos::Center, VPos::Center));
            for i in 0..n {
                for j in 0..n {
                    let r = self.matrix.at(i, j);
                    let ink = if luminance(self.cell_color(r)) < 0.5 { WHITE } else { BLACK };
                    chart.draw_series(std::iter::once(Text::new(
                        self.cell_label(r),
                        (j as f64 + 0.5, top - i as f64 - 0.5),
                        bold.clone().color(&ink),
                    )))?;
                }
            }

            // variable names: one line per underscore-separated word
            let line = spec.font_size(10.0) * 1.2;
            let label = centered(spec, 10.0, &BLACK);
            let right = font(spec, 10.0, FontStyle::Normal)
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Center));
            let (_, plot_h) = chart.plotting_area().dim_in_pixel();
            let unit = if n == 0 { 0.0 } else { n as f64 / plot_h.max(1) as f64 };
            for (k, name) in names.iter().enumerate() {
                for (l, word) in name.split('_').enumerate() {
                    let y = -unit * line * (l as f64 + 0.8);
                    chart.draw_series(std::iter::once(Text::new(
                        word.to_string(),
                        (k as f64 + 0.5, y),
                        label.clone(),
                    )))?;
                }
                chart.draw_series(std::iter::once(Text::new(
                    name.replace('_', " "),
                    (-0.08, top - k as f64 - 0.5),
                    right.clone(),
                )))?;
            }
        } else {
            draw_axes(chart.plotting_area(), (0.0, top), (0.0, top))?;
        }

        if let Some(bar) = bar {
            self.draw_colorbar(&bar, spec)?;
        }
        Ok(())
    }
}
