//! Category bar chart with an optional highlighted bar

use crate::chart::{category_frame, font, Chart};
use crate::color::{hue_palette, CategoryColors};
use crate::spec::{ChartKind, ChartSpec};
use crate::Result;
use chartflow_aggregate::FrequencyTable;
use chartflow_core::numeric::format_number;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

#[derive(Debug, Clone, PartialEq)]
pub struct BarStyle {
    /// Colours assigned to bars in order; evenly spaced hues when `None`
    pub palette: Option<Vec<RGBColor>>,
    pub highlight: Option<String>,
    pub highlight_color: RGBColor,
    pub highlight_width: u32,
    pub y_desc: Option<String>,
    /// Print bar values above the bars
    pub values: bool,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            palette: None,
            highlight: None,
            highlight_color: RGBColor(0xFF, 0x00, 0x00),
            highlight_width: 3,
            y_desc: Some("Count".to_string()),
            values: true,
        }
    }
}

/// One bar per category, drawn in the given order
#[derive(Debug, Clone)]
pub struct BarChart {
    bars: Vec<(String, f64)>,
    style: BarStyle,
}

impl BarChart {
    pub fn new(bars: Vec<(String, f64)>) -> Self {
        Self {
            bars,
            style: BarStyle::default(),
        }
    }

    /// Bars in the frequency table's order
    pub fn from_frequency(freq: &FrequencyTable) -> Self {
        Self::new(
            freq.entries()
                .iter()
                .map(|(c, n)| (c.clone(), *n as f64))
                .collect(),
        )
    }

    pub fn with_style(mut self, style: BarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_highlight(mut self, category: impl Into<String>) -> Self {
        self.style.highlight = Some(category.into());
        self
    }

    pub fn bars(&self) -> &[(String, f64)] {
        &self.bars
    }

    /// Colour of every bar
    pub fn colors(&self) -> CategoryColors {
        let names: Vec<&str> = self.bars.iter().map(|(c, _)| c.as_str()).collect();
        match &self.style.palette {
            Some(palette) => CategoryColors::assign(&names, palette),
            None => CategoryColors::assign(&names, &hue_palette(names.len())),
        }
    }

    /// Top of the y axis, leaving room for the value labels
    pub fn y_max(&self) -> f64 {
        let max = self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.15
        } else {
            1.0
        }
    }
}

impl Chart for BarChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()> {
        let names: Vec<String> = self.bars.iter().map(|(c, _)| c.clone()).collect();
        let mut chart = category_frame(area, spec, &names, (0.0, self.y_max()), self.style.y_desc.as_deref())?;
        let colors = self.colors();

        chart.draw_series(self.bars.iter().enumerate().map(|(i, (name, v))| {
            Rectangle::new([(i as f64 + 0.1, 0.0), (i as f64 + 0.9, *v)], colors.get(name).filled())
        }))?;

        if let Some(focus) = &self.style.highlight {
            let border = ShapeStyle::from(&self.style.highlight_color).stroke_width(self.style.highlight_width);
            chart.draw_series(
                self.bars
                    .iter()
                    .enumerate()
                    .filter(|(_, (name, _))| name == focus)
                    .map(|(i, (_, v))| Rectangle::new([(i as f64 + 0.1, 0.0), (i as f64 + 0.9, *v)], border)),
            )?;
        }

        if self.style.values && spec.text.glyphs() {
            let style = font(spec, 10.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart.draw_series(self.bars.iter().enumerate().map(|(i, (_, v))| {
                Text::new(format_number(*v, None), (i as f64 + 0.5, *v), style.clone())
            }))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render;

    fn chart() -> BarChart {
        BarChart::new(vec![("IT".to_string(), 4.0), ("Marketing".to_string(), 2.0)])
    }

    fn has_red(image: &crate::RenderedImage) -> bool {
        image.image().pixels().any(|p| p.0 == [0xFF, 0x00, 0x00])
    }

    #[test]
    fn test_colors_follow_order() {
        let colors = chart().colors();
        let palette = hue_palette(2);
        assert_eq!(colors.get("IT"), palette[0]);
        assert_eq!(colors.get("Marketing"), palette[1]);
        assert!((chart().y_max() - 4.6).abs() < 1e-12);
        assert_eq!(BarChart::new(vec![]).y_max(), 1.0);
    }

    #[test]
    fn test_bar_fill() {
        let image = render(&ChartSpec::new(ChartKind::Bar, 200, 100), &chart()).unwrap();
        let palette = hue_palette(2);
        // inside the first bar, just above the baseline
        assert_eq!(image.pixel(55, 80), Some([palette[0].0, palette[0].1, palette[0].2]));
        assert!(!has_red(&image));
    }

    #[test]
    fn test_highlight_border() {
        let highlighted = chart().with_highlight("Marketing");
        let image = render(&ChartSpec::new(ChartKind::Bar, 200, 100), &highlighted).unwrap();
        assert!(has_red(&image));
        let missing = chart().with_highlight("Sales");
        let image = render(&ChartSpec::new(ChartKind::Bar, 200, 100), &missing).unwrap();
        assert!(!has_red(&image));
    }
}
