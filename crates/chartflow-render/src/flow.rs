//! Alluvial flow diagram across categorical dimensions
//!
//! Each dimension is a column of nodes; each consecutive pair of dimensions
//! is a hop whose flows connect the nodes with Bezier ribbons weighted by
//! summed volume. Geometry comes from [`crate::layout`].

use crate::chart::{font, Chart};
use crate::color::{hue_palette, CategoryColors};
use crate::layout::{column_positions, flow_curve, node_positions, FlowWeight, Point};
use crate::spec::{ChartKind, ChartSpec};
use crate::{Error, Result};
use chartflow_aggregate::grouped_sum;
use chartflow_core::Table;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which end of a hop gives the flow its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowColoring {
    Source,
    Target,
}

/// One column of nodes
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDimension {
    pub name: String,
    /// Nodes in order of first appearance
    pub nodes: Vec<String>,
    pub colors: CategoryColors,
}

/// Summed flows between two consecutive dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct FlowHop {
    pub flows: Vec<(String, String, f64)>,
    pub coloring: FlowColoring,
}

/// A single drawable ribbon
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    pub volume: f64,
    pub from: Point,
    pub to: Point,
    pub color: RGBColor,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct FlowDiagram {
    dimensions: Vec<FlowDimension>,
    hops: Vec<FlowHop>,
    weight: FlowWeight,
    node_size: f64,
    samples: usize,
}

impl FlowDiagram {
    /// Build from a table with one categorical column per dimension and a
    /// numeric volume column
    ///
    /// `coloring` holds one entry per hop. Node colours default to evenly
    /// spaced hues per dimension.
    pub fn from_table(table: &Table, dimensions: &[&str], value: &str, coloring: &[FlowColoring]) -> Result<Self> {
        if dimensions.len() < 2 {
            return Err(Error::InvalidChart(format!(
                "flow diagram needs at least two dimensions, got {}",
                dimensions.len()
            )));
        }
        if coloring.len() != dimensions.len() - 1 {
            return Err(Error::InvalidChart(format!(
                "{} hops but {} colouring rules",
                dimensions.len() - 1,
                coloring.len()
            )));
        }
        table.require_columns(dimensions)?;
        table.numeric(value)?;

        let dims = dimensions
            .iter()
            .map(|name| {
                let nodes: Vec<String> = table.distinct(name)?.into_iter().map(str::to_string).collect();
                let colors = CategoryColors::assign(&nodes, &hue_palette(nodes.len()));
                Ok(FlowDimension {
                    name: name.to_string(),
                    nodes,
                    colors,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let hops = dimensions
            .windows(2)
            .zip(coloring)
            .map(|(pair, &coloring)| {
                let sums = grouped_sum(table, pair, value)?;
                let flows = sums
                    .groups()
                    .iter()
                    .map(|(key, v)| (key[0].clone(), key[1].clone(), *v))
                    .collect();
                Ok(FlowHop { flows, coloring })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(dimensions = dims.len(), hops = hops.len(), "flow diagram built");
        Ok(Self {
            dimensions: dims,
            hops,
            weight: FlowWeight::default(),
            node_size: 0.08,
            samples: 50,
        })
    }

    /// Replace the node colours of one dimension
    pub fn with_colors(mut self, dimension: &str, colors: CategoryColors) -> Result<Self> {
        let dim = self
            .dimensions
            .iter_mut()
            .find(|d| d.name == dimension)
            .ok_or_else(|| Error::InvalidChart(format!("no flow dimension named '{dimension}'")))?;
        dim.colors = colors;
        Ok(self)
    }

    pub fn with_weight(mut self, weight: FlowWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Side of the square node marker in unit coordinates
    pub fn with_node_size(mut self, size: f64) -> Self {
        self.node_size = size;
        self
    }

    pub fn dimensions(&self) -> &[FlowDimension] {
        &self.dimensions
    }

    pub fn hops(&self) -> &[FlowHop] {
        &self.hops
    }

    /// Node centres per dimension
    pub fn layout(&self) -> Vec<Vec<(String, Point)>> {
        column_positions(self.dimensions.len())
            .into_iter()
            .zip(&self.dimensions)
            .map(|(x, dim)| node_positions(&dim.nodes, x))
            .collect()
    }

    /// Every ribbon with its geometry, colour and weight
    pub fn links(&self) -> Vec<FlowLink> {
        let layout = self.layout();
        let position = |column: usize, node: &str| {
            layout[column]
                .iter()
                .find(|(name, _)| name == node)
                .map(|(_, p)| *p)
        };

        let mut links = Vec::new();
        for (h, hop) in self.hops.iter().enumerate() {
            for (source, target, volume) in &hop.flows {
                let (Some(from), Some(to)) = (position(h, source), position(h + 1, target)) else {
                    continue;
                };
                let color = match hop.coloring {
                    FlowColoring::Source => self.dimensions[h].colors.get(source),
                    FlowColoring::Target => self.dimensions[h + 1].colors.get(target),
                };
                links.push(FlowLink {
                    source: source.clone(),
                    target: target.clone(),
                    volume: *volume,
                    from,
                    to,
                    color,
                    width: self.weight.width(*volume),
                    opacity: self.weight.opacity(*volume),
                });
            }
        }
        links
    }
}

impl Chart for FlowDiagram {
    fn kind(&self) -> ChartKind {
        ChartKind::Flow
    }

    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()> {
        let glyphs = spec.text.glyphs();
        let mut chart = ChartBuilder::on(area)
            .margin(4)
            .build_cartesian_2d(0f64..1f64, 0f64..1f64)?;

        let scale = spec.scale();
        let half = self.node_size / 2.0;
        for link in self.links() {
            let path = flow_curve(link.from, link.to, half).sample(self.samples);
            let px = (link.width * scale).round().max(1.0) as u32;
            chart.draw_series(std::iter::once(PathElement::new(
                path,
                link.color.mix(link.opacity).stroke_width(px),
            )))?;
        }

        let layout = self.layout();
        let label = font(spec, 9.0, FontStyle::Bold)
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let header = font(spec, 12.0, FontStyle::Bold)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));

        for (dim, nodes) in self.dimensions.iter().zip(&layout) {
            chart.draw_series(nodes.iter().map(|(name, (x, y))| {
                Rectangle::new([(x - half, y - half), (x + half, y + half)], dim.colors.get(name).filled())
            }))?;
            chart.draw_series(nodes.iter().map(|(_, (x, y))| {
                Rectangle::new(
                    [(x - half, y - half), (x + half, y + half)],
                    ShapeStyle::from(&WHITE).stroke_width(1),
                )
            }))?;
            if glyphs {
                chart.draw_series(
                    nodes
                        .iter()
                        .map(|(name, (x, y))| Text::new(name.clone(), (*x, *y), label.clone())),
                )?;
                if let Some((_, (x, _))) = nodes.first() {
                    chart.draw_series(std::iter::once(Text::new(dim.name.clone(), (*x, 0.98), header.clone())))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render;
    use crate::color::parse_hex;
    use approx::assert_abs_diff_eq;

    fn journeys() -> Table {
        Table::builder()
            .categorical("Channel", vec!["Social", "Email", "Social", "Paid"])
            .categorical("Stage", vec!["Awareness", "Interest", "Decision", "Awareness"])
            .categorical("Outcome", vec!["Converted", "Abandoned", "Converted", "Pending"])
            .numeric("Count", vec![120.0, 45.0, 30.0, 80.0])
            .build()
            .unwrap()
    }

    fn diagram() -> FlowDiagram {
        FlowDiagram::from_table(
            &journeys(),
            &["Channel", "Stage", "Outcome"],
            "Count",
            &[FlowColoring::Source, FlowColoring::Target],
        )
        .unwrap()
    }

    #[test]
    fn test_nodes_in_first_appearance_order() {
        let d = diagram();
        assert_eq!(d.dimensions()[0].nodes, vec!["Social", "Email", "Paid"]);
        let layout = d.layout();
        assert_eq!(layout.len(), 3);
        assert_abs_diff_eq!(layout[0][0].1 .0, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(layout[0][0].1 .1, 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(layout[1][0].1 .0, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(layout[2][2].1 .1, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_hops_are_summed() {
        let d = diagram();
        let first = &d.hops()[0].flows;
        assert!(first.contains(&("Social".to_string(), "Awareness".to_string(), 120.0)));
        let total: f64 = d.hops()[1].flows.iter().map(|(_, _, v)| v).sum();
        assert_eq!(total, 275.0);
    }

    #[test]
    fn test_link_colour_follows_coloring() {
        let channels = CategoryColors::from_hex(&[("Social", "#3498db"), ("Email", "#e74c3c")]).unwrap();
        let outcomes = CategoryColors::from_hex(&[("Converted", "#27ae60")]).unwrap();
        let d = diagram()
            .with_colors("Channel", channels)
            .unwrap()
            .with_colors("Outcome", outcomes)
            .unwrap();
        let links = d.links();
        let social = links.iter().find(|l| l.source == "Social" && l.target == "Awareness").unwrap();
        assert_eq!(social.color, parse_hex("#3498db").unwrap());
        let converted = links.iter().find(|l| l.target == "Converted").unwrap();
        assert_eq!(converted.color, parse_hex("#27ae60").unwrap());
        // outcome without a colour falls back to grey
        let pending = links.iter().find(|l| l.target == "Pending").unwrap();
        assert_eq!(pending.color, crate::color::NEUTRAL_GREY);
        assert!(social.width > pending.width);
    }

    #[test]
    fn test_invalid_configuration() {
        let table = journeys();
        assert!(FlowDiagram::from_table(&table, &["Channel"], "Count", &[]).is_err());
        assert!(FlowDiagram::from_table(&table, &["Channel", "Stage"], "Count", &[]).is_err());
        assert!(FlowDiagram::from_table(&table, &["Channel", "Device"], "Count", &[FlowColoring::Source]).is_err());
        assert!(diagram().with_colors("Device", CategoryColors::default()).is_err());
    }

    #[test]
    fn test_native_canvas_resized() {
        let spec = ChartSpec::square(ChartKind::Flow, 512).with_native(800, 800);
        let image = render(&spec, &diagram()).unwrap();
        assert_eq!(image.dimensions(), (512, 512));
    }
}
