//! Backend-free chart geometry
//!
//! Flow diagrams are laid out in the unit square (x to the right, y up) and
//! only mapped to pixels by the renderer, so node placement, connector
//! curves, stroke weights and dash runs can be checked without drawing.

use chartflow_core::numeric::linspace;
use serde::{Deserialize, Serialize};

/// A point in unit-square coordinates
pub type Point = (f64, f64);

/// Horizontal extent used by flow columns
pub const COLUMN_SPAN: (f64, f64) = (0.1, 0.9);
/// Vertical extent used by nodes, top first
pub const NODE_SPAN: (f64, f64) = (0.9, 0.1);

/// One x position per dimension, evenly spaced over [`COLUMN_SPAN`]
///
/// A single column is centred.
pub fn column_positions(n: usize) -> Vec<f64> {
    match n {
        1 => vec![0.5],
        _ => linspace(COLUMN_SPAN.0, COLUMN_SPAN.1, n),
    }
}

/// Node centres within one column, evenly spread from top to bottom in the given order
pub fn node_positions<S: AsRef<str>>(nodes: &[S], x: f64) -> Vec<(String, Point)> {
    nodes
        .iter()
        .zip(linspace(NODE_SPAN.0, NODE_SPAN.1, nodes.len()))
        .map(|(name, y)| (name.as_ref().to_string(), (x, y)))
        .collect()
}

/// Cubic Bezier curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub fn point(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        (
            a * self.p0.0 + b * self.p1.0 + c * self.p2.0 + d * self.p3.0,
            a * self.p0.1 + b * self.p1.1 + c * self.p2.1 + d * self.p3.1,
        )
    }

    /// `n` points from `p0` to `p3` inclusive (at least two)
    pub fn sample(&self, n: usize) -> Vec<Point> {
        linspace(0.0, 1.0, n.max(2))
            .into_iter()
            .map(|t| self.point(t))
            .collect()
    }
}

/// Connector from the right edge of `start` to the left edge of `end`
///
/// Both control points sit at the horizontal midpoint between the node
/// centres, keeping the start and end heights, so the curve leaves and
/// enters each node horizontally.
pub fn flow_curve(start: Point, end: Point, node_half_width: f64) -> CubicBezier {
    let mid = (start.0 + end.0) / 2.0;
    CubicBezier {
        p0: (start.0 + node_half_width, start.1),
        p1: (mid, start.1),
        p2: (mid, end.1),
        p3: (end.0 - node_half_width, end.1),
    }
}

/// Saturating mapping from flow volume to stroke width and opacity
///
/// `s = v / (v + half_saturation)` grows monotonically from 0 towards 1;
/// width and opacity interpolate between their bounds by `s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowWeight {
    pub half_saturation: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
}

impl Default for FlowWeight {
    fn default() -> Self {
        Self {
            half_saturation: 100.0,
            min_width: 1.0,
            max_width: 24.0,
            min_opacity: 0.15,
            max_opacity: 0.8,
        }
    }
}

impl FlowWeight {
    /// Saturation in [0, 1); non-positive volumes map to 0
    pub fn saturation(&self, volume: f64) -> f64 {
        if volume <= 0.0 || volume.is_nan() {
            return 0.0;
        }
        if volume.is_infinite() {
            return 1.0;
        }
        volume / (volume + self.half_saturation)
    }

    pub fn width(&self, volume: f64) -> f64 {
        self.min_width + (self.max_width - self.min_width) * self.saturation(volume)
    }

    pub fn opacity(&self, volume: f64) -> f64 {
        self.min_opacity + (self.max_opacity - self.min_opacity) * self.saturation(volume)
    }
}

/// Stroke pattern of a reference line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashPattern {
    Solid,
    Dashed,
    Dotted,
}

impl DashPattern {
    /// `(on, off)` run lengths in pixels for a stroke width; `None` for solid
    pub fn runs(&self, stroke_width: f64) -> Option<(f64, f64)> {
        let w = stroke_width.max(1.0);
        match self {
            DashPattern::Solid => None,
            DashPattern::Dashed => Some((3.7 * w, 1.6 * w)),
            DashPattern::Dotted => Some((w, 1.65 * w)),
        }
    }
}

/// Visible `[from, to]` pieces of a dashed run along one axis
///
/// The last dash is cut at `to`. Non-positive run lengths give one solid piece.
pub fn dash_segments(from: f64, to: f64, on: f64, off: f64) -> Vec<(f64, f64)> {
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    if on <= 0.0 || off < 0.0 || !(hi - lo).is_finite() {
        return vec![(lo, hi)];
    }
    let mut segments = Vec::new();
    let mut x = lo;
    while x < hi {
        segments.push((x, (x + on).min(hi)));
        x += on + off;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_three_columns() {
        let xs = column_positions(3);
        assert_abs_diff_eq!(xs[0], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(xs[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(xs[2], 0.9, epsilon = 1e-12);
        assert_eq!(column_positions(1), vec![0.5]);
        assert!(column_positions(0).is_empty());
    }

    #[test]
    fn test_node_positions_keep_given_order() {
        let nodes = node_positions(&["Social", "Email", "Organic", "Paid", "Search"], 0.1);
        let ys: Vec<f64> = nodes.iter().map(|(_, (_, y))| *y).collect();
        assert_eq!(nodes[0].0, "Social");
        assert_eq!(nodes[4].0, "Search");
        assert_abs_diff_eq!(ys[0], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(ys[2], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ys[4], 0.1, epsilon = 1e-12);
        assert!(nodes.iter().all(|(_, (x, _))| *x == 0.1));
    }

    #[test]
    fn test_single_node_sits_at_top() {
        let nodes = node_positions(&["Only"], 0.5);
        assert_eq!(nodes, vec![("Only".to_string(), (0.5, 0.9))]);
    }

    #[test]
    fn test_flow_curve_control_points() {
        let curve = flow_curve((0.1, 0.9), (0.5, 0.3), 0.04);
        assert_abs_diff_eq!(curve.p0.0, 0.14, epsilon = 1e-12);
        assert_eq!(curve.p1, (0.3, 0.9));
        assert_eq!(curve.p2, (0.3, 0.3));
        assert_abs_diff_eq!(curve.p3.0, 0.46, epsilon = 1e-12);

        let points = curve.sample(11);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], curve.p0);
        let last = points[10];
        assert_abs_diff_eq!(last.0, curve.p3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(last.1, curve.p3.1, epsilon = 1e-12);
        // symmetric S-curve passes through the midpoint
        let mid = curve.point(0.5);
        assert_abs_diff_eq!(mid.0, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.1, 0.6, epsilon = 1e-12);
        // heights stay within the endpoints
        assert!(points.iter().all(|(_, y)| *y <= 0.9 + 1e-12 && *y >= 0.3 - 1e-12));
    }

    #[test]
    fn test_flow_weight_is_monotone_and_bounded() {
        let weight = FlowWeight::default();
        assert_eq!(weight.saturation(0.0), 0.0);
        assert_eq!(weight.saturation(-5.0), 0.0);
        assert_abs_diff_eq!(weight.saturation(100.0), 0.5, epsilon = 1e-12);
        let mut previous = weight.width(0.0);
        for v in [1.0, 10.0, 50.0, 100.0, 1e3, 1e6] {
            let w = weight.width(v);
            assert!(w > previous);
            assert!(w < weight.max_width);
            assert!(weight.opacity(v) <= weight.max_opacity);
            previous = w;
        }
        assert_eq!(weight.width(0.0), weight.min_width);
        assert_eq!(weight.opacity(0.0), weight.min_opacity);
    }

    #[test]
    fn test_dash_segments() {
        let segments = dash_segments(0.0, 10.0, 3.0, 1.0);
        assert_eq!(segments, vec![(0.0, 3.0), (4.0, 7.0), (8.0, 10.0)]);
        assert_eq!(dash_segments(5.0, 0.0, 0.0, 1.0), vec![(0.0, 5.0)]);
        assert!(dash_segments(1.0, 1.0, 2.0, 1.0).is_empty());
    }

    #[test]
    fn test_dash_patterns_differ() {
        assert_eq!(DashPattern::Solid.runs(2.0), None);
        let dashed = DashPattern::Dashed.runs(2.0).unwrap();
        let dotted = DashPattern::Dotted.runs(2.0).unwrap();
        assert!(dashed.0 > dotted.0);
    }
}
