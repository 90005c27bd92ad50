//! Declarative description of one rendered visual

use crate::fonts;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Heatmap,
    Bar,
    Box,
    Flow,
    Line,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Heatmap => "heatmap",
            ChartKind::Bar => "bar",
            ChartKind::Box => "box",
            ChartKind::Flow => "flow",
            ChartKind::Line => "line",
        };
        write!(f, "{name}")
    }
}

/// Whether text is drawn
///
/// Glyph rendering needs a registered font; without one only geometry is
/// drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextMode {
    Glyphs,
    Suppressed,
}

impl TextMode {
    /// `Glyphs` when a system font could be installed
    pub fn detect() -> Self {
        if fonts::install_system_font() {
            TextMode::Glyphs
        } else {
            TextMode::Suppressed
        }
    }

    pub fn glyphs(&self) -> bool {
        matches!(self, TextMode::Glyphs)
    }
}

/// Output size, optional native canvas, annotations and text mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Declared output width in pixels
    pub width: u32,
    /// Declared output height in pixels
    pub height: u32,
    /// Canvas drawn on before the exact-size step
    pub native: Option<(u32, u32)>,
    pub title: Option<String>,
    pub watermark: Option<String>,
    pub text: TextMode,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, width: u32, height: u32) -> Self {
        Self {
            kind,
            width,
            height,
            native: None,
            title: None,
            watermark: None,
            text: TextMode::Suppressed,
        }
    }

    /// Square output
    pub fn square(kind: ChartKind, size: u32) -> Self {
        Self::new(kind, size, size)
    }

    pub fn with_native(mut self, width: u32, height: u32) -> Self {
        self.native = Some((width, height));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = Some(watermark.into());
        self
    }

    pub fn with_text(mut self, text: TextMode) -> Self {
        self.text = text;
        self
    }

    /// Size of the canvas the chart is drawn on
    pub fn native_size(&self) -> (u32, u32) {
        self.native.unwrap_or((self.width, self.height))
    }

    /// Shorter canvas side relative to a 512 px reference
    pub fn scale(&self) -> f64 {
        let (w, h) = self.native_size();
        w.min(h) as f64 / 512.0
    }

    /// Font size scaled to the canvas; `base` is the size at 512 px
    pub fn font_size(&self, base: f64) -> f64 {
        (base * self.scale()).max(6.0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let (nw, nh) = self.native_size();
        if self.width == 0 || self.height == 0 || nw == 0 || nh == 0 {
            return Err(Error::InvalidChart(format!(
                "{} chart has a zero dimension ({}x{}, native {nw}x{nh})",
                self.kind, self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_defaults_to_declared() {
        let spec = ChartSpec::square(ChartKind::Heatmap, 512);
        assert_eq!(spec.native_size(), (512, 512));
        let spec = ChartSpec::square(ChartKind::Flow, 512).with_native(800, 800);
        assert_eq!(spec.native_size(), (800, 800));
    }

    #[test]
    fn test_font_scaling() {
        let spec = ChartSpec::new(ChartKind::Line, 1500, 900);
        assert!((spec.font_size(10.0) - 10.0 * 900.0 / 512.0).abs() < 1e-9);
        assert_eq!(ChartSpec::square(ChartKind::Bar, 16).font_size(10.0), 6.0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(ChartSpec::new(ChartKind::Bar, 0, 10).validate().is_err());
        assert!(ChartSpec::square(ChartKind::Bar, 10).with_native(10, 0).validate().is_err());
        assert!(ChartSpec::square(ChartKind::Bar, 10).validate().is_ok());
    }
}
