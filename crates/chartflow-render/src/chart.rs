//! The `Chart` trait and the render entry point

use crate::fit::FitPlan;
use crate::fonts::FAMILY;
use crate::spec::{ChartKind, ChartSpec};
use crate::{Error, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, instrument};

/// Something that can draw itself onto a drawing area
pub trait Chart {
    fn kind(&self) -> ChartKind;

    /// Draw onto `area`, which is already filled white and excludes the
    /// title and watermark bands
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>;
}

/// An RGB image at the declared output size
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    image: RgbImage,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// RGB triple at `(x, y)`, `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.image.get_pixel(x, y).0)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.image.as_raw(),
            self.width(),
            self.height(),
            ColorType::Rgb8,
        )?;
        Ok(bytes)
    }
}

/// Draw `chart` at the native size of `spec` and bring it to the declared size
#[instrument(skip(spec, chart), fields(kind = %spec.kind), level = "debug")]
pub fn render<C: Chart>(spec: &ChartSpec, chart: &C) -> Result<RenderedImage> {
    spec.validate()?;
    if chart.kind() != spec.kind {
        return Err(Error::InvalidChart(format!(
            "{} chart rendered with a {} spec",
            chart.kind(),
            spec.kind
        )));
    }

    let (nw, nh) = spec.native_size();
    let mut buffer = vec![255u8; nw as usize * nh as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (nw, nh)).into_drawing_area();
        root.fill(&WHITE)?;

        let glyphs = spec.text.glyphs();
        let mut body = root.clone();

        if let (true, Some(title)) = (glyphs, spec.title.as_deref()) {
            let size = spec.font_size(18.0);
            let lines: Vec<&str> = title.lines().collect();
            let band = ((lines.len() as f64 + 0.8) * size * 1.25).ceil() as u32;
            let (header, rest) = body.split_vertically(band.min(nh / 3));
            let style = font(spec, 18.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            let cx = (header.dim_in_pixel().0 / 2) as i32;
            for (i, line) in lines.iter().enumerate() {
                let cy = ((i as f64 + 0.9) * size * 1.25) as i32;
                header.draw_text(line, &style, (cx, cy))?;
            }
            body = rest;
        }

        if let (true, Some(watermark)) = (glyphs, spec.watermark.as_deref()) {
            let size = spec.font_size(9.0);
            let band = (size * 2.2).ceil() as u32;
            let (w, h) = body.dim_in_pixel();
            let (rest, footer) = body.split_vertically(h.saturating_sub(band));
            let style = font(spec, 9.0, FontStyle::Italic)
                .color(&RGBColor(0x80, 0x80, 0x80))
                .pos(Pos::new(HPos::Center, VPos::Center));
            footer.draw_text(watermark, &style, ((w / 2) as i32, (band / 2) as i32))?;
            body = rest;
        }

        chart.draw(&body, spec)?;
        root.present()?;
    }

    let native = RgbImage::from_raw(nw, nh, buffer)
        .ok_or_else(|| Error::Drawing(format!("canvas buffer does not match {nw}x{nh}")))?;
    let plan = FitPlan::new((nw, nh), (spec.width, spec.height));
    debug!(?plan, "fitting to declared size");
    Ok(RenderedImage {
        image: plan.apply(native),
    })
}

/// Chart font scaled to the canvas
pub(crate) fn font(spec: &ChartSpec, base: f64, style: FontStyle) -> FontDesc<'static> {
    FontDesc::new(FontFamily::Name(FAMILY), spec.font_size(base), style)
}

/// Centred text style
pub(crate) fn centered(spec: &ChartSpec, base: f64, color: &RGBColor) -> TextStyle<'static> {
    font(spec, base, FontStyle::Normal)
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

/// Plain axis box for charts drawn without glyphs
pub(crate) fn draw_axes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x: (f64, f64),
    y: (f64, f64),
) -> Result<()> {
    let axis = ShapeStyle::from(&BLACK).stroke_width(1);
    area.draw(&PathElement::new(vec![(x.0, y.1), (x.0, y.0), (x.1, y.0)], axis))?;
    Ok(())
}

/// Chart context over f64 data coordinates
pub(crate) type Frame<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Frame with one unit of x per category and a numeric y axis
///
/// Category names are centred under each unit and the y axis carries a
/// light horizontal grid when glyphs are drawn.
pub(crate) fn category_frame<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    categories: &[String],
    y: (f64, f64),
    y_desc: Option<&str>,
) -> Result<Frame<'a, DB>> {
    let glyphs = spec.text.glyphs();
    let n = categories.len().max(1) as f64;
    let label_size = spec.font_size(10.0);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(if glyphs { (label_size * 2.5) as u32 } else { 0 })
        .y_label_area_size(if glyphs { (label_size * 6.0) as u32 } else { 0 })
        .build_cartesian_2d(0f64..n, y.0..y.1)?;

    if glyphs {
        let label = font(spec, 10.0, FontStyle::Normal);
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .x_labels(0)
            .y_labels(6)
            .label_style(label.clone())
            .axis_desc_style(label)
            .light_line_style(ShapeStyle::from(&RGBColor(0xEE, 0xEE, 0xEE)));
        if let Some(desc) = y_desc {
            mesh.y_desc(desc);
        }
        mesh.draw()?;

        let style = font(spec, 10.0, FontStyle::Normal)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let below = y.0 - (y.1 - y.0) * 0.015;
        chart.draw_series(
            categories
                .iter()
                .enumerate()
                .map(|(i, c)| Text::new(c.clone(), (i as f64 + 0.5, below), style.clone())),
        )?;
    } else {
        draw_axes(chart.plotting_area(), (0.0, n), y)?;
    }
    Ok(chart)
}
