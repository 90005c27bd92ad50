//! Colour parsing, interpolation, palettes and the diverging heatmap scale

use crate::{Error, Result};
use plotters::style::RGBColor;

/// Grey used for undefined (NaN) values
pub const UNDEFINED_GREY: RGBColor = RGBColor(0xBD, 0xBD, 0xBD);
/// Fallback for categories without an assigned colour
pub const NEUTRAL_GREY: RGBColor = RGBColor(0x95, 0xA5, 0xA6);

/// Parse `#RRGGBB` (the `#` is optional)
pub fn parse_hex(s: &str) -> Result<RGBColor> {
    let digits = s.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(Error::InvalidColor(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// `#rrggbb`
pub fn to_hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// Channel-wise linear interpolation, `t` clamped to [0, 1]
pub fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Relative luminance in [0, 1], used to pick a readable text colour
pub fn luminance(c: RGBColor) -> f64 {
    (0.2126 * c.0 as f64 + 0.7152 * c.1 as f64 + 0.0722 * c.2 as f64) / 255.0
}

/// Three-anchor scale over [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergingScale {
    pub negative: RGBColor,
    pub neutral: RGBColor,
    pub positive: RGBColor,
    pub undefined: RGBColor,
}

impl Default for DivergingScale {
    /// Red, white, green
    fn default() -> Self {
        Self {
            negative: RGBColor(0xF8, 0x69, 0x6B),
            neutral: RGBColor(0xFF, 0xFF, 0xFF),
            positive: RGBColor(0x63, 0xBE, 0x7B),
            undefined: UNDEFINED_GREY,
        }
    }
}

impl DivergingScale {
    pub fn from_hex(negative: &str, neutral: &str, positive: &str) -> Result<Self> {
        Ok(Self {
            negative: parse_hex(negative)?,
            neutral: parse_hex(neutral)?,
            positive: parse_hex(positive)?,
            undefined: UNDEFINED_GREY,
        })
    }

    /// Colour of a value; out-of-range values are clamped, NaN is `undefined`
    pub fn color(&self, value: f64) -> RGBColor {
        if value.is_nan() {
            return self.undefined;
        }
        let v = value.clamp(-1.0, 1.0);
        if v < 0.0 {
            lerp(self.neutral, self.negative, -v)
        } else {
            lerp(self.neutral, self.positive, v)
        }
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> RGBColor {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    RGBColor(to_u8(r), to_u8(g), to_u8(b))
}

/// `n` colours with evenly spaced hues at constant saturation and lightness
pub fn hue_palette(n: usize) -> Vec<RGBColor> {
    (0..n)
        .map(|i| hsl_to_rgb(3.6 + 360.0 * i as f64 / n as f64, 0.65, 0.6))
        .collect()
}

/// Named category colours with a fallback for unknown names
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryColors {
    entries: Vec<(String, RGBColor)>,
    fallback: RGBColor,
}

impl Default for CategoryColors {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            fallback: NEUTRAL_GREY,
        }
    }
}

impl CategoryColors {
    /// From `(name, "#rrggbb")` pairs
    pub fn from_hex<S: AsRef<str>, H: AsRef<str>>(pairs: &[(S, H)]) -> Result<Self> {
        let entries = pairs
            .iter()
            .map(|(name, hex)| Ok((name.as_ref().to_string(), parse_hex(hex.as_ref())?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            entries,
            fallback: NEUTRAL_GREY,
        })
    }

    /// Assign `palette` to `names` in order, cycling when there are more names
    pub fn assign<S: AsRef<str>>(names: &[S], palette: &[RGBColor]) -> Self {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let color = if palette.is_empty() {
                    NEUTRAL_GREY
                } else {
                    palette[i % palette.len()]
                };
                (n.as_ref().to_string(), color)
            })
            .collect();
        Self {
            entries,
            fallback: NEUTRAL_GREY,
        }
    }

    pub fn with_fallback(mut self, fallback: RGBColor) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn get(&self, name: &str) -> RGBColor {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
            .unwrap_or(self.fallback)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }
}
