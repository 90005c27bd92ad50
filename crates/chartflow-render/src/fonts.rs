//! Font registration for glyph rendering
//!
//! plotters draws text through `ab_glyph` from fonts registered at runtime.
//! Registration happens at most once per process.

use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Family name every chart asks for
pub const FAMILY: &str = "sans-serif";

const REGULAR: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Register the first readable font for every style; `true` on success
pub fn install_system_font() -> bool {
    *INSTALLED.get_or_init(|| {
        let Some(regular) = first_readable(REGULAR) else {
            warn!("no system font found, charts will be drawn without text");
            return false;
        };
        let bold = first_readable(BOLD).unwrap_or(regular);

        let ok = register(FontStyle::Normal, regular)
            && register(FontStyle::Bold, bold)
            && register(FontStyle::Italic, regular)
            && register(FontStyle::Oblique, regular);
        if !ok {
            warn!("system font could not be parsed, charts will be drawn without text");
        }
        ok
    })
}

fn first_readable(candidates: &[&str]) -> Option<&'static [u8]> {
    candidates.iter().find_map(|path| {
        let bytes = std::fs::read(Path::new(path)).ok()?;
        debug!(path, "font found");
        // registered fonts live for the rest of the process
        Some(&*Box::leak(bytes.into_boxed_slice()))
    })
}

fn register(style: FontStyle, bytes: &'static [u8]) -> bool {
    register_font(FAMILY, style, bytes).is_ok()
}
