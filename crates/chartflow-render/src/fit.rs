//! Exact-size step between the native canvas and the declared output size

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tracing::debug;

/// How a native image reaches the declared size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPlan {
    /// Sizes already match
    Identity,
    /// Direct resize; non-uniform only for a square target
    Stretch { width: u32, height: u32 },
    /// Uniform scale to fit, centred on a white canvas of the declared size
    Letterbox {
        width: u32,
        height: u32,
        scaled: (u32, u32),
        offset: (u32, u32),
    },
}

impl FitPlan {
    /// Choose the plan for a native size and a declared size
    pub fn new(native: (u32, u32), target: (u32, u32)) -> Self {
        let (nw, nh) = native;
        let (tw, th) = target;
        if native == target {
            return FitPlan::Identity;
        }
        // equal aspect ratio, compared without rounding
        let same_aspect = nw as u64 * th as u64 == nh as u64 * tw as u64;
        if same_aspect || tw == th {
            return FitPlan::Stretch {
                width: tw,
                height: th,
            };
        }
        let scale = (tw as f64 / nw as f64).min(th as f64 / nh as f64);
        let sw = ((nw as f64 * scale).round() as u32).clamp(1, tw);
        let sh = ((nh as f64 * scale).round() as u32).clamp(1, th);
        FitPlan::Letterbox {
            width: tw,
            height: th,
            scaled: (sw, sh),
            offset: ((tw - sw) / 2, (th - sh) / 2),
        }
    }

    /// Apply the plan with a triangle filter
    pub fn apply(&self, image: RgbImage) -> RgbImage {
        match *self {
            FitPlan::Identity => image,
            FitPlan::Stretch { width, height } => {
                debug!(from = ?image.dimensions(), to = ?(width, height), "resizing");
                imageops::resize(&image, width, height, FilterType::Triangle)
            }
            FitPlan::Letterbox {
                width,
                height,
                scaled,
                offset,
            } => {
                debug!(from = ?image.dimensions(), to = ?(width, height), "letterboxing");
                let resized = imageops::resize(&image, scaled.0, scaled.1, FilterType::Triangle);
                let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
                imageops::overlay(&mut canvas, &resized, offset.0 as i64, offset.1 as i64);
                canvas
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_selection() {
        assert_eq!(FitPlan::new((512, 512), (512, 512)), FitPlan::Identity);
        assert_eq!(
            FitPlan::new((800, 800), (512, 512)),
            FitPlan::Stretch { width: 512, height: 512 }
        );
        // square target accepts a non-uniform resize
        assert_eq!(
            FitPlan::new((640, 480), (512, 512)),
            FitPlan::Stretch { width: 512, height: 512 }
        );
        assert_eq!(
            FitPlan::new((3000, 1800), (1500, 900)),
            FitPlan::Stretch { width: 1500, height: 900 }
        );
        assert_eq!(
            FitPlan::new((1000, 1000), (1500, 900)),
            FitPlan::Letterbox {
                width: 1500,
                height: 900,
                scaled: (900, 900),
                offset: (300, 0)
            }
        );
    }

    #[test]
    fn test_apply_hits_exact_size() {
        let native = RgbImage::from_pixel(800, 800, Rgb([10, 20, 30]));
        let out = FitPlan::new((800, 800), (512, 512)).apply(native);
        assert_eq!(out.dimensions(), (512, 512));

        let native = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let out = FitPlan::new((100, 100), (150, 90)).apply(native);
        assert_eq!(out.dimensions(), (150, 90));
        // letterbox margin stays white, centre is the image
        assert_eq!(out.get_pixel(0, 45), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(75, 45), &Rgb([0, 0, 0]));
    }
}
