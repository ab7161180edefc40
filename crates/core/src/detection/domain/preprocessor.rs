use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};

use crate::shared::frame::Frame;

/// Turns a full-resolution RGB frame into the small equalized grayscale
/// image the cascade runs on.
pub trait FramePreprocessor {
    /// Integer factor the frame shrinks by; detections scale back by it.
    fn scale(&self) -> u32;

    fn prepare(&self, frame: &Frame) -> Result<GrayImage, Box<dyn std::error::Error>>;
}

/// Size of the detection image for a `width`×`height` frame: each side
/// divided by `scale` and rounded, at least 1.
pub fn detection_size(scale: u32, width: u32, height: u32) -> (u32, u32) {
    let shrink = |v: u32| ((v as f64 / scale.max(1) as f64).round() as u32).max(1);
    (shrink(width), shrink(height))
}

/// Pure-Rust preprocessing: BT.601 grayscale, bilinear shrink, CDF
/// equalization.
///
/// Builds carrying OpenCV use `OpencvPreprocessor` instead; this one
/// backs tests and builds without it.
#[derive(Clone, Copy, Debug)]
pub struct Preprocessor {
    scale: u32,
}

impl Preprocessor {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        detection_size(self.scale, width, height)
    }
}

impl FramePreprocessor for Preprocessor {
    fn scale(&self) -> u32 {
        self.scale
    }

    fn prepare(&self, frame: &Frame) -> Result<GrayImage, Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        let rgb = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("frame buffer does not match its dimensions")?;
        let gray = to_gray_bt601(&rgb);

        let (w, h) = self.target_size(frame.width(), frame.height());
        let mut small = if (w, h) == gray.dimensions() {
            gray
        } else {
            imageops::resize(&gray, w, h, FilterType::Triangle)
        };
        equalize_histogram(&mut small);
        Ok(small)
    }
}

/// `Y = 0.299 R + 0.587 G + 0.114 B` in the 14-bit fixed point OpenCV
/// uses for `COLOR_RGB2GRAY`.
pub fn to_gray_bt601(rgb: &RgbImage) -> GrayImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let y = (r as u32 * R + g as u32 * G + b as u32 * B + (1 << 13)) >> 14;
        Luma([y.min(255) as u8])
    })
}

/// Spreads intensities over the full 0..=255 range using the CDF.
///
/// The darkest occupied level maps to 0, the brightest to 255. A uniform
/// image keeps its value.
pub fn equalize_histogram(image: &mut GrayImage) {
    let mut hist = [0u64; 256];
    for p in image.pixels() {
        hist[p.0[0] as usize] += 1;
    }
    let total: u64 = hist.iter().sum();
    let Some(first) = hist.iter().position(|&c| c > 0) else {
        return;
    };
    if hist[first] == total {
        return;
    }

    let mut lut = [0u8; 256];
    let scale = 255.0 / (total - hist[first]) as f64;
    let mut cumulative = 0u64;
    for level in (first + 1)..256 {
        cumulative += hist[level];
        lut[level] = (cumulative as f64 * scale).round().min(255.0) as u8;
    }

    for p in image.pixels_mut() {
        p.0[0] = lut[p.0[0] as usize];
    }
}
