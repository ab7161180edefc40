use image::GrayImage;
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;

use crate::detection::domain::preprocessor::{detection_size, FramePreprocessor};
use crate::shared::frame::Frame;
use crate::video::infrastructure::mat_convert::frame_to_mat;

/// Preprocessing through OpenCV `imgproc`: `COLOR_BGR2GRAY`, an
/// `INTER_LINEAR` shrink and `equalize_hist`.
///
/// These are the pixels the stock Haar cascades were tuned against.
#[derive(Clone, Copy, Debug)]
pub struct OpencvPreprocessor {
    scale: u32,
}

impl OpencvPreprocessor {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }
}

impl FramePreprocessor for OpencvPreprocessor {
    fn scale(&self) -> u32 {
        self.scale
    }

    fn prepare(&self, frame: &Frame) -> Result<GrayImage, Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        let bgr = frame_to_mat(frame)?;

        let mut gray = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut gray, imgproc::COLOR_BGR2GRAY)?;

        let (w, h) = detection_size(self.scale, frame.width(), frame.height());
        let mut small = Mat::default();
        imgproc::resize(
            &gray,
            &mut small,
            Size::new(w as i32, h as i32),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;

        let mut equalized = Mat::default();
        imgproc::equalize_hist(&small, &mut equalized)?;

        let data = equalized.data_bytes()?.to_vec();
        GrayImage::from_raw(w, h, data).ok_or_else(|| "equalized image size mismatch".into())
    }
}
