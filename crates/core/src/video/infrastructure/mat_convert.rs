//! Buffer conversions between OpenCV `Mat`s (BGR) and pipeline types (RGB).

use image::GrayImage;
use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Converts a capture `Mat` (BGR, BGRA or gray, 8-bit) into an RGB frame.
pub fn mat_to_frame(mat: &Mat, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let code = match mat.channels() {
        1 => imgproc::COLOR_GRAY2RGB,
        3 => imgproc::COLOR_BGR2RGB,
        4 => imgproc::COLOR_BGRA2RGB,
        n => return Err(format!("unsupported channel count from capture: {n}").into()),
    };
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(mat, &mut rgb, code)?;

    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let data = if rgb.is_continuous() {
        rgb.data_bytes()?.to_vec()
    } else {
        rgb.try_clone()?.data_bytes()?.to_vec()
    };
    Ok(Frame::new(data, width, height, 3, index))
}

/// Converts an RGB frame into a BGR `Mat` for display.
pub fn frame_to_mat(frame: &Frame) -> Result<Mat, Box<dyn std::error::Error>> {
    let flat = Mat::from_slice(frame.data())?;
    let shaped = flat.reshape(frame.channels() as i32, frame.height() as i32)?;
    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&*shaped, &mut bgr, imgproc::COLOR_RGB2BGR)?;
    Ok(bgr)
}

/// Wraps a grayscale image as a single-channel `Mat`, copying the pixels.
pub fn gray_to_mat(image: &GrayImage) -> Result<Mat, Box<dyn std::error::Error>> {
    let view = Mat::new_rows_cols_with_data(
        image.height() as i32,
        image.width() as i32,
        image.as_raw().as_slice(),
    )?;
    Ok(view.try_clone()?)
}
