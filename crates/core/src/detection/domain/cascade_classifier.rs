use image::GrayImage;

use crate::shared::constants::{HAAR_SCALE_STEP, MIN_NEIGHBORS, MIN_OBJECT_SIZE};
use crate::shared::options::DetectionMode;
use crate::shared::region::Detection;

/// Tuning passed through to the cascade classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CascadeParams {
    /// Pyramid step between detection scales (> 1.0).
    pub scale_step: f64,
    /// Raw hits required before a candidate is reported.
    pub min_neighbors: i32,
    /// Smallest object considered, in detection-image pixels.
    pub min_size: (u32, u32),
    pub mode: DetectionMode,
}

impl CascadeParams {
    pub fn with_mode(mode: DetectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            scale_step: HAAR_SCALE_STEP,
            min_neighbors: MIN_NEIGHBORS,
            min_size: MIN_OBJECT_SIZE,
            mode: DetectionMode::LargestOnly,
        }
    }
}

/// A loaded cascade model that finds objects in a preprocessed image.
///
/// Boxes are returned in the coordinates of `image`.
pub trait CascadeClassifier {
    fn detect_objects(
        &mut self,
        image: &GrayImage,
        params: &CascadeParams,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
