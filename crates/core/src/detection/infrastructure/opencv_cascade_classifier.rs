use std::path::Path;

use image::GrayImage;
use opencv::core::{Rect, Size, Vector};
use opencv::objdetect;
use opencv::prelude::*;

use crate::detection::domain::cascade_classifier::{CascadeClassifier, CascadeParams};
use crate::shared::error::TrifaceError;
use crate::shared::options::DetectionMode;
use crate::shared::region::Detection;
use crate::video::infrastructure::mat_convert::gray_to_mat;

/// Haar/LBP cascade from OpenCV `objdetect`.
pub struct OpencvCascadeClassifier {
    inner: objdetect::CascadeClassifier,
}

impl OpencvCascadeClassifier {
    pub fn load(path: &Path) -> Result<Self, TrifaceError> {
        let model_load = |reason: String| TrifaceError::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| model_load("path is not valid UTF-8".into()))?;

        let inner =
            objdetect::CascadeClassifier::new(path_str).map_err(|e| model_load(e.to_string()))?;
        if inner.empty().map_err(|e| model_load(e.to_string()))? {
            return Err(model_load("file is not a cascade classifier".into()));
        }
        log::info!("Loaded cascade {}", path.display());
        Ok(Self { inner })
    }
}

impl CascadeClassifier for OpencvCascadeClassifier {
    fn detect_objects(
        &mut self,
        image: &GrayImage,
        params: &CascadeParams,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let mat = gray_to_mat(image)?;
        let flags = match params.mode {
            DetectionMode::LargestOnly => objdetect::CASCADE_FIND_BIGGEST_OBJECT,
            DetectionMode::All => 0,
        };

        let mut objects = Vector::<Rect>::new();
        let mut neighbors = Vector::<i32>::new();
        self.inner.detect_multi_scale2(
            &mat,
            &mut objects,
            &mut neighbors,
            params.scale_step,
            params.min_neighbors,
            flags,
            Size::new(params.min_size.0 as i32, params.min_size.1 as i32),
            Size::new(0, 0),
        )?;

        Ok(objects
            .iter()
            .enumerate()
            .map(|(i, r)| Detection {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                neighbors: neighbors.get(i).unwrap_or(0),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_model_load_error() {
        let err = OpencvCascadeClassifier::load(Path::new("/nonexistent/cascade.xml"))
            .err()
            .expect("loading a missing cascade must fail");
        assert!(matches!(err, TrifaceError::ModelLoad { .. }));
    }

    #[test]
    fn test_load_garbage_file_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cascade.xml");
        std::fs::write(&path, b"<not-a-cascade/>").unwrap();
        let err = OpencvCascadeClassifier::load(&path).err().unwrap();
        assert!(matches!(err, TrifaceError::ModelLoad { .. }));
    }
}
