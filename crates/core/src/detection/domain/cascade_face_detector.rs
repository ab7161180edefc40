use std::time::Instant;

use crate::detection::domain::cascade_classifier::{CascadeClassifier, CascadeParams};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::preprocessor::FramePreprocessor;
use crate::shared::frame::Frame;
use crate::shared::options::DetectionMode;
use crate::shared::region::{Detection, Region};

/// Runs a cascade on a shrunken copy of each frame and maps the hits back.
pub struct CascadeFaceDetector {
    preprocessor: Box<dyn FramePreprocessor>,
    classifier: Box<dyn CascadeClassifier>,
    params: CascadeParams,
}

impl CascadeFaceDetector {
    pub fn new(
        preprocessor: Box<dyn FramePreprocessor>,
        classifier: Box<dyn CascadeClassifier>,
        params: CascadeParams,
    ) -> Self {
        Self {
            preprocessor,
            classifier,
            params,
        }
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let small = self.preprocessor.prepare(frame)?;

        let start = Instant::now();
        let mut hits = self.classifier.detect_objects(&small, &self.params)?;
        log::debug!(
            "detection time = {:.1}ms ({} hits)",
            start.elapsed().as_secs_f64() * 1000.0,
            hits.len()
        );

        if self.params.mode == DetectionMode::LargestOnly {
            hits = largest(hits).into_iter().collect();
        }

        let scale = self.preprocessor.scale();
        Ok(hits
            .iter()
            .filter_map(|d| d.to_region(scale, frame.width(), frame.height()))
            .collect())
    }
}

fn largest(hits: Vec<Detection>) -> Option<Detection> {
    hits.into_iter()
        .max_by_key(|d| d.width.max(0) as i64 * d.height.max(0) as i64)
}
