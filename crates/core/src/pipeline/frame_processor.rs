use std::time::Instant;

use crate::detection::domain::face_detector::FaceDetector;
use crate::effect::domain::frame_effect::FrameEffect;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// The per-frame core shared by both modes: detect faces, then apply the
/// effect to every detected region.
pub struct FrameProcessor {
    detector: Box<dyn FaceDetector>,
    effect: Box<dyn FrameEffect>,
}

impl FrameProcessor {
    pub fn new(detector: Box<dyn FaceDetector>, effect: Box<dyn FrameEffect>) -> Self {
        Self { detector, effect }
    }

    pub fn detect(
        &mut self,
        frame: &Frame,
        logger: &mut dyn PipelineLogger,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let start = Instant::now();
        let regions = self.detector.detect(frame)?;
        logger.timing("detect", elapsed_ms(start));
        logger.metric("regions", regions.len() as f64);
        log::debug!("frame {}: {} face(s)", frame.index(), regions.len());
        Ok(regions)
    }

    pub fn apply(
        &self,
        frame: &mut Frame,
        regions: &[Region],
        logger: &mut dyn PipelineLogger,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if regions.is_empty() {
            return Ok(());
        }
        let start = Instant::now();
        self.effect.apply(frame, regions)?;
        logger.timing("effect", elapsed_ms(start));
        Ok(())
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
