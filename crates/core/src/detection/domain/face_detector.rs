use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection on full-resolution frames.
///
/// Returned regions are in frame coordinates and lie inside the frame.
pub trait FaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
