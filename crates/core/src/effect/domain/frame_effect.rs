use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Applies an effect to the given regions of a frame, in place.
///
/// Regions are handled one after another; each is fully written back
/// before the next is read, so overlapping regions see earlier output.
pub trait FrameEffect {
    fn apply(&self, frame: &mut Frame, regions: &[Region])
        -> Result<(), Box<dyn std::error::Error>>;
}
