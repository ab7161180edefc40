use crate::shared::frame::Frame;

/// Yields frames from a camera or a still image.
///
/// The sequence is lazy and cannot be rewound. It ends when the device
/// stops delivering frames; a still image yields exactly one frame.
pub trait FrameSource {
    fn frames(&mut self)
        -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases the underlying device or buffer.
    fn close(&mut self);
}
