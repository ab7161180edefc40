use crate::shared::frame::Frame;

/// An on-screen surface that shows frames and reports key presses.
pub trait FramePresenter {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Blocks up to `delay_ms` for a key press; `0` waits indefinitely.
    /// Returns the key code, or `None` on timeout.
    fn wait_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>>;

    fn close(&mut self);
}
