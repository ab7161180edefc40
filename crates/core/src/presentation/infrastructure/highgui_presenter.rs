use opencv::highgui;

use crate::presentation::domain::frame_presenter::FramePresenter;
use crate::shared::frame::Frame;
use crate::video::infrastructure::mat_convert::frame_to_mat;

/// Shows frames in a named OpenCV `highgui` window.
pub struct HighguiPresenter {
    window: String,
    open: bool,
}

impl HighguiPresenter {
    pub fn new(window: &str) -> Result<Self, Box<dyn std::error::Error>> {
        highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            window: window.to_string(),
            open: true,
        })
    }
}

impl FramePresenter for HighguiPresenter {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mat = frame_to_mat(frame)?;
        highgui::imshow(&self.window, &mat)?;
        Ok(())
    }

    fn wait_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>> {
        let key = highgui::wait_key(delay_ms)?;
        Ok((key >= 0).then_some(key))
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = highgui::destroy_window(&self.window) {
            log::warn!("Failed to close window {}: {e}", self.window);
        }
    }
}

impl Drop for HighguiPresenter {
    fn drop(&mut self) {
        self.close();
    }
}
