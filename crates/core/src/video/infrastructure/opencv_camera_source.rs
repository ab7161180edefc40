use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::shared::error::TrifaceError;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;
use crate::video::infrastructure::mat_convert::mat_to_frame;

/// Live camera capture through OpenCV `videoio`.
pub struct OpencvCameraSource {
    capture: VideoCapture,
    device_index: i32,
    frame_index: usize,
}

impl OpencvCameraSource {
    pub fn open(device_index: i32) -> Result<Self, TrifaceError> {
        let capture = VideoCapture::new(device_index, videoio::CAP_ANY).map_err(|e| {
            TrifaceError::Input(format!("cannot open camera {device_index}: {e}"))
        })?;
        let opened = capture.is_opened().unwrap_or(false);
        if !opened {
            return Err(TrifaceError::Input(format!(
                "camera {device_index} is not available"
            )));
        }
        log::info!("Opened camera {device_index}");
        Ok(Self {
            capture,
            device_index,
            frame_index: 0,
        })
    }

    pub fn device_index(&self) -> i32 {
        self.device_index
    }

    fn read_frame(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut mat = Mat::default();
        match self.capture.read(&mut mat) {
            Ok(true) if !mat.empty() => {
                let frame = mat_to_frame(&mat, self.frame_index);
                self.frame_index += 1;
                Some(frame)
            }
            Ok(_) => {
                log::info!("Camera {} delivered no frame", self.device_index);
                None
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl FrameSource for OpencvCameraSource {
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        Box::new(std::iter::from_fn(move || self.read_frame()))
    }

    fn close(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release camera {}: {e}", self.device_index);
        }
    }
}
