use std::path::{Path, PathBuf};

use crate::shared::error::TrifaceError;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Adapts a single image file to the [`FrameSource`] interface.
///
/// The image is decoded eagerly on open so a bad path fails before the
/// pipeline starts; `frames()` then yields it once.
pub struct ImageFileSource {
    path: PathBuf,
    frame: Option<Frame>,
}

impl ImageFileSource {
    pub fn open(path: &Path) -> Result<Self, TrifaceError> {
        let img = image::open(path).map_err(|e| {
            TrifaceError::Input(format!("cannot read image {}: {e}", path.display()))
        })?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        log::debug!("Loaded {} ({width}x{height})", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            frame: Some(Frame::new(rgb.into_raw(), width, height, 3, 0)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for ImageFileSource {
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        Box::new(self.frame.take().into_iter().map(Ok))
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
