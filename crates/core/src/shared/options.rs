use std::path::{Path, PathBuf};

use crate::shared::constants::{
    DEFAULT_CASCADE_PATH, DEFAULT_FRAME_DELAY_CS, DEFAULT_TEMP_DIR_NAME, DEFAULT_TILE_SIZE,
};
use crate::shared::error::TrifaceError;

/// Where frames come from: a camera device or a single image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    Camera(i32),
    Image(PathBuf),
}

impl InputSource {
    /// Digits-only arguments name a camera; anything else must be an
    /// existing file.
    pub fn parse(arg: &str) -> Result<Self, TrifaceError> {
        if arg.is_empty() {
            return Err(TrifaceError::Input("input argument is empty".into()));
        }
        if arg.bytes().all(|b| b.is_ascii_digit()) {
            let index = arg
                .parse::<i32>()
                .map_err(|_| TrifaceError::Input(format!("camera index out of range: {arg}")))?;
            return Ok(Self::Camera(index));
        }
        let path = Path::new(arg);
        if !path.is_file() {
            return Err(TrifaceError::Input(format!(
                "not a camera index or readable image: {arg}"
            )));
        }
        Ok(Self::Image(path.to_path_buf()))
    }

    pub fn is_camera(&self) -> bool {
        matches!(self, Self::Camera(_))
    }
}

/// Which cascade hits to keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionMode {
    LargestOnly,
    All,
}

/// External program that turns numbered frames into an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeTool {
    ImageMagick,
    Ffmpeg,
}

impl MergeTool {
    pub fn program(&self) -> &'static str {
        match self {
            Self::ImageMagick => "convert",
            Self::Ffmpeg => "ffmpeg",
        }
    }
}

/// Immutable configuration for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub input: InputSource,
    /// `None` until the user names a cascade file.
    pub cascade_path: Option<PathBuf>,
    /// 0 selects a tile size from the region dimensions.
    pub tile_size: u32,
    pub output: Option<PathBuf>,
    pub detection_mode: DetectionMode,
    pub temp_dir: PathBuf,
    pub merge_tool: MergeTool,
    pub frame_delay_cs: u32,
}

impl RunOptions {
    pub fn new(input: InputSource) -> Self {
        Self {
            input,
            cascade_path: None,
            tile_size: DEFAULT_TILE_SIZE,
            output: None,
            detection_mode: DetectionMode::LargestOnly,
            temp_dir: default_temp_dir(),
            merge_tool: MergeTool::ImageMagick,
            frame_delay_cs: DEFAULT_FRAME_DELAY_CS,
        }
    }

    /// Camera sessions with an output path record frames for the animation.
    pub fn records_frames(&self) -> bool {
        self.input.is_camera() && self.output.is_some()
    }

    pub fn cascade_path(&self) -> &Path {
        self.cascade_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CASCADE_PATH))
    }

    /// Only the default cascade may be fetched when it is missing.
    pub fn uses_default_cascade(&self) -> bool {
        self.cascade_path.is_none()
    }
}

pub fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_TEMP_DIR_NAME)
}
