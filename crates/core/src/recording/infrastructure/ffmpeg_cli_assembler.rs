use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::recording::domain::animation_assembler::AnimationAssembler;
use crate::recording::domain::command_runner::{check_program, run_checked, CommandRunner};
use crate::shared::constants::{FRAME_FILE_EXTENSION, FRAME_FILE_PREFIX, FRAME_NUMBER_WIDTH};
use crate::shared::error::TrifaceError;

/// Builds an animation with the `ffmpeg` command-line tool.
///
/// ffmpeg reads the numbered sequence through its own `%05d` pattern and
/// picks the container from the output extension.
pub struct FfmpegCliAssembler {
    runner: Box<dyn CommandRunner>,
    program: String,
    delay_cs: u32,
}

impl FfmpegCliAssembler {
    pub fn new(runner: Box<dyn CommandRunner>, delay_cs: u32) -> Self {
        Self {
            runner,
            program: "ffmpeg".to_string(),
            delay_cs,
        }
    }

    fn merge_args(&self, frames_dir: &Path, output: &Path) -> Vec<OsString> {
        let pattern = frames_dir.join(format!(
            "{FRAME_FILE_PREFIX}%0{FRAME_NUMBER_WIDTH}d.{FRAME_FILE_EXTENSION}"
        ));
        vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-framerate".into(),
            format!("100/{}", self.delay_cs.max(1)).into(),
            "-i".into(),
            pattern.into_os_string(),
            output.as_os_str().to_os_string(),
        ]
    }
}

impl AnimationAssembler for FfmpegCliAssembler {
    fn program(&self) -> &str {
        &self.program
    }

    fn check_installed(&self) -> Result<(), TrifaceError> {
        check_program(self.runner.as_ref(), &self.program)
    }

    fn assemble(
        &self,
        frames_dir: &Path,
        frames: &[PathBuf],
        output: &Path,
    ) -> Result<(), TrifaceError> {
        log::info!(
            "Merging {} frames into {} with {}",
            frames.len(),
            output.display(),
            self.program
        );
        run_checked(
            self.runner.as_ref(),
            &self.program,
            &self.merge_args(frames_dir, output),
        )
    }
}
