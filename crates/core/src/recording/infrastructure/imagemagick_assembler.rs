use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::recording::domain::animation_assembler::AnimationAssembler;
use crate::recording::domain::command_runner::{check_program, run_checked, CommandRunner};
use crate::shared::constants::{FRAME_FILE_EXTENSION, FRAME_FILE_PREFIX};
use crate::shared::error::TrifaceError;

/// Builds an animation with ImageMagick's `convert`.
///
/// The frames go in as one `frame_*.png` pattern that `convert` expands
/// itself in sorted order, so long sessions stay under the argument limit.
pub struct ImageMagickAssembler {
    runner: Box<dyn CommandRunner>,
    program: String,
    delay_cs: u32,
}

impl ImageMagickAssembler {
    pub fn new(runner: Box<dyn CommandRunner>, delay_cs: u32) -> Self {
        Self {
            runner,
            program: "convert".to_string(),
            delay_cs,
        }
    }

    fn merge_args(&self, frames_dir: &Path, output: &Path) -> Vec<OsString> {
        let pattern = frames_dir.join(format!("{FRAME_FILE_PREFIX}*.{FRAME_FILE_EXTENSION}"));
        vec![
            "-delay".into(),
            self.delay_cs.to_string().into(),
            "-loop".into(),
            "0".into(),
            pattern.into_os_string(),
            output.as_os_str().to_os_string(),
        ]
    }
}

impl AnimationAssembler for ImageMagickAssembler {
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
