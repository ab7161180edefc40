use std::path::{Path, PathBuf};

use crate::shared::error::TrifaceError;

/// Merges a numbered frame sequence into one animated file.
pub trait AnimationAssembler {
    /// Name of the external program doing the work.
    fn program(&self) -> &str;

    /// Checks that the tool can be run at all.
    fn check_installed(&self) -> Result<(), TrifaceError>;

    /// `frames` are sorted and all live in `frames_dir`.
    fn assemble(
        &self,
        frames_dir: &Path,
        frames: &[PathBuf],
        output: &Path,
    ) -> Result<(), TrifaceError>;
}
