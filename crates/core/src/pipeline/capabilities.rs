use crate::recording::domain::animation_assembler::AnimationAssembler;
use crate::shared::error::TrifaceError;
use crate::shared::options::RunOptions;

/// Whether this build carries the OpenCV detection, capture and display
/// adapters.
pub const fn opencv_available() -> bool {
    cfg!(feature = "opencv")
}

/// Verifies every external capability the run will need before any frame
/// is touched.
///
/// `assembler` is only consulted when the run records frames.
pub fn check_capabilities(
    options: &RunOptions,
    assembler: Option<&dyn AnimationAssembler>,
) -> Result<(), TrifaceError> {
    check(opencv_available(), options, assembler)
}

fn check(
    has_opencv: bool,
    options: &RunOptions,
    assembler: Option<&dyn AnimationAssembler>,
) -> Result<(), TrifaceError> {
    if !has_opencv {
        return Err(TrifaceError::DependencyMissing(
            "opencv (rebuild with the `opencv` feature)".into(),
        ));
    }
    if !options.records_frames() {
        return Ok(());
    }

    let assembler = assembler.ok_or_else(|| {
        TrifaceError::DependencyMissing(format!(
            "{} (no assembler configured)",
            options.merge_tool.program()
        ))
    })?;
    match assembler.check_installed() {
        Ok(()) => {
            log::debug!("{} is available", assembler.program());
            Ok(())
        }
        Err(TrifaceError::DependencyMissing(what)) => Err(TrifaceError::DependencyMissing(what)),
        Err(e) => Err(TrifaceError::DependencyMissing(format!(
            "{} (check failed: {e})",
            assembler.program()
        ))),
    }
}
