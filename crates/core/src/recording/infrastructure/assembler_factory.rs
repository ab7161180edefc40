use crate::recording::domain::animation_assembler::AnimationAssembler;
use crate::shared::options::MergeTool;

use super::ffmpeg_cli_assembler::FfmpegCliAssembler;
use super::imagemagick_assembler::ImageMagickAssembler;
use super::system_command_runner::SystemCommandRunner;

/// Creates the assembler for the chosen merge tool, running it through
/// the system process runner.
pub fn create_assembler(tool: MergeTool, delay_cs: u32) -> Box<dyn AnimationAssembler> {
    log::info!("Using {} to assemble animations (delay={delay_cs}cs)", tool.program());
    let runner = Box::new(SystemCommandRunner::new());
    match tool {
        MergeTool::ImageMagick => Box::new(ImageMagickAssembler::new(runner, delay_cs)),
        MergeTool::Ffmpeg => Box::new(FfmpegCliAssembler::new(runner, delay_cs)),
    }
}
