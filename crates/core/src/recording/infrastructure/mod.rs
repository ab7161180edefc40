pub mod assembler_factory;
pub mod ffmpeg_cli_assembler;
pub mod imagemagick_assembler;
pub mod system_command_runner;
pub mod temp_frame_recorder;
