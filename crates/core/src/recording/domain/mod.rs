pub mod animation_assembler;
pub mod command_runner;
