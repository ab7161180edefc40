pub mod detection;
pub mod effect;
pub mod pipeline;
pub mod presentation;
pub mod recording;
pub mod shared;
pub mod video;
