pub mod frame_effect;
pub mod image_filter;
