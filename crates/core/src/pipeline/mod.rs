pub mod capabilities;
pub mod frame_processor;
pub mod pipeline_logger;
pub mod session;
pub mod triangulate_image_use_case;
pub mod triangulate_stream_use_case;
