pub mod image_file_source;
pub mod image_file_writer;
#[cfg(feature = "opencv")]
pub mod mat_convert;
#[cfg(feature = "opencv")]
pub mod opencv_camera_source;
