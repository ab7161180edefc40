#[cfg(feature = "opencv")]
pub mod opencv_cascade_classifier;
#[cfg(feature = "opencv")]
pub mod opencv_preprocessor;
