pub mod cascade_classifier;
pub mod cascade_face_detector;
pub mod face_detector;
pub mod preprocessor;
