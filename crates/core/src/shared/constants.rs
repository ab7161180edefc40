pub const DEFAULT_CASCADE_PATH: &str =
    "/usr/share/opencv4/haarcascades/haarcascade_frontalface_alt.xml";
pub const CASCADE_FILE_NAME: &str = "haarcascade_frontalface_alt.xml";
pub const CASCADE_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_frontalface_alt.xml";

/// Integer ratio by which frames shrink before detection.
pub const IMAGE_SCALE: u32 = 2;

// Cascade tuning, fast settings for live video.
pub const HAAR_SCALE_STEP: f64 = 1.2;
pub const MIN_NEIGHBORS: i32 = 2;
pub const MIN_OBJECT_SIZE: (u32, u32) = (20, 20);

pub const DEFAULT_TILE_SIZE: u32 = 30;

pub const WINDOW_NAME: &str = "result";

/// Key poll timeout between camera frames.
pub const KEY_POLL_MS: i32 = 10;

pub const FRAME_FILE_PREFIX: &str = "frame_";
pub const FRAME_FILE_EXTENSION: &str = "png";
pub const FRAME_NUMBER_WIDTH: usize = 5;
pub const DEFAULT_TEMP_DIR_NAME: &str = "triface-frames";

/// Delay between animation frames in hundredths of a second.
pub const DEFAULT_FRAME_DELAY_CS: u32 = 10;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
