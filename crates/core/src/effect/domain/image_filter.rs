use image::RgbImage;

/// A whole-image effect working on the generic `image` representation.
///
/// The result may be smaller than the input when the effect only covers
/// whole tiles; it is never larger.
pub trait ImageFilter {
    fn filter(
        &self,
        image: &RgbImage,
        tile_size: u32,
    ) -> Result<RgbImage, Box<dyn std::error::Error>>;
}
