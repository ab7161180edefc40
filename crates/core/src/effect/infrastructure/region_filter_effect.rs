use image::RgbImage;
use ndarray::{s, ArrayView3};

use crate::effect::domain::frame_effect::FrameEffect;
use crate::effect::domain::image_filter::ImageFilter;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Crops each region, runs an [`ImageFilter`] on it and pastes the result
/// back where it came from.
///
/// Only the area the filter returns is written; when the filter trims the
/// crop, the uncovered right and bottom edges of the region keep their
/// original pixels.
pub struct RegionFilterEffect {
    filter: Box<dyn ImageFilter>,
    tile_size: u32,
}

impl RegionFilterEffect {
    pub fn new(filter: Box<dyn ImageFilter>, tile_size: u32) -> Self {
        Self { filter, tile_size }
    }
}

impl FrameEffect for RegionFilterEffect {
    fn apply(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        for region in regions {
            if region.width == 0 || region.height == 0 {
                continue;
            }
            if !region.fits_within(frame.width(), frame.height()) {
                return Err(format!(
                    "region {region:?} exceeds {}x{} frame",
                    frame.width(),
                    frame.height()
                )
                .into());
            }
            let crop = crop_region(frame, region)?;
            let filtered = self.filter.filter(&crop, self.tile_size)?;
            paste_region(frame, region, &filtered)?;
        }
        Ok(())
    }
}

fn crop_region(frame: &Frame, r: &Region) -> Result<RgbImage, Box<dyn std::error::Error>> {
    let (x, y) = (r.x as usize, r.y as usize);
    let (w, h) = (r.width as usize, r.height as usize);
    let view = frame.as_ndarray();
    let data: Vec<u8> = view.slice(s![y..y + h, x..x + w, ..]).iter().copied().collect();
    RgbImage::from_raw(r.width, r.height, data).ok_or_else(|| "crop buffer size mismatch".into())
}

fn paste_region(
    frame: &mut Frame,
    r: &Region,
    image: &RgbImage,
) -> Result<(), Box<dyn std::error::Error>> {
    let w = image.width().min(r.width) as usize;
    let h = image.height().min(r.height) as usize;
    if w == 0 || h == 0 {
        return Ok(());
    }
    if image.width() > r.width || image.height() > r.height {
        log::warn!(
            "Filter grew {}x{} region to {}x{}, clipping",
            r.width,
            r.height,
            image.width(),
            image.height()
        );
    }

    let src = ArrayView3::from_shape(
        (image.height() as usize, image.width() as usize, 3),
        image.as_raw(),
    )?;
    let (x, y) = (r.x as usize, r.y as usize);
    frame
        .as_ndarray_mut()
        .slice_mut(s![y..y + h, x..x + w, ..])
        .assign(&src.slice(s![..h, ..w, ..]));
    Ok(())
}
