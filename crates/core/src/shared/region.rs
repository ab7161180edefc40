/// A classifier hit in the coordinate space of the downsampled detection
/// image, with the number of neighboring raw hits that were merged into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detection {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub neighbors: i32,
}

impl Detection {
    /// Maps the box back to frame coordinates and clamps it to the frame.
    ///
    /// Returns `None` when nothing of the box remains inside the frame.
    pub fn to_region(&self, scale: u32, frame_width: u32, frame_height: u32) -> Option<Region> {
        let s = scale as i64;
        let x0 = (self.x as i64 * s).clamp(0, frame_width as i64);
        let y0 = (self.y as i64 * s).clamp(0, frame_height as i64);
        let x1 = ((self.x as i64 + self.width as i64) * s).clamp(0, frame_width as i64);
        let y1 = ((self.y as i64 + self.height as i64) * s).clamp(0, frame_height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
            neighbors: self.neighbors,
        })
    }
}

/// A face box in full-resolution frame coordinates, always inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub neighbors: i32,
}

impl Region {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x as u64 + self.width as u64 <= frame_width as u64
            && self.y as u64 + self.height as u64 <= frame_height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn detection(x: i32, y: i32, w: i32, h: i32) -> Detection {
        Detection {
            x,
            y,
            width: w,
            height: h,
            neighbors: 3,
        }
    }

    #[test]
    fn test_to_region_scales_by_factor() {
        let region = detection(10, 20, 30, 40).to_region(2, 640, 480).unwrap();
        assert_eq!(
            region,
            Region {
                x: 20,
                y: 40,
                width: 60,
                height: 80,
                neighbors: 3,
            }
        );
    }

    #[test]
    fn test_to_region_clamps_overhang() {
        // Downsampled 161x121 image of a 321x241 frame: the last pixel maps past the edge
        let region = detection(150, 110, 11, 11).to_region(2, 321, 241).unwrap();
        assert_eq!(region.x, 300);
        assert_eq!(region.width, 21);
        assert_eq!(region.y, 220);
        assert_eq!(region.height, 21);
        assert!(region.fits_within(321, 241));
    }

    #[rstest]
    #[case::negative_origin(detection(-5, -5, 20, 20), 640, 480)]
    #[case::far_right(detection(300, 10, 50, 50), 640, 480)]
    #[case::far_bottom(detection(10, 230, 50, 50), 640, 480)]
    #[case::whole_frame(detection(0, 0, 320, 240), 640, 480)]
    #[case::tiny_frame(detection(0, 0, 5, 5), 3, 3)]
    fn test_to_region_always_inside_frame(
        #[case] d: Detection,
        #[case] fw: u32,
        #[case] fh: u32,
    ) {
        let region = d.to_region(2, fw, fh).unwrap();
        assert!(region.fits_within(fw, fh), "{region:?} exceeds {fw}x{fh}");
    }

    #[rstest]
    #[case::left_of_frame(detection(-30, 10, 10, 10))]
    #[case::right_of_frame(detection(400, 10, 10, 10))]
    #[case::zero_width(detection(10, 10, 0, 10))]
    fn test_to_region_drops_empty_boxes(#[case] d: Detection) {
        assert!(d.to_region(2, 640, 480).is_none());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Region {
            x: 10,
            y: 10,
            width: 5,
            height: 5,
            neighbors: 0,
        };
        assert!(r.contains(10, 10));
        assert!(r.contains(14, 14));
        assert!(!r.contains(15, 14));
        assert!(!r.contains(9, 12));
    }

    #[test]
    fn test_area() {
        let r = Region {
            x: 0,
            y: 0,
            width: 7,
            height: 3,
            neighbors: 0,
        };
        assert_eq!(r.area(), 21);
    }
}
