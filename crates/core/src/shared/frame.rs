use ndarray::{ArrayView3, ArrayViewMut3, Axis};

/// Row order of a pixel buffer as delivered by the capture device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    TopLeft,
    BottomLeft,
}

/// A single captured or loaded frame: 8-bit RGB bytes in row-major order.
///
/// Channel reordering (BGR from OpenCV) happens at I/O boundaries only;
/// everything inside the pipeline sees RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
    origin: Origin,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
            origin: Origin::TopLeft,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Flips bottom-left frames so row 0 is the top row. No-op otherwise.
    pub fn into_top_left(mut self) -> Self {
        if self.origin == Origin::BottomLeft {
            self.flip_vertical();
            self.origin = Origin::TopLeft;
        }
        self
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn flip_vertical(&mut self) {
        let flipped = {
            let mut view = self.as_ndarray();
            view.invert_axis(Axis(0));
            view.iter().copied().collect::<Vec<u8>>()
        };
        self.data = flipped;
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
