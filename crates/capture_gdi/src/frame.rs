//! Captured pixel buffers

use image::RgbImage;

/// Raw pixels read from the screen: RGB, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl FrameData {
    pub const BYTES_PER_PIXEL: usize = 3;

    /// View the buffer as an `image` RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("frame buffer size matches dimensions")
    }

    pub fn len_bytes(&self) -> usize {
        self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }
}
