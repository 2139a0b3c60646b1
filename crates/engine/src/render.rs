//! Frame compositing: stretch scale plus the pointer crosshair

use capture_gdi::FrameData;
use image::{imageops, Rgb, RgbImage};

/// Crosshair arm length in display pixels.
pub const CROSSHAIR_LEN: i32 = 20;
/// Crosshair line thickness in display pixels.
pub const CROSSHAIR_THICKNESS: i32 = 2;
/// Crosshair color.
pub const CROSSHAIR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Stretch-fit a captured frame to the display window's size.
///
/// The selection and display rectangles share an aspect ratio by
/// construction, so this is a direct stretch with no letterboxing.
pub fn scale_frame(frame: &FrameData, width: u32, height: u32) -> RgbImage {
    let img = frame.to_rgb_image();
    if img.dimensions() == (width, height) {
        return img;
    }
    imageops::resize(&img, width, height, imageops::FilterType::Triangle)
}

/// Composite the crosshair at the mapped pointer position.
///
/// Drawn after scaling, so its on-screen size is independent of the capture
/// resolution. Segments reaching past the frame edges are clipped.
pub fn draw_crosshair(img: &mut RgbImage, center: (i32, i32)) {
    let (cx, cy) = center;
    let half = CROSSHAIR_LEN / 2;
    let t = CROSSHAIR_THICKNESS;

    // Horizontal arm, then vertical arm.
    fill_rect(img, cx - half, cy - t / 2, CROSSHAIR_LEN, t, CROSSHAIR_COLOR);
    fill_rect(img, cx - t / 2, cy - half, t, CROSSHAIR_LEN, CROSSHAIR_COLOR);
}

fn fill_rect(img: &mut RgbImage, x0: i32, y0: i32, w: i32, h: i32, color: Rgb<u8>) {
    let (img_w, img_h) = (img.width() as i32, img.height() as i32);
    for y in y0.max(0)..(y0 + h).min(img_h) {
        for x in x0.max(0)..(x0 + w).min(img_w) {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}
