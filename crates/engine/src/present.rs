//! Presentation of composited frames into the display window

use crate::geometry::BORDER_WIDTH;
use image::RgbImage;
use windows::Win32::Foundation::COLORREF;
use windows::Win32::Graphics::Gdi::{
    CreatePen, DeleteObject, GetStockObject, Rectangle, SelectObject, SetDIBitsToDevice,
    BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HDC, HOLLOW_BRUSH, PS_SOLID,
};

const FRAME_COLOR: COLORREF = COLORREF(0x00D3D3D3); // light gray, 0x00BBGGRR

/// Blit a composited RGB frame to the window DC as a 32-bpp top-down DIB.
pub fn blit_frame(hdc: HDC, frame: &RgbImage) {
    let width = frame.width() as i32;
    let height = frame.height() as i32;
    if width == 0 || height == 0 {
        return;
    }

    let mut bgra = Vec::with_capacity((width * height * 4) as usize);
    for px in frame.pixels() {
        bgra.extend_from_slice(&[px.0[2], px.0[1], px.0[0], 255]);
    }

    let bmi = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height, // Top-down
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            biSizeImage: 0,
            biXPelsPerMeter: 0,
            biYPelsPerMeter: 0,
            biClrUsed: 0,
            biClrImportant: 0,
        },
        bmiColors: [Default::default()],
    };

    unsafe {
        SetDIBitsToDevice(
            hdc,
            0,
            0,
            width as u32,
            height as u32,
            0,
            0,
            0,
            height as u32,
            bgra.as_ptr() as *const _,
            &bmi,
            DIB_RGB_COLORS,
        );
    }
}

/// Draw the display window's neutral border frame over the blitted content.
pub fn draw_frame_border(hdc: HDC, width: i32, height: i32) {
    unsafe {
        let pen = CreatePen(PS_SOLID, BORDER_WIDTH as i32, FRAME_COLOR);
        let old_pen = SelectObject(hdc, pen);
        let old_brush = SelectObject(hdc, GetStockObject(HOLLOW_BRUSH));

        let _ = Rectangle(hdc, 0, 0, width, height);

        SelectObject(hdc, old_brush);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(pen);
    }
}
