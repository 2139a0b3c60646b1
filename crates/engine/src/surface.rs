//! Layered backing surface for the selection window
//!
//! The selection window is a per-pixel-alpha layered window: an opaque
//! border ring in the interaction-state color around an interior that is
//! visually transparent. Interior alpha is 1, not 0, so the window still
//! hit-tests and the whole surface stays draggable.

use crate::geometry::BORDER_WIDTH;
use crate::interaction::BorderStyle;
use crate::EngineResult;
use capture_gdi::Rect;
use windows::Win32::Foundation::{HWND, POINT, SIZE};
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, ReleaseDC, SelectObject,
    AC_SRC_ALPHA, AC_SRC_OVER, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, BLENDFUNCTION,
    DIB_RGB_COLORS, HBITMAP,
};
use windows::Win32::UI::WindowsAndMessaging::{UpdateLayeredWindow, ULW_ALPHA};

/// Border colors as premultiplied BGRA, opaque.
fn border_bgra(style: BorderStyle) -> [u8; 4] {
    match style {
        BorderStyle::Neutral => [211, 211, 211, 255], // light gray
        BorderStyle::Moving => [0, 255, 0, 255],      // green
        BorderStyle::Resizing => [255, 0, 0, 255],    // blue
    }
}

const INTERIOR_BGRA: [u8; 4] = [0, 0, 0, 1];

/// Regenerate the selection window's surface for its current rectangle and
/// border style. `UpdateLayeredWindow` also repositions and resizes the
/// window, so this is the single mutation point for the selection window's
/// on-screen geometry.
pub fn update_selection_surface(hwnd: HWND, rect: &Rect, style: BorderStyle) -> EngineResult<()> {
    let pixels = build_surface(rect.width, rect.height, style);

    unsafe {
        let screen_dc = GetDC(None);
        let mem_dc = CreateCompatibleDC(screen_dc);

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: rect.width as i32,
                biHeight: -(rect.height as i32), // Top-down DIB
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

        let mut bits: *mut std::ffi::c_void = std::ptr::null_mut();
        let bitmap: HBITMAP = match CreateDIBSection(mem_dc, &bmi, DIB_RGB_COLORS, &mut bits, None, 0)
        {
            Ok(bitmap) => bitmap,
            Err(err) => {
                let _ = DeleteDC(mem_dc);
                ReleaseDC(None, screen_dc);
                return Err(err.into());
            }
        };
        std::ptr::copy_nonoverlapping(pixels.as_ptr(), bits as *mut u8, pixels.len());

        let old_bitmap = SelectObject(mem_dc, bitmap);

        let position = POINT { x: rect.x, y: rect.y };
        let size = SIZE {
            cx: rect.width as i32,
            cy: rect.height as i32,
        };
        let origin = POINT { x: 0, y: 0 };
        let blend = BLENDFUNCTION {
            BlendOp: AC_SRC_OVER as u8,
            BlendFlags: 0,
            SourceConstantAlpha: 255,
            AlphaFormat: AC_SRC_ALPHA as u8,
        };

        let result = UpdateLayeredWindow(
            hwnd,
            None,
            Some(&position),
            Some(&size),
            mem_dc,
            Some(&origin),
            windows::Win32::Foundation::COLORREF(0),
            Some(&blend),
            ULW_ALPHA,
        );

        SelectObject(mem_dc, old_bitmap);
        let _ = DeleteObject(bitmap);
        let _ = DeleteDC(mem_dc);
        ReleaseDC(None, screen_dc);

        result?;
    }

    Ok(())
}

/// Premultiplied BGRA surface: border ring opaque, interior alpha 1.
fn build_surface(width: u32, height: u32, style: BorderStyle) -> Vec<u8> {
    let border = border_bgra(style);
    let b = BORDER_WIDTH;

    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let on_border = x < b || y < b || x >= width.saturating_sub(b) || y >= height.saturating_sub(b);
            pixels.extend_from_slice(if on_border { &border } else { &INTERIOR_BGRA });
        }
    }
    pixels
}
