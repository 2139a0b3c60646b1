//! Region screenshot using GDI

use crate::{CaptureError, CaptureResult, FrameData, Rect};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, SRCCOPY,
};

/// Synchronous screen reader for absolute desktop rectangles.
///
/// Each grab blits the requested region out of the screen DC and hands back
/// an RGB buffer. The call blocks the caller for the duration of the read.
pub struct ScreenReader;

impl ScreenReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the pixels under `region` (absolute desktop coordinates).
    pub fn grab(&self, region: &Rect) -> CaptureResult<FrameData> {
        if region.width == 0 || region.height == 0 {
            return Err(CaptureError::EmptyRegion(region.width, region.height));
        }

        let width = region.width as i32;
        let height = region.height as i32;

        unsafe {
            let screen_dc = GetDC(None);
            if screen_dc.is_invalid() {
                return Err(CaptureError::ScreenRead("failed to get screen DC".into()));
            }

            let mem_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            let old_bitmap = SelectObject(mem_dc, bitmap);

            let blit = BitBlt(
                mem_dc,
                0,
                0,
                width,
                height,
                screen_dc,
                region.x,
                region.y,
                SRCCOPY,
            );

            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: -height, // Top-down DIB
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

            let mut bgra = vec![0u8; (width * height * 4) as usize];
            let lines = if blit.is_ok() {
                GetDIBits(
                    mem_dc,
                    bitmap,
                    0,
                    height as u32,
                    Some(bgra.as_mut_ptr() as *mut _),
                    &mut bmi,
                    DIB_RGB_COLORS,
                )
            } else {
                0
            };

            SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);

            blit?;
            if lines == 0 {
                return Err(CaptureError::ScreenRead("GetDIBits returned no scanlines".into()));
            }

            Ok(bgra_to_frame(&bgra, region.width, region.height))
        }
    }
}

impl Default for ScreenReader {
    fn default() -> Self {
        Self::new()
    }
}

fn bgra_to_frame(bgra: &[u8], width: u32, height: u32) -> FrameData {
    let mut data = Vec::with_capacity(width as usize * height as usize * FrameData::BYTES_PER_PIXEL);
    for px in bgra.chunks_exact(4) {
        data.extend_from_slice(&[px[2], px[1], px[0]]);
    }
    FrameData { data, width, height }
}
