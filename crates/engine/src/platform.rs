//! Win32-backed collaborator implementations

use crate::{DisplayProvider, PixelSource, PointerSource};
use capture_gdi::{CaptureResult, CursorPointer, DisplayArea, FrameData, Monitors, Point, Rect,
    ScreenReader};

impl PixelSource for ScreenReader {
    fn grab(&mut self, region: &Rect) -> CaptureResult<FrameData> {
        ScreenReader::grab(self, region)
    }
}

impl PointerSource for CursorPointer {
    fn position(&mut self) -> Point {
        CursorPointer::position(self).unwrap_or_else(|err| {
            log::debug!("pointer query failed: {err}");
            Point::new(0, 0)
        })
    }
}

impl DisplayProvider for Monitors {
    fn all(&self) -> Vec<DisplayArea> {
        self.enumerate()
    }

    fn primary(&self) -> DisplayArea {
        let displays = self.enumerate();
        displays
            .iter()
            .find(|d| d.is_primary)
            .or_else(|| displays.first())
            .copied()
            .unwrap_or_else(|| {
                log::warn!("no displays enumerated, assuming 1920x1080 at origin");
                DisplayArea {
                    full: Rect::new(0, 0, 1920, 1080),
                    usable: Rect::new(0, 0, 1920, 1080),
                    is_primary: true,
                }
            })
    }
}
