//! Periodic capture-and-scale pipeline

use crate::geometry::{self, BORDER_WIDTH};
use crate::{mapping, render, PixelSource, PointerSource};
use capture_gdi::Rect;
use image::RgbImage;

/// Capture cadence shared by both periodic tasks.
pub const TICK_INTERVAL_MS: u32 = 50;

/// The capture pipeline: reads the pixels under the selection window each
/// tick and turns them into the display window's composited frame.
///
/// Collaborator failures are non-fatal: a failed screen read skips the tick
/// and keeps the previous frame, and the next scheduled tick retries
/// naturally.
pub struct CapturePipeline<S, P> {
    source: S,
    pointer: P,
    frame: Option<RgbImage>,
}

impl<S: PixelSource, P: PointerSource> CapturePipeline<S, P> {
    pub fn new(source: S, pointer: P) -> Self {
        Self {
            source,
            pointer,
            frame: None,
        }
    }

    /// Run one tick against the rectangles as they are right now.
    ///
    /// Returns the frame to present: a freshly composited one, or the
    /// retained previous frame when this tick was skipped.
    pub fn tick(&mut self, selection: &Rect, display: &Rect) -> Option<&RgbImage> {
        if display.width == 0 || display.height == 0 {
            return self.frame.as_ref();
        }

        let region = geometry::capture_region(selection, BORDER_WIDTH);
        let raw = match self.source.grab(&region) {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("capture tick skipped: {err}");
                return self.frame.as_ref();
            }
        };

        let marker = mapping::map_pointer(
            self.pointer.position(),
            &region,
            display.size(),
            selection.size(),
        );

        let mut composited = render::scale_frame(&raw, display.width, display.height);
        render::draw_crosshair(&mut composited, marker);

        self.frame = Some(composited);
        self.frame.as_ref()
    }

    /// The most recently composited frame, if any tick has succeeded yet.
    pub fn last_frame(&self) -> Option<&RgbImage> {
        self.frame.as_ref()
    }
}
