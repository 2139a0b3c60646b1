//! Synchronization engine for Mirrorview
//!
//! Binds the two windows together: the aspect-ratio invariant between their
//! rectangles, the periodic capture-and-scale pipeline, the pointer mapping
//! into display space and the drag/resize interaction state machine. The
//! engine talks to the outside world only through the collaborator traits
//! below, so everything except the window layer runs in tests.

pub mod geometry;
pub mod interaction;
pub mod mapping;
pub mod pipeline;
pub mod render;

#[cfg(windows)]
pub mod platform;
#[cfg(windows)]
pub mod present;
#[cfg(windows)]
pub mod surface;
#[cfg(windows)]
pub mod window;

pub use interaction::{BorderStyle, InteractionState, ResizeRule};
pub use pipeline::CapturePipeline;

use capture_gdi::{CaptureResult, DisplayArea, FrameData, Point, Rect};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("capture error: {0}")]
    Capture(#[from] capture_gdi::CaptureError),

    #[error("no displays reported by the system")]
    NoDisplays,
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Screen-pixel capture collaborator.
pub trait PixelSource {
    /// Read the pixels under an absolute desktop rectangle. Blocking.
    fn grab(&mut self, region: &Rect) -> CaptureResult<FrameData>;
}

/// Pointer-position collaborator.
pub trait PointerSource {
    /// Current pointer position in absolute desktop coordinates.
    fn position(&mut self) -> Point;
}

/// Display-enumeration collaborator.
pub trait DisplayProvider {
    /// All physical displays, in a fixed cyclic order.
    fn all(&self) -> Vec<DisplayArea>;

    /// The designated primary display.
    fn primary(&self) -> DisplayArea;

    /// The display whose full bounds contain the point, if any.
    fn containing(&self, point: Point) -> Option<DisplayArea> {
        self.all().into_iter().find(|d| d.full.contains(point.x, point.y))
    }
}

/// Persisted-geometry collaborator: one independent store per window.
pub trait GeometryStore {
    /// Read the stored rectangle, falling back to defaults.
    fn load(&self) -> Rect;

    /// Write the rectangle. Failures are the implementation's to report.
    fn save(&self, rect: &Rect);
}

impl<T: PixelSource + ?Sized> PixelSource for Box<T> {
    fn grab(&mut self, region: &Rect) -> CaptureResult<FrameData> {
        (**self).grab(region)
    }
}

impl<T: PointerSource + ?Sized> PointerSource for Box<T> {
    fn position(&mut self) -> Point {
        (**self).position()
    }
}
