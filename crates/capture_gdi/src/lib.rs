//! Screen-reading collaborators for Mirrorview
//!
//! Shared geometry types plus the GDI-backed primitives the engine talks to:
//! pixel grab for an absolute desktop rectangle, monitor enumeration and the
//! pointer-position query. Platform code is Windows-only; the types and
//! errors compile everywhere so the engine stays testable off-Windows.

pub mod frame;
#[cfg(windows)]
pub mod monitor;
#[cfg(windows)]
pub mod pointer;
#[cfg(windows)]
pub mod screen;

pub use frame::FrameData;
#[cfg(windows)]
pub use monitor::Monitors;
#[cfg(windows)]
pub use pointer::CursorPointer;
#[cfg(windows)]
pub use screen::ScreenReader;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("screen read failed: {0}")]
    ScreenRead(String),

    #[error("empty capture region ({0}x{1})")]
    EmptyRegion(u32, u32),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Rectangle in absolute desktop coordinates, physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Point in absolute desktop coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One physical display, as reported by the display-enumeration collaborator.
///
/// `full` covers the whole monitor; `usable` excludes reserved system chrome
/// such as the taskbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayArea {
    pub full: Rect,
    pub usable: Rect,
    pub is_primary: bool,
}
