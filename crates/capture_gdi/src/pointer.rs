//! Pointer-position query

use crate::{CaptureResult, Point};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

/// Pointer collaborator backed by `GetCursorPos`.
pub struct CursorPointer;

impl CursorPointer {
    pub fn new() -> Self {
        Self
    }

    /// Current pointer position in absolute desktop coordinates.
    pub fn position(&self) -> CaptureResult<Point> {
        let mut point = POINT::default();
        unsafe {
            GetCursorPos(&mut point)?;
        }
        Ok(Point::new(point.x, point.y))
    }
}

impl Default for CursorPointer {
    fn default() -> Self {
        Self::new()
    }
}
