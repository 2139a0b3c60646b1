//! Monitor enumeration

use crate::{DisplayArea, Rect};
use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOF_PRIMARY,
};

/// Display-enumeration collaborator backed by `EnumDisplayMonitors`.
///
/// Every query re-enumerates so hot-plugged or unplugged displays are picked
/// up on the next interaction.
pub struct Monitors;

impl Monitors {
    pub fn new() -> Self {
        Self
    }

    /// All displays in enumeration order.
    pub fn enumerate(&self) -> Vec<DisplayArea> {
        let mut displays: Vec<DisplayArea> = Vec::new();

        unsafe {
            let _ = EnumDisplayMonitors(
                None,
                None,
                Some(enum_monitor_callback),
                LPARAM(&mut displays as *mut Vec<DisplayArea> as isize),
            );
        }

        displays
    }
}

impl Default for Monitors {
    fn default() -> Self {
        Self::new()
    }
}

unsafe extern "system" fn enum_monitor_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let displays = &mut *(lparam.0 as *mut Vec<DisplayArea>);

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
        displays.push(DisplayArea {
            full: rect_from_win(&info.rcMonitor),
            usable: rect_from_win(&info.rcWork),
            is_primary: info.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    }

    BOOL(1) // Continue enumeration
}

fn rect_from_win(rect: &RECT) -> Rect {
    Rect::new(
        rect.left,
        rect.top,
        (rect.right - rect.left).max(0) as u32,
        (rect.bottom - rect.top).max(0) as u32,
    )
}
