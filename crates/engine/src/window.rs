//! The two mirrored windows and their shared event loop
//!
//! Everything runs on one thread: window callbacks, the two periodic timers
//! and presentation. Geometry lives in the thread-local engine state and is
//! mirrored to the OS windows; each timer tick reads the rectangles as they
//! are at fire time, so in-progress drags are always reflected.

use crate::geometry::{self, MIN_WINDOW_DIM};
use crate::interaction::{InteractionState, ResizeRule};
use crate::pipeline::{CapturePipeline, TICK_INTERVAL_MS};
use crate::{present, surface, DisplayProvider, EngineResult, GeometryStore, PixelSource,
    PointerSource};
use capture_gdi::{CursorPointer, Point, Rect};
use std::cell::RefCell;
use std::sync::Once;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{BeginPaint, EndPaint, InvalidateRect, UpdateWindow,
    PAINTSTRUCT};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetKeyState, RegisterHotKey, ReleaseCapture, SetCapture, UnregisterHotKey, MOD_CONTROL,
    MOD_NOREPEAT, VK_CONTROL,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, KillTimer,
    LoadCursorW, PostQuitMessage, RegisterClassExW, SetTimer, SetWindowPos, ShowWindow,
    TranslateMessage, CS_DBLCLKS, CS_HREDRAW, CS_VREDRAW, IDC_ARROW, MSG, SWP_NOACTIVATE,
    SWP_NOZORDER, SW_SHOW, WM_CLOSE, WM_DESTROY, WM_HOTKEY, WM_LBUTTONDBLCLK, WM_LBUTTONDOWN,
    WM_LBUTTONUP, WM_MOUSEMOVE, WM_PAINT, WM_TIMER, WNDCLASSEXW, WS_EX_LAYERED, WS_EX_TOOLWINDOW,
    WS_EX_TOPMOST, WS_POPUP,
};

const SELECTION_CLASS: PCWSTR = w!("MirrorviewSelection");
const DISPLAY_CLASS: PCWSTR = w!("MirrorviewDisplay");

const TIMER_SURFACE: usize = 1;
const TIMER_CAPTURE: usize = 2;

const HOTKEY_QUIT: i32 = 1;
const VK_Q: u32 = 0x51;

static REGISTER: Once = Once::new();

thread_local! {
    static ENGINE: RefCell<Option<Box<EngineState>>> = RefCell::new(None);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Selection,
    Display,
}

struct WindowPeer {
    hwnd: isize,
    rect: Rect,
    state: InteractionState,
    store: Box<dyn GeometryStore>,
}

struct EngineState {
    selection: WindowPeer,
    display: WindowPeer,
    pipeline: CapturePipeline<Box<dyn PixelSource>, Box<dyn PointerSource>>,
    displays: Box<dyn DisplayProvider>,
}

impl EngineState {
    fn role_of(&self, hwnd: HWND) -> Option<Role> {
        let raw = hwnd.0 as isize;
        if raw == self.selection.hwnd {
            Some(Role::Selection)
        } else if raw == self.display.hwnd {
            Some(Role::Display)
        } else {
            None
        }
    }

    fn peer(&self, role: Role) -> &WindowPeer {
        match role {
            Role::Selection => &self.selection,
            Role::Display => &self.display,
        }
    }

    fn peer_mut(&mut self, role: Role) -> &mut WindowPeer {
        match role {
            Role::Selection => &mut self.selection,
            Role::Display => &mut self.display,
        }
    }
}

/// The two mirrored windows. `run` owns the whole session: construction,
/// wiring, timers, the quit hotkey and the message loop.
pub struct MirrorWindows;

impl MirrorWindows {
    pub fn run(
        source: Box<dyn PixelSource>,
        pointer: Box<dyn PointerSource>,
        displays: Box<dyn DisplayProvider>,
        selection_store: Box<dyn GeometryStore>,
        display_store: Box<dyn GeometryStore>,
    ) -> EngineResult<()> {
        if displays.all().is_empty() {
            return Err(crate::EngineError::NoDisplays);
        }

        let selection_rect = sanitize(selection_store.load());
        let mut display_rect = sanitize(display_store.load());

        // Lock the display to the selection's ratio before the first tick.
        if let Some(next) =
            geometry::resize_display_to_match_selection(&selection_rect, &display_rect)
        {
            let host = geometry::host_display(&*displays, next.top_left());
            display_rect = geometry::clamp_to_area(&next, &host.usable);
        }

        unsafe {
            register_classes()?;

            let hmodule = GetModuleHandleW(None)?;
            let hinstance = HINSTANCE(hmodule.0);

            let selection_hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_LAYERED | WS_EX_TOOLWINDOW,
                SELECTION_CLASS,
                w!("Mirrorview Selection"),
                WS_POPUP,
                selection_rect.x,
                selection_rect.y,
                selection_rect.width as i32,
                selection_rect.height as i32,
                None,
                None,
                hinstance,
                None,
            )?;

            let display_hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_TOOLWINDOW,
                DISPLAY_CLASS,
                w!("Mirrorview"),
                WS_POPUP,
                display_rect.x,
                display_rect.y,
                display_rect.width as i32,
                display_rect.height as i32,
                None,
                None,
                hinstance,
                None,
            )?;

            ENGINE.with(|e| {
                *e.borrow_mut() = Some(Box::new(EngineState {
                    selection: WindowPeer {
                        hwnd: selection_hwnd.0 as isize,
                        rect: selection_rect,
                        state: InteractionState::Idle,
                        store: selection_store,
                    },
                    display: WindowPeer {
                        hwnd: display_hwnd.0 as isize,
                        rect: display_rect,
                        state: InteractionState::Idle,
                        store: display_store,
                    },
                    pipeline: CapturePipeline::new(source, pointer),
                    displays,
                }));
            });

            surface::update_selection_surface(
                selection_hwnd,
                &selection_rect,
                InteractionState::Idle.border_style(),
            )?;

            let _ = ShowWindow(selection_hwnd, SW_SHOW);
            let _ = ShowWindow(display_hwnd, SW_SHOW);
            let _ = UpdateWindow(display_hwnd);

            SetTimer(selection_hwnd, TIMER_SURFACE, TICK_INTERVAL_MS, None);
            SetTimer(display_hwnd, TIMER_CAPTURE, TICK_INTERVAL_MS, None);

            if let Err(err) = RegisterHotKey(None, HOTKEY_QUIT, MOD_CONTROL | MOD_NOREPEAT, VK_Q) {
                log::warn!("quit hotkey unavailable: {err}");
            }

            let mut msg = MSG::default();
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                if msg.message == WM_HOTKEY && msg.wParam.0 == HOTKEY_QUIT as usize {
                    PostQuitMessage(0);
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }

            let _ = UnregisterHotKey(None, HOTKEY_QUIT);
            let _ = KillTimer(selection_hwnd, TIMER_SURFACE);
            let _ = KillTimer(display_hwnd, TIMER_CAPTURE);
            let _ = DestroyWindow(selection_hwnd);
            let _ = DestroyWindow(display_hwnd);

            ENGINE.with(|e| {
                *e.borrow_mut() = None;
            });
        }

        Ok(())
    }
}

fn register_classes() -> EngineResult<()> {
    let mut result: EngineResult<()> = Ok(());
    REGISTER.call_once(|| unsafe {
        let hmodule = match GetModuleHandleW(None) {
            Ok(h) => h,
            Err(e) => {
                result = Err(e.into());
                return;
            }
        };
        let hinstance = HINSTANCE(hmodule.0);
        let cursor = match LoadCursorW(None, IDC_ARROW) {
            Ok(c) => c,
            Err(e) => {
                result = Err(e.into());
                return;
            }
        };

        let selection = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW | CS_DBLCLKS,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance,
            hCursor: cursor,
            lpszClassName: SELECTION_CLASS,
            ..Default::default()
        };
        RegisterClassExW(&selection);

        let display = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance,
            hCursor: cursor,
            lpszClassName: DISPLAY_CLASS,
            ..Default::default()
        };
        RegisterClassExW(&display);
    });

    result
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            on_paint(hwnd);
            LRESULT(0)
        }

        WM_TIMER => {
            on_timer(wparam.0);
            LRESULT(0)
        }

        WM_LBUTTONDOWN => {
            on_press(hwnd, lparam);
            LRESULT(0)
        }

        WM_MOUSEMOVE => {
            on_drag(hwnd);
            LRESULT(0)
        }

        WM_LBUTTONUP => {
            on_release(hwnd);
            LRESULT(0)
        }

        WM_LBUTTONDBLCLK => {
            on_double_click(hwnd);
            LRESULT(0)
        }

        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            // Tearing down either window ends the session.
            PostQuitMessage(0);
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

unsafe fn on_paint(hwnd: HWND) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = BeginPaint(hwnd, &mut ps);

    ENGINE.with(|e| {
        if let Some(ref engine) = *e.borrow() {
            // The layered selection window paints through its surface; only
            // the display window has content to present here.
            if engine.role_of(hwnd) == Some(Role::Display) {
                if let Some(frame) = engine.pipeline.last_frame() {
                    present::blit_frame(hdc, frame);
                }
                present::draw_frame_border(
                    hdc,
                    engine.display.rect.width as i32,
                    engine.display.rect.height as i32,
                );
            }
        }
    });

    let _ = EndPaint(hwnd, &ps);
}

unsafe fn on_timer(timer_id: usize) {
    ENGINE.with(|e| {
        if let Some(ref mut engine) = *e.borrow_mut() {
            match timer_id {
                // Periodic task 1: regenerate the selection window's
                // translucent backing surface.
                TIMER_SURFACE => refresh_selection_surface(engine),

                // Periodic task 2: capture, composite, present.
                TIMER_CAPTURE => {
                    let selection = engine.selection.rect;
                    let display = engine.display.rect;
                    if engine.pipeline.tick(&selection, &display).is_some() {
                        let _ = InvalidateRect(hwnd_of(engine.display.hwnd), None, false);
                    }
                }

                _ => {}
            }
        }
    });
}

unsafe fn on_press(hwnd: HWND, lparam: LPARAM) {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;

    SetCapture(hwnd);

    ENGINE.with(|e| {
        if let Some(ref mut engine) = *e.borrow_mut() {
            let Some(role) = engine.role_of(hwnd) else {
                return;
            };
            let Some(pointer) = cursor_point() else {
                return;
            };

            let peer = engine.peer_mut(role);
            peer.state = InteractionState::press(Point::new(x, y), pointer, peer.rect);

            if role == Role::Selection {
                refresh_selection_surface(engine);
            }
        }
    });
}

unsafe fn on_drag(hwnd: HWND) {
    ENGINE.with(|e| {
        if let Some(ref mut engine) = *e.borrow_mut() {
            let Some(role) = engine.role_of(hwnd) else {
                return;
            };
            if engine.peer(role).state.is_idle() {
                return;
            }
            let Some(pointer) = cursor_point() else {
                return;
            };

            let rule = match role {
                Role::Selection => ResizeRule::DeriveHeight,
                Role::Display => ResizeRule::FreeForm,
            };

            let peer = engine.peer_mut(role);
            let Some(next) = peer.state.drag(pointer, rule) else {
                return;
            };
            let resizing = matches!(peer.state, InteractionState::Resizing(_));
            peer.rect = next;

            match role {
                Role::Selection => {
                    // The surface update also moves and resizes the window.
                    refresh_selection_surface(engine);
                    if resizing {
                        push_display_recompute(engine);
                    }
                }
                Role::Display => position_window(hwnd, &next),
            }
        }
    });
}

unsafe fn on_release(hwnd: HWND) {
    let _ = ReleaseCapture();

    ENGINE.with(|e| {
        if let Some(ref mut engine) = *e.borrow_mut() {
            let Some(role) = engine.role_of(hwnd) else {
                return;
            };

            engine.peer_mut(role).state.release();

            // Every release re-clamps to the host display's usable area and
            // persists, so maximize and cycle-display land in the store too.
            let rect = engine.peer(role).rect;
            let host = geometry::host_display(&*engine.displays, rect.top_left());
            let clamped = geometry::clamp_to_area(&rect, &host.usable);
            engine.peer_mut(role).rect = clamped;

            match role {
                Role::Selection => {
                    refresh_selection_surface(engine);
                    push_display_recompute(engine);
                }
                Role::Display => position_window(hwnd, &clamped),
            }

            engine.peer(role).store.save(&clamped);
        }
    });
}

unsafe fn on_double_click(hwnd: HWND) {
    ENGINE.with(|e| {
        if let Some(ref mut engine) = *e.borrow_mut() {
            if engine.role_of(hwnd) != Some(Role::Selection) {
                return;
            }

            let ctrl_held = (GetKeyState(VK_CONTROL.0 as i32) as u16 & 0x8000) != 0;
            if ctrl_held {
                cycle_selection_display(engine);
            } else {
                maximize_selection(engine);
            }
        }
    });
}

unsafe fn maximize_selection(engine: &mut EngineState) {
    let rect = engine.selection.rect;
    let host = geometry::host_display(&*engine.displays, rect.top_left());
    let ratio = geometry::aspect_ratio(&rect);

    engine.selection.rect = geometry::maximized_rect(ratio, &host.usable);
    refresh_selection_surface(engine);
    push_display_recompute(engine);
}

unsafe fn cycle_selection_display(engine: &mut EngineState) {
    let displays = engine.displays.all();
    if displays.is_empty() {
        return;
    }

    let rect = engine.selection.rect;
    let current = displays
        .iter()
        .position(|d| d.full.contains(rect.x, rect.y))
        .unwrap_or(0);
    let next = displays[(current + 1) % displays.len()];

    engine.selection.rect = Rect::new(next.full.x, next.full.y, rect.width, rect.height);
    refresh_selection_surface(engine);
}

/// Recompute the display rect from the selection rect (push model) and move
/// the display window. Degenerate results keep the prior rectangle.
unsafe fn push_display_recompute(engine: &mut EngineState) {
    let selection = engine.selection.rect;
    match geometry::resize_display_to_match_selection(&selection, &engine.display.rect) {
        Some(next) => {
            let host = geometry::host_display(&*engine.displays, next.top_left());
            let next = geometry::clamp_to_area(&next, &host.usable);
            engine.display.rect = next;
            position_window(hwnd_of(engine.display.hwnd), &next);
        }
        None => log::debug!("display recompute skipped for degenerate geometry"),
    }
}

unsafe fn refresh_selection_surface(engine: &EngineState) {
    let style = engine.selection.state.border_style();
    if let Err(err) =
        surface::update_selection_surface(hwnd_of(engine.selection.hwnd), &engine.selection.rect, style)
    {
        log::debug!("selection surface update failed: {err}");
    }
}

unsafe fn position_window(hwnd: HWND, rect: &Rect) {
    let _ = SetWindowPos(
        hwnd,
        None,
        rect.x,
        rect.y,
        rect.width as i32,
        rect.height as i32,
        SWP_NOZORDER | SWP_NOACTIVATE,
    );
}

fn cursor_point() -> Option<Point> {
    match CursorPointer::new().position() {
        Ok(point) => Some(point),
        Err(err) => {
            log::debug!("pointer query failed: {err}");
            None
        }
    }
}

fn hwnd_of(raw: isize) -> HWND {
    HWND(raw as *mut std::ffi::c_void)
}

fn sanitize(rect: Rect) -> Rect {
    Rect::new(
        rect.x.max(0),
        rect.y.max(0),
        rect.width.max(MIN_WINDOW_DIM),
        rect.height.max(MIN_WINDOW_DIM),
    )
}
