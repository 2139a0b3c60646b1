//! Mirrorview - live scaled mirror of a desktop region

#![windows_subsystem = "windows"]

mod config;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    run()
}

#[cfg(windows)]
fn run() -> Result<()> {
    use anyhow::Context;
    use capture_gdi::{CursorPointer, Monitors, ScreenReader};
    use config::TomlGeometryStore;
    use engine::window::MirrorWindows;
    use windows::Win32::UI::HiDpi::{
        SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    };

    // Set DPI awareness before any window is created.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    log::info!("mirrorview starting up");

    MirrorWindows::run(
        Box::new(ScreenReader::new()),
        Box::new(CursorPointer::new()),
        Box::new(Monitors::new()),
        Box::new(TomlGeometryStore::new("selection")),
        Box::new(TomlGeometryStore::new("display")),
    )
    .context("window session failed")?;

    log::info!("mirrorview shut down");
    Ok(())
}

#[cfg(not(windows))]
fn run() -> Result<()> {
    anyhow::bail!("mirrorview requires the Windows desktop")
}
