//! Persisted window geometry
//!
//! One TOML file per window under the platform config directory, written
//! whenever an interaction completes and read once at startup. A missing or
//! unreadable file falls back to the defaults with a warning; persistence
//! failures never interrupt the session.

use capture_gdi::Rect;
use engine::GeometryStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "mirrorview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for PersistedGeometry {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 800,
            height: 600,
        }
    }
}

impl From<Rect> for PersistedGeometry {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl From<PersistedGeometry> for Rect {
    fn from(geometry: PersistedGeometry) -> Self {
        Rect::new(geometry.x, geometry.y, geometry.width, geometry.height)
    }
}

/// Geometry store for one window, independent of its peer's.
pub struct TomlGeometryStore {
    path: PathBuf,
}

impl TomlGeometryStore {
    /// Store under the platform config dir, e.g. `.../mirrorview/selection.toml`.
    pub fn new(name: &str) -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join(APP_DIR).join(format!("{name}.toml")),
        }
    }

    /// Store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> anyhow::Result<PersistedGeometry> {
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn write(&self, geometry: &PersistedGeometry) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(geometry)?)?;
        Ok(())
    }
}

impl GeometryStore for TomlGeometryStore {
    fn load(&self) -> Rect {
        match self.read() {
            Ok(geometry) => geometry.into(),
            Err(err) => {
                warn!(
                    "no usable geometry at {}, using defaults: {err}",
                    self.path.display()
                );
                PersistedGeometry::default().into()
            }
        }
    }

    fn save(&self, rect: &Rect) {
        match self.write(&PersistedGeometry::from(*rect)) {
            Ok(()) => debug!("saved geometry {rect:?} to {}", self.path.display()),
            Err(err) => warn!("failed to save geometry to {}: {err}", self.path.display()),
        }
    }
}
