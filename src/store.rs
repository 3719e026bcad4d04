//! Persistence for the overlay geometry.
//!
//! The controller reads the store once at construction and writes it after
//! every committed change. Writes are best effort: a failing store is logged
//! by the caller and the in-memory geometry stays authoritative.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::geometry::Geometry;

pub const STATE_FILE_NAME: &str = "float_geometry.json";
const STATE_DIR_NAME: &str = "term-float";

pub trait GeometryStore {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&mut self) -> Result<Option<Geometry>, StoreError>;
    fn save(&mut self, geometry: Geometry) -> Result<(), StoreError>;
}

impl<T: GeometryStore + ?Sized> GeometryStore for Box<T> {
    fn load(&mut self) -> Result<Option<Geometry>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, geometry: Geometry) -> Result<(), StoreError> {
        (**self).save(geometry)
    }
}

/// Keeps the geometry in memory only. Counts writes so callers can check
/// that intermediate frames are not persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    geometry: Option<Geometry>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            saves: 0,
        }
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl GeometryStore for MemoryStore {
    fn load(&mut self) -> Result<Option<Geometry>, StoreError> {
        Ok(self.geometry)
    }

    fn save(&mut self, geometry: Geometry) -> Result<(), StoreError> {
        self.geometry = Some(geometry);
        self.saves += 1;
        Ok(())
    }
}

/// On-disk layout: one integer per axis, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedGeometry {
    window_x: i32,
    window_y: i32,
    window_width: i32,
    window_height: i32,
}

impl From<Geometry> for PersistedGeometry {
    fn from(g: Geometry) -> Self {
        Self {
            window_x: g.x,
            window_y: g.y,
            window_width: g.width,
            window_height: g.height,
        }
    }
}

impl From<PersistedGeometry> for Geometry {
    fn from(p: PersistedGeometry) -> Self {
        Geometry::new(p.window_x, p.window_y, p.window_width, p.window_height)
    }
}

/// Stores the geometry as a small JSON object in a file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/term-float/float_geometry.json`, if the platform has a
    /// config dir at all.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(STATE_DIR_NAME).join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeometryStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<Geometry>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let persisted: PersistedGeometry = serde_json::from_str(&content)?;
        Ok(Some(persisted.into()))
    }

    fn save(&mut self, geometry: Geometry) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&PersistedGeometry::from(geometry))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = JsonFileStore::new(dir.path().join(STATE_FILE_NAME));
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn file_store_persists_four_integers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(STATE_FILE_NAME);
        let mut store = JsonFileStore::new(&path);
        store.save(Geometry::new(12, 34, 300, 200)).expect("save");

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(raw["window_x"], 12);
        assert_eq!(raw["window_height"], 200);
        assert_eq!(raw.as_object().map(|o| o.len()), Some(4));

        let mut reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.load().expect("load"),
            Some(Geometry::new(12, 34, 300, 200))
        );
    }

    #[test]
    fn corrupt_file_is_a_format_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(STATE_FILE_NAME);
        fs::write(&path, "{ not json").expect("write");
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Format(_))));
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().expect("load"), None);
        store.save(Geometry::new(1, 2, 3, 4)).expect("save");
        store.save(Geometry::new(1, 2, 3, 5)).expect("save");
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.geometry(), Some(Geometry::new(1, 2, 3, 5)));
    }
}
