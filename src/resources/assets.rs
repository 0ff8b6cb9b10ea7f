//! Read-only access to content files.
//!
//! Loaders only need text files addressed by a relative, `/`-separated path
//! (`tiles.json`, `levels/1-1.json`). [`DirSource`] reads them from a
//! directory on disk; [`MemorySource`] serves them from a map, for tests and
//! embedded content.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::error::{EngineError, Result};

pub trait AssetSource {
    fn read_to_string(&self, path: &str) -> Result<String>;

    fn exists(&self, path: &str) -> bool {
        self.read_to_string(path).is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn read_to_string(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                EngineError::AssetNotFound(path.to_string())
            } else {
                EngineError::Io { path: full, source }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: FxHashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl AssetSource for MemorySource {
    fn read_to_string(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| EngineError::AssetNotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
