//=========================================================================
// File System Subsystem
//
// Search-path based file resolution. First subsystem constructed, last
// torn down — everything else may read files during its own lifecycle.
//
// Only the lifecycle-visible surface is modeled here; actual asset I/O
// belongs to higher layers.
//
//=========================================================================

use std::path::{Path, PathBuf};

use log::{debug, info};

//=== FileSystem ==========================================================

/// Search-path file resolver.
pub struct FileSystem {
    search_paths: Vec<PathBuf>,
}

impl FileSystem {
    /// Creates the filesystem with `root` as the initial search path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!(target: "subsystems", "FileSystem mounted at {}", root.display());
        Self { search_paths: vec![root] }
    }

    /// Appends a search path. Later mounts are consulted after earlier
    /// ones.
    pub fn mount(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        debug!(target: "subsystems", "FileSystem mount added: {}", path.display());
        self.search_paths.push(path);
    }

    /// Resolves `name` against the search paths, returning the first
    /// candidate that exists on disk.
    pub fn resolve(&self, name: impl AsRef<Path>) -> Option<PathBuf> {
        let name = name.as_ref();
        self.search_paths
            .iter()
            .map(|base| base.join(name))
            .find(|candidate| candidate.exists())
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Releases the mount table.
    pub fn shutdown(&mut self) {
        debug!(target: "subsystems", "FileSystem shut down");
        self.search_paths.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
