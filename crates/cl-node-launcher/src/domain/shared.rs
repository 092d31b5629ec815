//! # Shared Directory
//!
//! A directory mounted into the launched service. The launcher writes through
//! `path_on_launcher`; the service sees the same files under
//! `path_on_service`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Root of a directory shared between launcher and service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedDirectory {
    path_on_launcher: PathBuf,
    path_on_service: PathBuf,
}

impl SharedDirectory {
    /// Create from the two views of the same directory.
    pub fn new(path_on_launcher: impl Into<PathBuf>, path_on_service: impl Into<PathBuf>) -> Self {
        Self {
            path_on_launcher: path_on_launcher.into(),
            path_on_service: path_on_service.into(),
        }
    }

    /// Resolve a path relative to the shared root.
    pub fn child_path(&self, rel: impl AsRef<Path>) -> SharedPath {
        let rel = rel.as_ref();
        SharedPath {
            on_launcher: self.path_on_launcher.join(rel),
            on_service: self.path_on_service.join(rel),
        }
    }

    /// Launcher-side root.
    pub fn path_on_launcher(&self) -> &Path {
        &self.path_on_launcher
    }

    /// Service-side root.
    pub fn path_on_service(&self) -> &Path {
        &self.path_on_service
    }
}

/// A single path inside a [`SharedDirectory`], in both views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPath {
    on_launcher: PathBuf,
    on_service: PathBuf,
}

impl SharedPath {
    /// Where the launcher reads and writes this path.
    pub fn abs_path_on_launcher(&self) -> &Path {
        &self.on_launcher
    }

    /// Where the service sees this path.
    pub fn abs_path_on_service(&self) -> &Path {
        &self.on_service
    }

    /// Copy a local file to this shared path, creating parent directories.
    pub fn copy_from(&self, local: &Path) -> io::Result<()> {
        if let Some(parent) = self.on_launcher.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local, &self.on_launcher)?;
        Ok(())
    }
}

/// Service-side paths of the provisioned genesis artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedArtifacts {
    /// Genesis config YAML as seen by the service.
    pub genesis_config_yml: PathBuf,
    /// Genesis state SSZ as seen by the service.
    pub genesis_state_ssz: PathBuf,
}
