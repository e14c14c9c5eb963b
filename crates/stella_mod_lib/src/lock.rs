//! Single-instance guard for the launcher.
//!
//! Two launchers touching the same status file and vault would corrupt each
//! other's bookkeeping, so every mutating session holds an exclusive advisory
//! lock on a file in the install directory.

use crate::error::{LibError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use stella_mod_core::InstallDir;

pub const LOCK_FILE_NAME: &str = ".stella-mod.lock";

/// Held for as long as this process owns the install directory.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: Utf8PathBuf,
}

impl InstanceLock {
    pub fn acquire(install: &InstallDir) -> Result<Self> {
        Self::acquire_at(install.join(LOCK_FILE_NAME))
    }

    /// Fails with [`LibError::InstanceLocked`] if another holder exists.
    pub fn acquire_at(path: Utf8PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.as_std_path())?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == std::io::ErrorKind::WouldBlock
                || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
            {
                return Err(LibError::InstanceLocked(path));
            }
            return Err(e.into());
        }

        tracing::debug!("Acquired instance lock {}", path);
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release instance lock {}: {}", self.path, e);
        }
    }
}
