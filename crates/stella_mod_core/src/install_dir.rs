//! The directory the launcher runs from.
//!
//! Config, status side-car, and the default `Mods`/`Backups` folders all live
//! next to the executable. The location is passed around as an [`InstallDir`]
//! value rather than looked up globally, so tests can point it at a sandbox.

use crate::error::{CoreError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDir(Utf8PathBuf);

impl InstallDir {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self(path.into())
    }

    /// Directory containing the running executable.
    pub fn from_current_exe() -> Result<Self> {
        let exe = env::current_exe()?;
        let parent = exe.parent().ok_or(CoreError::InstallDirUnavailable)?;
        let parent = Utf8PathBuf::from_path_buf(parent.to_path_buf())
            .map_err(|_| CoreError::InstallDirUnavailable)?;
        Ok(Self(parent))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.0
    }

    pub fn join(&self, name: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        self.0.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        let dir = InstallDir::new("/opt/stella");
        assert_eq!(dir.join("config.toml"), Utf8PathBuf::from("/opt/stella/config.toml"));
    }

    #[test]
    fn test_from_current_exe() {
        let dir = InstallDir::from_current_exe().unwrap();
        assert!(dir.path().is_dir());
    }
}
