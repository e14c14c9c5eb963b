//! Opening the mod library for a command.

use crate::errors::CliError;
use crate::println_pad;
use colored::Colorize;
use miette::Result;
use std::collections::BTreeSet;
use stella_mod_core::{AppConfig, ConfigStore, InstallDir};
use stella_mod_lib::{InstanceLock, LibrarySettings};
use stella_overlay::utils::posix_file_name;
use stella_overlay::OverlayEngine;

/// Where the launcher lives and what its config says.
pub struct Workspace {
    pub install: InstallDir,
    pub store: ConfigStore,
    pub config: AppConfig,
}

impl Workspace {
    pub fn load() -> Result<Self> {
        let install = InstallDir::from_current_exe().map_err(CliError::from)?;
        Ok(Self::at(install))
    }

    pub fn at(install: InstallDir) -> Self {
        let store = ConfigStore::beside(&install);
        let config = store.load();
        Self {
            install,
            store,
            config,
        }
    }

    /// Resolve settings, take the instance lock and open the engine.
    ///
    /// The engine prints its progress lines as the command runs.
    pub fn open_session(&self) -> Result<Session> {
        let settings =
            LibrarySettings::resolve(&self.config, &self.install).map_err(CliError::from)?;
        let lock = InstanceLock::acquire(&self.install).map_err(CliError::from)?;
        let engine = settings
            .open_engine()
            .map_err(CliError::from)?
            .with_logger(|line| println_pad!("{}", line.dimmed()));

        Ok(Session {
            settings,
            engine,
            lock,
        })
    }
}

pub struct Session {
    pub settings: LibrarySettings,
    pub engine: OverlayEngine,
    pub lock: InstanceLock,
}

impl Session {
    /// Map a user-supplied mod name to its tracked path.
    ///
    /// Accepts the relative path, or a bare file name when only one mod has
    /// it.
    pub fn resolve_mod(&self, query: &str) -> Result<String> {
        let query = super::normalize_mod_arg(query);
        let files = self.engine.scan_mod_files().map_err(CliError::from)?;
        resolve_mod_in(&files, &query)
    }
}

pub fn resolve_mod_in(files: &BTreeSet<String>, query: &str) -> Result<String> {
    if files.contains(query) {
        return Ok(query.to_string());
    }

    let mut candidates: Vec<String> = files
        .iter()
        .filter(|path| posix_file_name(path).eq_ignore_ascii_case(query))
        .cloned()
        .collect();

    match candidates.len() {
        0 => Err(CliError::mod_not_found(query).into()),
        1 => Ok(candidates.remove(0)),
        _ => Err(CliError::ambiguous_mod(query, candidates).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_resolve_by_path_or_unique_name() {
        let files = files(&["A/char.unity3d", "B/ui.unity3d"]);

        assert_eq!(resolve_mod_in(&files, "A/char.unity3d").unwrap(), "A/char.unity3d");
        assert_eq!(resolve_mod_in(&files, "ui.unity3d").unwrap(), "B/ui.unity3d");
        assert!(resolve_mod_in(&files, "missing.unity3d").is_err());
    }

    fn workspace(dir: &tempfile::TempDir) -> Workspace {
        let root = camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let exe = root.join("game").join("StellaSora.exe");
        std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
        std::fs::write(&exe, b"").unwrap();

        let install = InstallDir::new(root.join("launcher"));
        std::fs::create_dir_all(install.path()).unwrap();
        let store = ConfigStore::beside(&install);
        store
            .save(&AppConfig {
                game_exe_path: Some(exe.to_string()),
                ..Default::default()
            })
            .unwrap();
        Workspace::at(install)
    }

    #[test]
    fn test_session_holds_instance_lock() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = workspace(&dir);

        let session = workspace.open_session().unwrap();
        assert!(session.engine.mods_dir().is_dir());

        let err = workspace.open_session().err().unwrap();
        assert!(err.to_string().contains("Another stella-mod instance"));

        drop(session);
        assert!(workspace.open_session().is_ok());
    }

    #[test]
    fn test_resolve_rejects_ambiguous_name() {
        let files = files(&["A/char.unity3d", "B/char.unity3d"]);

        let err = resolve_mod_in(&files, "char.unity3d").unwrap_err();
        assert!(err.to_string().contains("matches several mods"));
    }
}
