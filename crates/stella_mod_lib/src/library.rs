//! Turning an [`AppConfig`] into a ready-to-use [`OverlayEngine`].

use crate::error::{LibError, Result};
use camino::Utf8PathBuf;
use stella_mod_core::{game_dir_for, AppConfig, InstallDir};
use stella_overlay::{OverlayEngine, OverlayPaths, STATUS_FILE_NAME};

/// Configuration with every fallback applied and the game path checked.
#[derive(Debug, Clone)]
pub struct LibrarySettings {
    pub game_exe: Utf8PathBuf,
    pub paths: OverlayPaths,
    pub mod_extension: String,
    pub restore_on_close: bool,
}

impl LibrarySettings {
    /// Resolve the configured paths against the install directory.
    ///
    /// Fails if the game executable is unset or missing. The default mods
    /// folder is created when it does not exist yet; a custom one is not.
    pub fn resolve(cfg: &AppConfig, install: &InstallDir) -> Result<Self> {
        let game_exe = cfg.game_exe().ok_or(LibError::GameExeNotSet)?;
        if !game_exe.is_file() {
            return Err(LibError::GameExeNotFound(game_exe));
        }
        let game_dir = game_dir_for(&game_exe)
            .ok_or_else(|| LibError::GameExeNotFound(game_exe.clone()))?
            .to_path_buf();

        let mods_dir = cfg.mods_dir_or_default(install);
        if cfg.mods_dir.is_none() && !mods_dir.exists() {
            tracing::info!("Creating mods directory {}", mods_dir);
            std::fs::create_dir_all(mods_dir.as_std_path())?;
        }

        Ok(Self {
            paths: OverlayPaths {
                game_dir,
                mods_dir,
                backups_dir: cfg.backups_dir_or_default(install),
                status_path: install.join(STATUS_FILE_NAME),
            },
            game_exe,
            mod_extension: cfg.mod_extension_or_default(),
            restore_on_close: cfg.restore_on_close_or_default(),
        })
    }

    pub fn open_engine(&self) -> Result<OverlayEngine> {
        Ok(OverlayEngine::new(self.paths.clone())?.with_extension(&self.mod_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> (tempfile::TempDir, InstallDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let exe = root.join("game").join("StellaSora.exe");
        std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
        std::fs::write(&exe, b"").unwrap();
        let install = InstallDir::new(root.join("launcher"));
        std::fs::create_dir_all(install.path()).unwrap();
        (dir, install, exe)
    }

    #[test]
    fn test_resolve_defaults_and_create_mods_dir() {
        let (_dir, install, exe) = sandbox();
        let cfg = AppConfig {
            game_exe_path: Some(exe.to_string()),
            ..Default::default()
        };

        let settings = LibrarySettings::resolve(&cfg, &install).unwrap();

        assert_eq!(settings.paths.game_dir, exe.parent().unwrap());
        assert_eq!(settings.paths.mods_dir, install.join("Mods"));
        assert!(settings.paths.mods_dir.is_dir());
        assert_eq!(settings.paths.backups_dir, install.join("Backups"));
        assert_eq!(settings.paths.status_path, install.join("ModsStatus.json"));
        assert_eq!(settings.mod_extension, ".unity3d");
        assert!(settings.restore_on_close);
        assert!(settings.open_engine().is_ok());
    }

    #[test]
    fn test_resolve_requires_game_exe() {
        let (_dir, install, exe) = sandbox();

        let err = LibrarySettings::resolve(&AppConfig::default(), &install).unwrap_err();
        assert!(matches!(err, LibError::GameExeNotSet));

        let cfg = AppConfig {
            game_exe_path: Some(exe.with_file_name("Missing.exe").to_string()),
            ..Default::default()
        };
        let err = LibrarySettings::resolve(&cfg, &install).unwrap_err();
        assert!(matches!(err, LibError::GameExeNotFound(_)));
    }

    #[test]
    fn test_custom_mods_dir_is_not_created() {
        let (_dir, install, exe) = sandbox();
        let custom = install.join("Elsewhere");
        let cfg = AppConfig {
            game_exe_path: Some(exe.to_string()),
            mods_dir: Some(custom.to_string()),
            ..Default::default()
        };

        let settings = LibrarySettings::resolve(&cfg, &install).unwrap();

        assert!(!custom.exists());
        assert!(matches!(
            settings.open_engine(),
            Err(LibError::Overlay(stella_overlay::Error::InvalidModsDir(_)))
        ));
    }
}
