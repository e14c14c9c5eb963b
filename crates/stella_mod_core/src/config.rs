//! Application configuration stored in `config.toml` next to the executable.
//!
//! Every option is optional on disk; the `*_or_default` resolvers supply the
//! fallback so an empty or missing file is a valid configuration.

use crate::error::{CoreError, Result};
use crate::install_dir::InstallDir;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_MODS_DIR: &str = "Mods";
pub const DEFAULT_BACKUPS_DIR: &str = "Backups";
pub const DEFAULT_MOD_EXTENSION: &str = ".unity3d";

/// Keys accepted by [`AppConfig::set_value`].
pub const CONFIG_KEYS: &[&str] = &[
    "game_exe_path",
    "mods_dir",
    "backups_dir",
    "mod_extension",
    "restore_on_close",
    "hide_ui_while_running",
];

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Full path to `StellaSora.exe`.
    pub game_exe_path: Option<String>,
    pub mods_dir: Option<String>,
    pub backups_dir: Option<String>,
    pub mod_extension: Option<String>,
    /// Restore original files once the game exits.
    pub restore_on_close: Option<bool>,
    /// Hide the launcher UI while the game runs.
    pub hide_ui_while_running: Option<bool>,
}

impl AppConfig {
    pub fn game_exe(&self) -> Option<Utf8PathBuf> {
        non_empty(&self.game_exe_path).map(Utf8PathBuf::from)
    }

    pub fn mods_dir_or_default(&self, install: &InstallDir) -> Utf8PathBuf {
        non_empty(&self.mods_dir)
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| install.join(DEFAULT_MODS_DIR))
    }

    pub fn backups_dir_or_default(&self, install: &InstallDir) -> Utf8PathBuf {
        non_empty(&self.backups_dir)
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| install.join(DEFAULT_BACKUPS_DIR))
    }

    /// Configured extension with a leading dot, or `.unity3d`.
    pub fn mod_extension_or_default(&self) -> String {
        match non_empty(&self.mod_extension) {
            Some(ext) if ext.starts_with('.') => ext.to_string(),
            Some(ext) => format!(".{}", ext),
            None => DEFAULT_MOD_EXTENSION.to_string(),
        }
    }

    pub fn restore_on_close_or_default(&self) -> bool {
        self.restore_on_close.unwrap_or(true)
    }

    pub fn hide_ui_while_running_or_default(&self) -> bool {
        self.hide_ui_while_running.unwrap_or(true)
    }

    /// Set one option from its string form. An empty value clears it.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let text = (!value.is_empty()).then(|| value.to_string());

        match key {
            "game_exe_path" => self.game_exe_path = text,
            "mods_dir" => self.mods_dir = text,
            "backups_dir" => self.backups_dir = text,
            "mod_extension" => self.mod_extension = text,
            "restore_on_close" => self.restore_on_close = parse_bool(key, value)?,
            "hide_ui_while_running" => self.hide_ui_while_running = parse_bool(key, value)?,
            _ => return Err(CoreError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<Option<bool>> {
    match value.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "yes" | "1" | "on" => Ok(Some(true)),
        "false" | "no" | "0" | "off" => Ok(Some(false)),
        _ => Err(CoreError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Reads and writes an [`AppConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Utf8PathBuf,
}

impl ConfigStore {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    /// `config.toml` inside the install directory.
    pub fn beside(install: &InstallDir) -> Self {
        Self::new(install.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Load the configuration, falling back to defaults if the file is
    /// missing or cannot be parsed.
    pub fn load(&self) -> AppConfig {
        match self.try_load() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => AppConfig::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {}: {}", self.path, e);
                AppConfig::default()
            }
        }
    }

    /// Like [`load`](Self::load) but reports parse errors.
    pub fn try_load(&self) -> Result<Option<AppConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(self.path.as_std_path())?;
        Ok(Some(toml::from_str(&content)?))
    }

    pub fn save(&self, cfg: &AppConfig) -> Result<()> {
        let content = toml::to_string_pretty(cfg)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent.as_std_path())?;
        }
        fs::write(self.path.as_std_path(), content)?;
        tracing::debug!("Saved config to {}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> (tempfile::TempDir, InstallDir) {
        let dir = tempfile::tempdir().unwrap();
        let install = InstallDir::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap());
        (dir, install)
    }

    #[test]
    fn test_defaults() {
        let (_dir, install) = sandbox();
        let cfg = AppConfig::default();

        assert_eq!(cfg.game_exe(), None);
        assert_eq!(cfg.mods_dir_or_default(&install), install.join("Mods"));
        assert_eq!(cfg.backups_dir_or_default(&install), install.join("Backups"));
        assert_eq!(cfg.mod_extension_or_default(), ".unity3d");
        assert!(cfg.restore_on_close_or_default());
        assert!(cfg.hide_ui_while_running_or_default());
    }

    #[test]
    fn test_extension_gets_leading_dot() {
        let cfg = AppConfig {
            mod_extension: Some("bundle".into()),
            ..Default::default()
        };
        assert_eq!(cfg.mod_extension_or_default(), ".bundle");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let (_dir, install) = sandbox();
        let cfg = AppConfig {
            game_exe_path: Some("  ".into()),
            mods_dir: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(cfg.game_exe(), None);
        assert_eq!(cfg.mods_dir_or_default(&install), install.join("Mods"));
    }

    #[test]
    fn test_set_value() {
        let mut cfg = AppConfig::default();
        cfg.set_value("game_exe_path", "C:/Games/StellaSora.exe").unwrap();
        cfg.set_value("restore_on_close", "off").unwrap();
        cfg.set_value("hide_ui_while_running", "YES").unwrap();

        assert_eq!(cfg.game_exe(), Some(Utf8PathBuf::from("C:/Games/StellaSora.exe")));
        assert_eq!(cfg.restore_on_close, Some(false));
        assert_eq!(cfg.hide_ui_while_running, Some(true));

        cfg.set_value("restore_on_close", "").unwrap();
        assert_eq!(cfg.restore_on_close, None);

        assert!(matches!(
            cfg.set_value("restore_on_close", "maybe"),
            Err(CoreError::InvalidBool { .. })
        ));
        assert!(matches!(
            cfg.set_value("game_path", "x"),
            Err(CoreError::UnknownConfigKey(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, install) = sandbox();
        let store = ConfigStore::beside(&install);
        let cfg = AppConfig {
            game_exe_path: Some("C:/Games/StellaSora.exe".into()),
            restore_on_close: Some(false),
            ..Default::default()
        };

        store.save(&cfg).unwrap();

        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn test_load_missing_or_corrupt_is_default() {
        let (_dir, install) = sandbox();
        let store = ConfigStore::beside(&install);
        assert_eq!(store.load(), AppConfig::default());

        fs::write(store.path(), "restore_on_close = [").unwrap();
        assert_eq!(store.load(), AppConfig::default());
        assert!(store.try_load().is_err());
    }
}
