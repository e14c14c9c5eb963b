//! Core shared logic for Stella Sora mod management.
//!
//! This crate provides the plumbing shared by the `stella-mod` CLI and the
//! launch orchestration in `stella_mod_lib`: install directory resolution,
//! `config.toml` handling, and game process detection.

mod config;
mod error;
mod game_path;
mod game_process;
mod install_dir;

pub use config::{
    AppConfig, ConfigStore, CONFIG_FILE_NAME, CONFIG_KEYS, DEFAULT_BACKUPS_DIR,
    DEFAULT_MODS_DIR, DEFAULT_MOD_EXTENSION,
};
pub use error::{CoreError, Result};
pub use game_path::{detect_from_running_process, game_dir_for, is_valid_game_path, GAME_EXE_NAME};
pub use game_process::{launch_game, GameEvent, GameMonitor, GameProbe, SysinfoProbe, WaitPolicy};
pub use install_dir::InstallDir;
