//! Error types for overlay operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. External error types (`std::io::Error`, `serde_json::Error`,
//! `walkdir::Error`) are automatically converted via `From` impls.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while applying, restoring or tracking mods.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (hashing, copying, writing the status file, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the status side-car.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directory walk failed part-way (permissions, vanished folder).
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The mods directory does not exist.
    #[error("Mods directory not found: {0}")]
    InvalidModsDir(Utf8PathBuf),

    /// The game resource directory does not exist.
    #[error("Game directory not found: {0}")]
    InvalidGameDir(Utf8PathBuf),

    /// A mod path given by the caller does not exist on disk.
    #[error("Mod file not found: {0}")]
    ModNotFound(Utf8PathBuf),

    /// No file in the game tree shares the mod's filename.
    #[error("No game files found for {mod_path} (check the filename)")]
    NoGameFiles { mod_path: String },

    /// A path was expected to live under a root directory but does not.
    #[error("{path} is not inside {root}")]
    OutsideRoot { path: Utf8PathBuf, root: Utf8PathBuf },

    /// Catch-all for errors that carry only a message.
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
