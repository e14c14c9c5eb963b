//! Launch orchestration for Stella Sora mods.
//!
//! Ties the configuration from `stella_mod_core` to the overlay engine in
//! `stella_overlay`: resolving settings, guarding against a second running
//! instance, and driving a play session from mod verification to restoring
//! the original files.

mod error;
mod launch;
mod library;
mod lock;

pub use error::{LibError, Result};
pub use launch::{LaunchEvent, LaunchHandle, LaunchOptions, Launcher};
pub use library::LibrarySettings;
pub use lock::{InstanceLock, LOCK_FILE_NAME};
