//! Hash-verified, reversible file overlay for Stella Sora mods.
//!
//! Mods are plain asset files dropped into a mods folder. Each one replaces
//! every game file with the same filename. This crate provides:
//!
//! - **Persistent state**: per-mod enabled flag and applied content hash,
//!   stored in a JSON side-car ([`ModStatusStore`])
//! - **Safe overwrites**: originals are backed up into a vault before the
//!   first overwrite and restored on disable ([`BackupVault`])
//! - **Drift handling**: game updates, edited mods and deleted mods are
//!   detected by content hash and resolved without losing originals
//! - **Conflict reporting**: enabled mods that target the same file
//!
//! # Example
//!
//! ```no_run
//! use stella_overlay::{OverlayEngine, OverlayPaths};
//! use camino::Utf8PathBuf;
//!
//! # fn main() -> stella_overlay::Result<()> {
//! let mut engine = OverlayEngine::new(OverlayPaths {
//!     game_dir: Utf8PathBuf::from("C:/Games/StellaSora/StellaSora_Data"),
//!     mods_dir: Utf8PathBuf::from("C:/Tools/StellaMod/Mods"),
//!     backups_dir: Utf8PathBuf::from("C:/Tools/StellaMod/Backups"),
//!     status_path: Utf8PathBuf::from("C:/Tools/StellaMod/ModsStatus.json"),
//! })?
//! .with_extension(".unity3d")
//! .with_logger(|line| println!("{line}"));
//!
//! engine.reconcile()?;
//! engine.toggle("Chitose/char.unity3d", true)?;
//! let report = engine.verify_enabled()?;
//! println!("{} verified, {} failed", report.succeeded.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod game_index;
pub mod hasher;
pub mod reconcile;
pub mod status;
pub mod utils;

pub use backup::{parse_backup_name, BackupName, BackupVault, BACKUP_MARKER};
pub use conflict::{enabled_conflict_groups, find_conflicts, ConflictGroup};
pub use engine::{
    decide_apply, normalize_extension, ApplyAction, ApplyReport, BatchReport, Logger, ModEntry,
    OverlayEngine, OverlayPaths, DEFAULT_MOD_EXTENSION,
};
pub use error::{Error, Result};
pub use game_index::GameIndex;
pub use hasher::{hash_bytes, hash_file, ContentHash};
pub use reconcile::ReconcileReport;
pub use status::{ModRecord, ModStatusStore, STATUS_FILE_NAME};
