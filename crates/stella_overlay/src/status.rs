//! Persistent enable/disable state for mod files.
//!
//! The [`ModStatusStore`] keeps one [`ModRecord`] per mod file, keyed by its
//! POSIX path relative to the mods root, and persists them to a JSON side-car
//! (`ModsStatus.json`) that lives next to the launcher executable.
//!
//! The store is a status cache, not the source of truth for file content: a
//! missing or corrupt side-car is treated as "no prior state" and rebuilt by
//! the next [`sync`](ModStatusStore::sync). Backups are self-describing, so
//! losing this file never loses an original game file.
//!
//! # JSON format
//!
//! ```json
//! [
//!   {
//!     "path": "Chitose/char.unity3d",
//!     "hash": "<sha256 hex>",
//!     "applied_hash": "<sha256 hex or empty>",
//!     "enabled": true
//!   }
//! ]
//! ```
//!
//! Older side-cars without `applied_hash` are accepted and upgraded on the
//! next save.

use crate::error::Result;
use crate::hasher::{hash_file, ContentHash};
use crate::utils::{join_posix, posix_file_name};
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Default side-car file name.
pub const STATUS_FILE_NAME: &str = "ModsStatus.json";

/// Tracked state of a single mod file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModRecord {
    /// Path relative to the mods root, `/`-separated. Unique across the store.
    pub path: String,
    /// Hash of the mod file's bytes as of the last sync.
    pub hash: ContentHash,
    /// Hash of the mod content last written into the game directory.
    /// `None` (serialized as `""`) means the mod is not currently applied.
    #[serde(serialize_with = "serialize_applied_hash")]
    pub applied_hash: Option<ContentHash>,
    /// User intent. Independent of `applied_hash`.
    pub enabled: bool,
}

impl ModRecord {
    /// A freshly discovered mod: disabled and not applied.
    pub fn new(path: impl Into<String>, hash: ContentHash) -> Self {
        Self {
            path: path.into(),
            hash,
            applied_hash: None,
            enabled: false,
        }
    }

    /// The mod's filename, which is what it matches game files by.
    pub fn file_name(&self) -> &str {
        posix_file_name(&self.path)
    }

    pub fn is_applied(&self) -> bool {
        self.applied_hash.is_some()
    }
}

fn serialize_applied_hash<S: Serializer>(
    value: &Option<ContentHash>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_ref().map(ContentHash::as_str).unwrap_or(""))
}

/// On-disk shape used only for reading, so a missing `applied_hash` key can be
/// told apart from an empty one.
#[derive(Deserialize)]
struct StoredRecord {
    path: String,
    hash: String,
    #[serde(default)]
    applied_hash: Option<String>,
    #[serde(default)]
    enabled: bool,
}

/// Owns every [`ModRecord`] and the side-car they are persisted to.
///
/// Point mutations mark the store dirty; nothing is written until
/// [`save`](Self::save) or [`save_if_dirty`](Self::save_if_dirty) is called.
#[derive(Debug)]
pub struct ModStatusStore {
    mods_root: Utf8PathBuf,
    status_path: Utf8PathBuf,
    records: Vec<ModRecord>,
    dirty: bool,
}

impl ModStatusStore {
    /// Create a store for `mods_root` persisted at `status_path` and load it.
    pub fn open(mods_root: Utf8PathBuf, status_path: Utf8PathBuf) -> Self {
        let mut store = Self {
            mods_root,
            status_path,
            records: Vec::new(),
            dirty: false,
        };
        store.load();
        store
    }

    pub fn mods_root(&self) -> &Utf8Path {
        &self.mods_root
    }

    pub fn status_path(&self) -> &Utf8Path {
        &self.status_path
    }

    pub fn records(&self) -> &[ModRecord] {
        &self.records
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reload records from the side-car, discarding in-memory state.
    ///
    /// Never fails: a missing file yields an empty store, a corrupt one is
    /// logged and also yields an empty store.
    pub fn load(&mut self) {
        self.records.clear();
        self.dirty = false;

        let contents = match std::fs::read_to_string(self.status_path.as_std_path()) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}; starting empty", self.status_path, e);
                return;
            }
        };

        let stored: Vec<StoredRecord> = match serde_json::from_str(&contents) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(
                    "Corrupt mod status file {}: {}; starting empty",
                    self.status_path,
                    e
                );
                return;
            }
        };

        let mut seen = HashSet::new();
        for entry in stored {
            if !seen.insert(entry.path.clone()) {
                tracing::warn!("Dropping duplicate status entry for {}", entry.path);
                self.dirty = true;
                continue;
            }
            if entry.applied_hash.is_none() {
                // Pre-applied_hash format; the key is written back on next save
                self.dirty = true;
            }
            let hash = ContentHash::parse_hex(&entry.hash).unwrap_or_else(|| {
                tracing::warn!("Malformed hash for {}; it will be recomputed", entry.path);
                self.dirty = true;
                ContentHash::unknown()
            });
            let applied_hash = match entry.applied_hash.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => {
                    let parsed = ContentHash::parse_hex(raw);
                    if parsed.is_none() {
                        tracing::warn!(
                            "Malformed applied hash for {}; treating as unapplied",
                            entry.path
                        );
                        self.dirty = true;
                    }
                    parsed
                }
            };
            self.records.push(ModRecord {
                path: entry.path,
                hash,
                applied_hash,
                enabled: entry.enabled,
            });
        }

        tracing::debug!(
            "Loaded {} mod status record(s) from {}",
            self.records.len(),
            self.status_path
        );
    }

    /// Reconcile records against the mod files currently on disk.
    ///
    /// `current_files` holds POSIX paths relative to the mods root.
    ///
    /// - Untracked files get a new disabled, unapplied record.
    /// - Records whose file is gone are removed; those that were enabled are
    ///   returned so the caller can restore their game files.
    /// - Remaining records get their `hash` refreshed. `enabled` and
    ///   `applied_hash` are never touched by a content change.
    ///
    /// Files that cannot be hashed are skipped with a warning and left as they
    /// were. Calling this twice with an unchanged disk is a no-op.
    pub fn sync(&mut self, current_files: &BTreeSet<String>) -> Vec<ModRecord> {
        let mods_root = &self.mods_root;
        let hashes: HashMap<&str, Result<ContentHash>> = current_files
            .par_iter()
            .map(|rel| (rel.as_str(), hash_file(&join_posix(mods_root, rel))))
            .collect();

        let mut orphaned = Vec::new();
        let mut removed = 0usize;
        self.records.retain(|record| {
            if current_files.contains(&record.path) {
                return true;
            }
            tracing::info!(
                "Mod file gone: {} (enabled={})",
                record.path,
                record.enabled
            );
            if record.enabled {
                orphaned.push(record.clone());
            }
            removed += 1;
            false
        });

        let mut changed = 0usize;
        for record in &mut self.records {
            match hashes.get(record.path.as_str()) {
                Some(Ok(hash)) if *hash != record.hash => {
                    tracing::info!(
                        "Mod content changed: {} ({} -> {})",
                        record.path,
                        record.hash.short(),
                        hash.short()
                    );
                    record.hash = hash.clone();
                    changed += 1;
                }
                Some(Err(e)) => {
                    tracing::warn!("Skipping hash refresh for {}: {}", record.path, e);
                }
                _ => {}
            }
        }

        let known: HashSet<String> = self.records.iter().map(|r| r.path.clone()).collect();
        let mut added = 0usize;
        for rel in current_files {
            if known.contains(rel) {
                continue;
            }
            match hashes.get(rel.as_str()) {
                Some(Ok(hash)) => {
                    tracing::info!("New mod file: {}", rel);
                    self.records.push(ModRecord::new(rel.clone(), hash.clone()));
                    added += 1;
                }
                Some(Err(e)) => tracing::warn!("Cannot hash new mod {}: {}", rel, e),
                None => {}
            }
        }

        if added + removed + changed > 0 {
            self.dirty = true;
        }

        tracing::debug!(
            "Status sync: {} added, {} removed ({} orphaned), {} changed",
            added,
            removed,
            orphaned.len(),
            changed
        );

        orphaned
    }

    pub fn get(&self, rel: &str) -> Option<&ModRecord> {
        self.records.iter().find(|r| r.path == rel)
    }

    /// Whether the mod is flagged enabled. Unknown mods are disabled.
    pub fn is_enabled(&self, rel: &str) -> bool {
        self.get(rel).map(|r| r.enabled).unwrap_or(false)
    }

    pub fn set_enabled(&mut self, rel: &str, enabled: bool) -> Result<()> {
        let record = self.record_mut_or_insert(rel)?;
        if record.enabled != enabled {
            record.enabled = enabled;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn set_applied_hash(&mut self, rel: &str, applied: Option<ContentHash>) -> Result<()> {
        let record = self.record_mut_or_insert(rel)?;
        if record.applied_hash != applied {
            record.applied_hash = applied;
            self.dirty = true;
        }
        Ok(())
    }

    /// Mark every record as not applied (after a full restore).
    pub fn clear_all_applied(&mut self) {
        for record in &mut self.records {
            if record.applied_hash.take().is_some() {
                self.dirty = true;
            }
        }
    }

    pub fn remove(&mut self, rel: &str) -> Option<ModRecord> {
        let idx = self.records.iter().position(|r| r.path == rel)?;
        self.dirty = true;
        Some(self.records.remove(idx))
    }

    /// Other enabled records whose filename equals `file_name`.
    pub fn find_enabled_conflicts(&self, file_name: &str, excluding: Option<&str>) -> Vec<ModRecord> {
        self.records
            .iter()
            .filter(|r| r.enabled && r.file_name() == file_name)
            .filter(|r| excluding != Some(r.path.as_str()))
            .cloned()
            .collect()
    }

    /// Write all records to the side-car.
    ///
    /// The JSON is written to a sibling temp file first and then renamed over
    /// the side-car so a crash mid-write cannot truncate existing state.
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.status_path.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }

        let contents = serde_json::to_string_pretty(&self.records)?;
        let temp = self.status_path.with_extension("json.tmp");
        std::fs::write(temp.as_std_path(), contents)?;
        std::fs::rename(temp.as_std_path(), self.status_path.as_std_path())?;
        self.dirty = false;

        tracing::debug!(
            "Saved {} mod status record(s) to {}",
            self.records.len(),
            self.status_path
        );
        Ok(())
    }

    pub fn save_if_dirty(&mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    /// Find a record, creating it from disk if it is not tracked yet.
    fn record_mut_or_insert(&mut self, rel: &str) -> Result<&mut ModRecord> {
        if let Some(idx) = self.records.iter().position(|r| r.path == rel) {
            return Ok(&mut self.records[idx]);
        }

        let hash = hash_file(&join_posix(&self.mods_root, rel))?;
        let idx = self.records.len();
        self.records.push(ModRecord::new(rel, hash));
        self.dirty = true;
        Ok(&mut self.records[idx])
    }
}
