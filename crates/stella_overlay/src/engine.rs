//! The overlay engine: applies mod files over game files and undoes them.
//!
//! The engine ties together the [`ModStatusStore`], the [`BackupVault`] and a
//! [`GameIndex`] of the resource tree. Each mod file replaces every game file
//! that shares its filename. Before a game file is first overwritten its
//! original bytes are copied into the vault, and every later decision is made by
//! comparing content hashes (see [`decide_apply`]).
//!
//! Every notable action is reported twice: as a `tracing` event and as one
//! human-readable line sent to the optional logger sink registered with
//! [`with_logger`](OverlayEngine::with_logger).

use crate::backup::{collect_backups, is_backup_name, BackupVault};
use crate::conflict;
use crate::error::{Error, Result};
use crate::game_index::GameIndex;
use crate::hasher::{hash_file, ContentHash};
use crate::reconcile::{self, ReconcileReport};
use crate::status::{ModRecord, ModStatusStore};
use crate::utils::{copy_preserving, join_posix, posix_file_name, relative_posix};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use walkdir::WalkDir;

/// Default extension of mod files.
pub const DEFAULT_MOD_EXTENSION: &str = ".unity3d";

/// Receives one human-readable line per engine action.
pub type Logger = Arc<dyn Fn(&str) + Send + Sync>;

/// Filesystem locations the engine works with.
#[derive(Debug, Clone)]
pub struct OverlayPaths {
    /// Game resource directory that mod files are matched against.
    pub game_dir: Utf8PathBuf,
    /// Folder the user drops mod files into.
    pub mods_dir: Utf8PathBuf,
    /// Vault root for original-file backups.
    pub backups_dir: Utf8PathBuf,
    /// Status side-car (`ModsStatus.json`).
    pub status_path: Utf8PathBuf,
}

/// What [`decide_apply`] chose for one game file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    /// The game file already holds the mod's bytes.
    AlreadyApplied,
    /// First application: back up the live file, then copy the mod over it.
    BackupAndApply,
    /// The game file holds a previous version of this mod: put the original
    /// back, refresh the backup from it, then copy the new mod over it.
    ReplacePrevious,
    /// The game file changed outside our control (e.g. a game update): its
    /// current bytes become the new backup, then the mod is copied over it.
    RebackupAndApply,
}

impl ApplyAction {
    /// Whether the game file was written.
    pub fn wrote(self) -> bool {
        !matches!(self, ApplyAction::AlreadyApplied)
    }

    fn describe(self) -> &'static str {
        match self {
            ApplyAction::AlreadyApplied => "already applied",
            ApplyAction::BackupAndApply => "backed up & applied",
            ApplyAction::ReplacePrevious => "restored old file & applied new mod",
            ApplyAction::RebackupAndApply => "re-backed up & applied",
        }
    }
}

/// Choose how to bring one game file in line with a mod.
///
/// `applied_hash` is the hash of the mod content this engine last wrote, if
/// any. Only the existence of the backup matters; its content is never
/// consulted.
pub fn decide_apply(
    mod_hash: &ContentHash,
    game_hash: &ContentHash,
    backup_exists: bool,
    applied_hash: Option<&ContentHash>,
) -> ApplyAction {
    if mod_hash == game_hash {
        return ApplyAction::AlreadyApplied;
    }
    if !backup_exists {
        return ApplyAction::BackupAndApply;
    }
    if applied_hash == Some(game_hash) {
        ApplyAction::ReplacePrevious
    } else {
        ApplyAction::RebackupAndApply
    }
}

/// Outcome of applying one mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub mod_path: String,
    pub files: Vec<(Utf8PathBuf, ApplyAction)>,
}

impl ApplyReport {
    /// Number of game files that were actually written.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|(_, action)| action.wrote()).count()
    }
}

/// Per-mod outcome of a batch operation. One failing mod never stops the rest.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A mod file found on disk, joined with its tracked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModEntry {
    /// POSIX path relative to the mods directory.
    pub path: String,
    pub enabled: bool,
    pub applied: bool,
    /// `None` until the file has been synced into the store.
    pub hash: Option<ContentHash>,
}

impl ModEntry {
    pub fn file_name(&self) -> &str {
        posix_file_name(&self.path)
    }
}

/// Applies, verifies and restores mods for one game installation.
///
/// Not meant to be shared between threads; callers serialize access.
pub struct OverlayEngine {
    game_dir: Utf8PathBuf,
    mods_dir: Utf8PathBuf,
    extension: String,
    store: ModStatusStore,
    vault: BackupVault,
    logger: Option<Logger>,
}

impl std::fmt::Debug for OverlayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("game_dir", &self.game_dir)
            .field("mods_dir", &self.mods_dir)
            .field("extension", &self.extension)
            .field("vault", &self.vault.root())
            .finish_non_exhaustive()
    }
}

impl OverlayEngine {
    /// Open an engine over existing game and mods directories.
    ///
    /// The status side-car is loaded immediately. The backups directory is
    /// created on first use.
    pub fn new(paths: OverlayPaths) -> Result<Self> {
        if !paths.game_dir.is_dir() {
            return Err(Error::InvalidGameDir(paths.game_dir));
        }
        if !paths.mods_dir.is_dir() {
            return Err(Error::InvalidModsDir(paths.mods_dir));
        }

        tracing::debug!(
            "Opening overlay engine: game={} mods={} backups={}",
            paths.game_dir,
            paths.mods_dir,
            paths.backups_dir
        );

        let store = ModStatusStore::open(paths.mods_dir.clone(), paths.status_path);
        let vault = BackupVault::new(paths.backups_dir, paths.game_dir.clone());

        Ok(Self {
            game_dir: paths.game_dir,
            mods_dir: paths.mods_dir,
            extension: DEFAULT_MOD_EXTENSION.to_string(),
            store,
            vault,
            logger: None,
        })
    }

    /// Only files ending in `extension` (case-insensitive) are treated as mods.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    /// Register a sink for human-readable progress lines.
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    pub fn game_dir(&self) -> &Utf8Path {
        &self.game_dir
    }

    pub fn mods_dir(&self) -> &Utf8Path {
        &self.mods_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn store(&self) -> &ModStatusStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut ModStatusStore {
        &mut self.store
    }

    pub fn vault(&self) -> &BackupVault {
        &self.vault
    }

    pub(crate) fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!("{}", message);
        if let Some(logger) = &self.logger {
            logger(message);
        }
    }

    /// Relative paths of every mod file currently in the mods directory.
    ///
    /// Hidden files, backup-named files and a nested backups directory are
    /// skipped.
    pub fn scan_mod_files(&self) -> Result<BTreeSet<String>> {
        if !self.mods_dir.is_dir() {
            return Err(Error::InvalidModsDir(self.mods_dir.clone()));
        }

        let vault_root = self.vault.root().to_path_buf();
        let mut found = BTreeSet::new();

        let walker = WalkDir::new(self.mods_dir.as_std_path())
            .into_iter()
            .filter_entry(|entry| entry.path() != vault_root.as_std_path());

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable mod path: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(path) => path,
                Err(path) => {
                    tracing::warn!("Skipping non-UTF-8 mod path: {}", path.display());
                    continue;
                }
            };
            let Some(name) = path.file_name() else {
                continue;
            };
            if name.starts_with('.') || is_backup_name(name) {
                continue;
            }
            if !name.to_ascii_lowercase().ends_with(&self.extension) {
                continue;
            }

            found.insert(relative_posix(&self.mods_dir, &path)?);
        }

        Ok(found)
    }

    /// Mod files on disk with their enable/apply state.
    pub fn list_mods(&self) -> Result<Vec<ModEntry>> {
        Ok(self
            .scan_mod_files()?
            .into_iter()
            .map(|path| {
                let record = self.store.get(&path);
                ModEntry {
                    enabled: record.map(|r| r.enabled).unwrap_or(false),
                    applied: record.map(ModRecord::is_applied).unwrap_or(false),
                    hash: record.map(|r| r.hash.clone()),
                    path,
                }
            })
            .collect())
    }

    pub fn is_enabled(&self, mod_path: &str) -> bool {
        self.store.is_enabled(mod_path)
    }

    /// Whether the mod's content was written into the game and not yet
    /// restored.
    pub fn is_applied(&self, mod_path: &str) -> bool {
        self.store
            .get(mod_path)
            .map(ModRecord::is_applied)
            .unwrap_or(false)
    }

    /// Game files that a mod would replace: every file under the game tree
    /// whose name equals the mod's filename.
    pub fn find_original_files(&self, mod_path: &str) -> Result<Vec<Utf8PathBuf>> {
        let index = self.build_index()?;
        Ok(index.find(posix_file_name(mod_path)).to_vec())
    }

    /// Other enabled mods that target the same filename as `mod_path`.
    pub fn check_conflicts(&self, mod_path: &str) -> Vec<ModRecord> {
        conflict::find_conflicts(&self.store, mod_path)
    }

    /// Sync the store with the mods directory and return enabled records
    /// whose file disappeared. Their game files are not restored here.
    pub fn sync_and_get_orphans(&mut self) -> Result<Vec<ModRecord>> {
        let files = self.scan_mod_files()?;
        let orphaned = self.store.sync(&files);
        self.store.save_if_dirty()?;
        Ok(orphaned)
    }

    /// Full drift reconciliation; see [`reconcile::reconcile`].
    pub fn reconcile(&mut self) -> Result<ReconcileReport> {
        reconcile::reconcile(self)
    }

    /// Enable or disable one mod and persist the new state.
    ///
    /// The `enabled` flag only changes when the apply/unapply succeeded. A
    /// failed enable restores any game file it already overwrote.
    pub fn toggle(&mut self, mod_path: &str, enable: bool) -> Result<()> {
        let index = self.build_index()?;
        let outcome = self.toggle_with(&index, mod_path, enable);
        self.store.save_if_dirty()?;
        outcome
    }

    /// Toggle every mod whose flag differs from `enable`.
    ///
    /// Disabling also covers mods still applied without their flag set.
    pub fn set_all(&mut self, enable: bool) -> Result<BatchReport> {
        let files = self.scan_mod_files()?;
        self.store.sync(&files);

        let targets: Vec<String> = files
            .into_iter()
            .filter(|path| {
                if enable {
                    !self.is_enabled(path)
                } else {
                    self.is_enabled(path) || self.is_applied(path)
                }
            })
            .collect();

        if targets.is_empty() {
            self.log(if enable {
                "All mods already enabled."
            } else {
                "All mods already disabled."
            });
            self.store.save_if_dirty()?;
            return Ok(BatchReport::default());
        }

        let index = self.build_index()?;
        let mut report = BatchReport::default();
        for path in targets {
            match self.toggle_with(&index, &path, enable) {
                Ok(()) => report.succeeded.push(path),
                Err(e) => {
                    self.log(format!("Failed to toggle {}: {}", path, e));
                    report.failed.push((path, e));
                }
            }
        }

        self.store.save_if_dirty()?;
        Ok(report)
    }

    /// Apply one mod without touching its `enabled` flag.
    pub fn apply(&mut self, mod_path: &str) -> Result<ApplyReport> {
        let index = self.build_index()?;
        let outcome = self.apply_with(&index, mod_path);
        self.store.save_if_dirty()?;
        outcome
    }

    /// Restore the game files a mod replaced, without touching its flag.
    pub fn unapply(&mut self, mod_path: &str) -> Result<usize> {
        let index = self.build_index()?;
        let outcome = self.unapply_with(&index, mod_path);
        self.store.save_if_dirty()?;
        outcome
    }

    /// Make sure every enabled mod is really in the game files.
    ///
    /// A mod that was never applied, or whose content differs from any of its
    /// target files, is re-applied in full.
    pub fn verify_enabled(&mut self) -> Result<BatchReport> {
        let enabled = self.enabled_paths();
        if enabled.is_empty() {
            self.log("No enabled mods to verify.");
            return Ok(BatchReport::default());
        }

        self.log("Verifying enabled mods...");
        let index = self.build_index()?;
        let mut report = BatchReport::default();

        for path in enabled {
            match self.verify_one(&index, &path) {
                Ok(()) => report.succeeded.push(path),
                Err(e) => {
                    self.log(format!("Failed to verify {}: {}", path, e));
                    report.failed.push((path, e));
                }
            }
        }

        self.store.save_if_dirty()?;
        Ok(report)
    }

    /// Apply every enabled mod.
    pub fn install_all_enabled(&mut self) -> Result<BatchReport> {
        let enabled = self.enabled_paths();
        if enabled.is_empty() {
            self.log("No enabled mods to install.");
            return Ok(BatchReport::default());
        }

        let index = self.build_index()?;
        let mut report = BatchReport::default();

        for path in enabled {
            match self.apply_with(&index, &path) {
                Ok(_) => report.succeeded.push(path),
                Err(e) => {
                    self.log(format!("Failed to install {}: {}", path, e));
                    report.failed.push((path, e));
                }
            }
        }

        self.store.save_if_dirty()?;
        Ok(report)
    }

    /// Put every backed-up original back into the game tree.
    ///
    /// Covers the vault plus hidden legacy backups beside mod files. Every
    /// record ends up unapplied; `enabled` flags are kept. Returns the number
    /// of files restored.
    pub fn restore_all(&mut self) -> Result<usize> {
        self.log("Restoring original files...");

        let mut backups = self.vault.all_backups();
        let legacy = collect_backups(&self.mods_dir, &[self.vault.root().to_path_buf()])
            .into_iter()
            .filter(|path| path.file_name().map(|n| n.starts_with('.')).unwrap_or(false));
        backups.extend(legacy);

        let mut restored = 0;
        for backup in self.order_for_restore(backups) {
            match self.vault.restore(&backup) {
                Ok(Some(target)) => {
                    self.log(format!(
                        "  - Restored {} ({})",
                        posix_file_name(target.as_str()),
                        self.folder_label(&target)
                    ));
                    restored += 1;
                }
                Ok(None) => self.log(format!("  - Skipped {}", backup)),
                Err(e) => self.log(format!("  - Failed to restore {}: {}", backup, e)),
            }
        }

        self.store.clear_all_applied();
        self.vault.sweep_empty_folders();
        self.store.save_if_dirty()?;

        self.log(format!("Restored {} file(s).", restored));
        Ok(restored)
    }

    /// Restore the game files of mods whose file disappeared.
    pub fn restore_orphans(&mut self, orphans: &[ModRecord]) -> Vec<Utf8PathBuf> {
        let mut restored = Vec::new();

        for orphan in orphans {
            self.log(format!("Restoring files for removed mod {}", orphan.path));

            let mut backups = self.vault.find_backups_for(&orphan.path);
            backups.extend(self.legacy_backups_for(&orphan.path));

            if backups.is_empty() {
                self.log("  - no backups found");
                continue;
            }

            for backup in backups {
                match self.vault.restore(&backup) {
                    Ok(Some(target)) => {
                        self.log(format!(
                            "  - {} ({}): restored",
                            posix_file_name(target.as_str()),
                            self.folder_label(&target)
                        ));
                        restored.push(target);
                    }
                    Ok(None) => self.log(format!("  - Skipped {}", backup)),
                    Err(e) => self.log(format!("  - Failed to restore {}: {}", backup, e)),
                }
            }
        }

        restored
    }

    pub(crate) fn build_index(&self) -> Result<GameIndex> {
        let excluded = [self.mods_dir.clone(), self.vault.root().to_path_buf()];
        GameIndex::build(&self.game_dir, &excluded)
    }

    fn toggle_with(&mut self, index: &GameIndex, mod_path: &str, enable: bool) -> Result<()> {
        if enable {
            let was_applied = self.is_applied(mod_path);
            if let Err(e) = self.apply_with(index, mod_path) {
                // A disabled mod must not leave partial writes behind
                if !was_applied && self.is_applied(mod_path) {
                    self.log(format!("Rolling back {}", mod_path));
                    if let Err(rollback) = self.unapply_with(index, mod_path) {
                        tracing::error!("Rollback of {} failed: {}", mod_path, rollback);
                    }
                }
                return Err(e);
            }
        } else {
            self.unapply_with(index, mod_path)?;
        }
        self.store.set_enabled(mod_path, enable)
    }

    fn apply_with(&mut self, index: &GameIndex, mod_path: &str) -> Result<ApplyReport> {
        let mod_file = join_posix(&self.mods_dir, mod_path);
        if !mod_file.is_file() {
            return Err(Error::ModNotFound(mod_file));
        }

        let mod_hash = hash_file(&mod_file)?;
        let applied = self
            .store
            .get(mod_path)
            .and_then(|record| record.applied_hash.clone());

        let game_files = index.find(posix_file_name(mod_path));
        if game_files.is_empty() {
            self.log(format!("No game files found for {}", mod_path));
            return Err(Error::NoGameFiles {
                mod_path: mod_path.to_string(),
            });
        }

        self.log(format!("Applying {}", mod_path));

        let mut report = ApplyReport {
            mod_path: mod_path.to_string(),
            files: Vec::with_capacity(game_files.len()),
        };
        let outcome = self.apply_files(
            &mod_file,
            mod_path,
            &mod_hash,
            applied.as_ref(),
            game_files,
            &mut report,
        );

        // Files already written hold the mod, even if a later one failed
        if outcome.is_ok() || !report.files.is_empty() {
            self.store.set_applied_hash(mod_path, Some(mod_hash))?;
        }
        outcome?;

        Ok(report)
    }

    fn apply_files(
        &self,
        mod_file: &Utf8Path,
        mod_path: &str,
        mod_hash: &ContentHash,
        applied: Option<&ContentHash>,
        game_files: &[Utf8PathBuf],
        report: &mut ApplyReport,
    ) -> Result<()> {
        for game_file in game_files {
            let game_hash = hash_file(game_file)?;
            let backup = self.vault.backup_path_for(mod_path, game_file)?;
            let action = decide_apply(mod_hash, &game_hash, backup.is_file(), applied);

            tracing::debug!(
                "{}: mod={} game={} -> {:?}",
                game_file,
                mod_hash.short(),
                game_hash.short(),
                action
            );

            match action {
                ApplyAction::AlreadyApplied => {}
                ApplyAction::BackupAndApply | ApplyAction::RebackupAndApply => {
                    self.vault.store(game_file, &backup)?;
                    copy_preserving(mod_file, game_file)?;
                }
                ApplyAction::ReplacePrevious => {
                    copy_preserving(&backup, game_file)?;
                    self.vault.store(game_file, &backup)?;
                    copy_preserving(mod_file, game_file)?;
                }
            }

            self.log(format!(
                "  - {} ({}): {}",
                posix_file_name(game_file.as_str()),
                self.folder_label(game_file),
                action.describe()
            ));
            report.files.push((game_file.clone(), action));
        }
        Ok(())
    }

    fn unapply_with(&mut self, index: &GameIndex, mod_path: &str) -> Result<usize> {
        self.log(format!("Disabling {}", mod_path));

        let mut restored = 0;
        for game_file in index.find(posix_file_name(mod_path)) {
            let backup = self.vault.backup_path_for(mod_path, game_file)?;
            let label = format!(
                "{} ({})",
                posix_file_name(game_file.as_str()),
                self.folder_label(game_file)
            );

            if backup.is_file() {
                copy_preserving(&backup, game_file)?;
                std::fs::remove_file(backup.as_std_path())?;
                self.log(format!("  - {}: restored", label));
                restored += 1;
            } else {
                self.log(format!("  - {}: no backup found", label));
            }
        }

        if self.store.get(mod_path).is_some() {
            self.store.set_applied_hash(mod_path, None)?;
        }
        Ok(restored)
    }

    fn verify_one(&mut self, index: &GameIndex, mod_path: &str) -> Result<()> {
        let mod_file = join_posix(&self.mods_dir, mod_path);
        if !mod_file.is_file() {
            return Err(Error::ModNotFound(mod_file));
        }

        let mod_hash = hash_file(&mod_file)?;
        let never_applied = self
            .store
            .get(mod_path)
            .map(|record| !record.is_applied())
            .unwrap_or(true);

        let mut needs_reapply = never_applied;
        if !needs_reapply {
            for game_file in index.find(posix_file_name(mod_path)) {
                if hash_file(game_file)? != mod_hash {
                    needs_reapply = true;
                    break;
                }
            }
        }

        if needs_reapply {
            self.log(format!("Re-applying {}...", mod_path));
            self.apply_with(index, mod_path)?;
        } else {
            self.log(format!("Verified: {}", mod_path));
        }
        Ok(())
    }

    fn enabled_paths(&self) -> Vec<String> {
        self.store
            .records()
            .iter()
            .filter(|record| record.enabled)
            .map(|record| record.path.clone())
            .collect()
    }

    /// Hidden backups an older install left beside the mod file.
    fn legacy_backups_for(&self, mod_path: &str) -> Vec<Utf8PathBuf> {
        let prefix = format!(".{}.backup.", posix_file_name(mod_path));
        let folder = match mod_path.rsplit_once('/') {
            Some((parent, _)) => join_posix(&self.mods_dir, parent),
            None => self.mods_dir.clone(),
        };

        let Ok(entries) = folder.read_dir_utf8() else {
            return Vec::new();
        };
        let mut found: Vec<Utf8PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().starts_with(&prefix))
            .map(|entry| entry.into_path())
            .collect();
        found.sort();
        found
    }

    /// Order backups so that, when several target the same game file, the
    /// one holding non-mod content is restored last and wins.
    ///
    /// Two enabled mods sharing a filename stack their backups: the second
    /// mod's backup holds the first mod's bytes.
    fn order_for_restore(&self, backups: Vec<Utf8PathBuf>) -> Vec<Utf8PathBuf> {
        let mut by_target: BTreeMap<Utf8PathBuf, Vec<Utf8PathBuf>> = BTreeMap::new();
        let mut unparsable = Vec::new();
        for backup in backups {
            match self.vault.target_for(&backup) {
                Some(target) => by_target.entry(target).or_default().push(backup),
                None => unparsable.push(backup),
            }
        }

        let mod_hashes: HashSet<&ContentHash> = self
            .store
            .records()
            .iter()
            .flat_map(|record| std::iter::once(&record.hash).chain(record.applied_hash.as_ref()))
            .collect();

        let mut ordered = unparsable;
        for (_, mut group) in by_target {
            if group.len() > 1 {
                group.sort_by_key(|backup| match hash_file(backup) {
                    Ok(hash) => !mod_hashes.contains(&hash),
                    Err(_) => false,
                });
            }
            ordered.extend(group);
        }
        ordered
    }

    fn folder_label(&self, game_file: &Utf8Path) -> String {
        game_file
            .strip_prefix(&self.game_dir)
            .ok()
            .and_then(|rel| rel.components().next())
            .map(|c| c.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Lowercase `extension` and make sure it starts with a dot.
pub fn normalize_extension(extension: &str) -> String {
    let extension = extension.trim().to_ascii_lowercase();
    if extension.is_empty() {
        DEFAULT_MOD_EXTENSION.to_string()
    } else if extension.starts_with('.') {
        extension
    } else {
        format!(".{}", extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::hash_bytes;

    #[test]
    fn test_decide_apply_table() {
        let m = hash_bytes(b"mod");
        let g = hash_bytes(b"game");
        let old = hash_bytes(b"old mod");

        assert_eq!(decide_apply(&m, &m, false, None), ApplyAction::AlreadyApplied);
        assert_eq!(decide_apply(&m, &m, true, Some(&old)), ApplyAction::AlreadyApplied);
        assert_eq!(decide_apply(&m, &g, false, None), ApplyAction::BackupAndApply);
        assert_eq!(decide_apply(&m, &g, false, Some(&g)), ApplyAction::BackupAndApply);
        assert_eq!(decide_apply(&m, &g, true, Some(&g)), ApplyAction::ReplacePrevious);
        assert_eq!(decide_apply(&m, &g, true, Some(&old)), ApplyAction::RebackupAndApply);
        assert_eq!(decide_apply(&m, &g, true, None), ApplyAction::RebackupAndApply);
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("unity3d"), ".unity3d");
        assert_eq!(normalize_extension(".Unity3D"), ".unity3d");
        assert_eq!(normalize_extension("  "), DEFAULT_MOD_EXTENSION);
    }

    #[test]
    fn test_apply_report_written() {
        let report = ApplyReport {
            mod_path: "A/x.unity3d".into(),
            files: vec![
                ("g/a/x.unity3d".into(), ApplyAction::AlreadyApplied),
                ("g/b/x.unity3d".into(), ApplyAction::BackupAndApply),
            ],
        };
        assert_eq!(report.written(), 1);
    }
}
