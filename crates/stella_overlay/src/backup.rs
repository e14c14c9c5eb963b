//! Storage for the original game files that mods replace.
//!
//! Backups are self-describing: the filename alone says which game file the
//! backup belongs to, so restoring never needs the status side-car.
//!
//! ```text
//! <vault>/<mod parent dirs>/{game_name}.backup.{dot-joined game folders}
//! ```
//!
//! For a mod at `Chitose/char.unity3d` replacing
//! `<game>/Persistent/Chars/char.unity3d` the backup is
//! `<vault>/Chitose/char.unity3d.backup.Persistent.Chars`.
//!
//! Older installs kept backups next to the mod file with a leading `.`
//! (`.char.unity3d.backup.Persistent.Chars`); those names parse too.

use crate::error::Result;
use crate::utils::{copy_preserving, join_posix, posix_file_name, relative_posix};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Separator between the original filename and the encoded folders.
pub const BACKUP_MARKER: &str = ".backup.";

/// Decoded backup filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupName {
    /// Name of the game file the backup was taken from.
    pub original_name: String,
    /// Game-relative folders between the resource root and the file.
    pub folders: Vec<String>,
}

/// Decode a backup filename, accepting the legacy leading-dot variant.
///
/// Returns `None` unless the marker appears exactly once with a non-empty
/// original name in front of it.
pub fn parse_backup_name(file_name: &str) -> Option<BackupName> {
    let name = file_name.strip_prefix('.').unwrap_or(file_name);

    let (original_name, suffix) = match name.split_once(BACKUP_MARKER) {
        Some(split) => split,
        // `x.backup.` loses its trailing dot on some filesystems
        None => (name.strip_suffix(".backup")?, ""),
    };

    if original_name.is_empty() || suffix.contains(BACKUP_MARKER) {
        return None;
    }

    Some(BackupName {
        original_name: original_name.to_string(),
        folders: suffix
            .split('.')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Whether `file_name` looks like a backup (new or legacy naming).
pub fn is_backup_name(file_name: &str) -> bool {
    parse_backup_name(file_name).is_some()
}

/// Backups of original game files, mirrored by mod folder.
#[derive(Debug, Clone)]
pub struct BackupVault {
    root: Utf8PathBuf,
    game_dir: Utf8PathBuf,
}

impl BackupVault {
    pub fn new(root: Utf8PathBuf, game_dir: Utf8PathBuf) -> Self {
        Self { root, game_dir }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Where the backup of `game_file` taken for the mod at `mod_rel` lives.
    pub fn backup_path_for(&self, mod_rel: &str, game_file: &Utf8Path) -> Result<Utf8PathBuf> {
        let game_rel = relative_posix(&self.game_dir, game_file)?;
        let mut parts: Vec<&str> = game_rel.split('/').collect();
        let game_name = parts.pop().unwrap_or_default();
        if parts.iter().any(|folder| folder.contains('.')) {
            tracing::warn!(
                "Game folder of {} contains '.'; its backup cannot be mapped back to it",
                game_rel
            );
        }

        let backup_name = format!("{}{}{}", game_name, BACKUP_MARKER, parts.join("."));

        let mod_parent = mod_rel
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or("");

        Ok(join_posix(&self.root, mod_parent).join(backup_name))
    }

    /// The game file a backup restores onto.
    pub fn target_for(&self, backup: &Utf8Path) -> Option<Utf8PathBuf> {
        let parsed = parse_backup_name(backup.file_name()?)?;
        let mut target = self.game_dir.clone();
        for folder in &parsed.folders {
            target.push(folder);
        }
        target.push(&parsed.original_name);
        Some(target)
    }

    /// Copy the live `game_file` into `backup`, overwriting any previous copy.
    pub fn store(&self, game_file: &Utf8Path, backup: &Utf8Path) -> Result<()> {
        copy_preserving(game_file, backup)
    }

    /// Copy `backup` back onto its game file and delete it.
    ///
    /// Returns the restored game path, or `None` if the name is malformed or
    /// the target's folder no longer exists in the game tree (both logged).
    pub fn restore(&self, backup: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
        let Some(target) = self.target_for(backup) else {
            tracing::warn!("Skipping malformed backup name: {}", backup);
            return Ok(None);
        };

        let parent_exists = target.parent().map(Utf8Path::is_dir).unwrap_or(false);
        if !target.exists() && !parent_exists {
            tracing::warn!(
                "Skipping backup {}: target folder for {} no longer exists",
                backup,
                target
            );
            return Ok(None);
        }

        copy_preserving(backup, &target)?;
        std::fs::remove_file(backup.as_std_path())?;
        tracing::info!("Restored {} from {}", target, backup);

        Ok(Some(target))
    }

    /// Backups taken for the mod at `mod_rel`.
    pub fn find_backups_for(&self, mod_rel: &str) -> Vec<Utf8PathBuf> {
        let mod_name = posix_file_name(mod_rel);
        let folder = match mod_rel.rsplit_once('/') {
            Some((parent, _)) => join_posix(&self.root, parent),
            None => self.root.clone(),
        };

        let Ok(entries) = folder.read_dir_utf8() else {
            return Vec::new();
        };

        let mut found: Vec<Utf8PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|entry| {
                parse_backup_name(entry.file_name())
                    .map(|parsed| parsed.original_name == mod_name)
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();
        found.sort();
        found
    }

    /// Every backup file anywhere in the vault.
    pub fn all_backups(&self) -> Vec<Utf8PathBuf> {
        collect_backups(&self.root, &[])
    }

    /// Delete empty folders under the vault, deepest first.
    ///
    /// The vault root is kept. Folders that cannot be removed are left alone.
    pub fn sweep_empty_folders(&self) -> usize {
        if !self.root.is_dir() {
            return 0;
        }

        let mut removed = 0;
        for entry in WalkDir::new(self.root.as_std_path())
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            if std::fs::remove_dir(entry.path()).is_ok() {
                tracing::debug!("Removed empty backup folder {}", entry.path().display());
                removed += 1;
            }
        }
        removed
    }
}

/// Walk `root` collecting backup-named files, skipping the `excluded` folders.
pub fn collect_backups(root: &Utf8Path, excluded: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut found: Vec<Utf8PathBuf> = WalkDir::new(root.as_std_path())
        .into_iter()
        .filter_entry(|entry| !excluded.iter().any(|dir| entry.path() == dir.as_std_path()))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(is_backup_name)
                .unwrap_or(false)
        })
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .collect();
    found.sort();
    found
}
