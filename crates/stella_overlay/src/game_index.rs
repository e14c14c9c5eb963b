//! Filename index of the game's resource tree.
//!
//! Mods replace game files by matching filename only, wherever the file lives
//! under the resource directory. Walking the whole tree once and indexing by
//! filename turns every subsequent lookup into a map access.
//!
//! The mods and backups directories are skipped when they are nested inside the
//! game tree, otherwise a mod (or a backup) would match itself.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use walkdir::WalkDir;

/// Every file under the game resource directory, keyed by exact filename.
#[derive(Debug, Default)]
pub struct GameIndex {
    by_name: HashMap<String, Vec<Utf8PathBuf>>,
    file_count: usize,
}

impl GameIndex {
    /// Walk `game_dir` and index every file, skipping any directory in `excluded`.
    ///
    /// Unreadable subdirectories and non-UTF-8 paths are skipped with a warning.
    pub fn build(game_dir: &Utf8Path, excluded: &[Utf8PathBuf]) -> Result<Self> {
        if !game_dir.is_dir() {
            return Err(Error::InvalidGameDir(game_dir.to_path_buf()));
        }

        tracing::debug!("Indexing game files under {}", game_dir);

        let mut index = Self::default();
        let walker = WalkDir::new(game_dir.as_std_path())
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry.path(), excluded));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable game path: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(path) => path,
                Err(path) => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", path.display());
                    continue;
                }
            };

            let Some(name) = path.file_name() else {
                continue;
            };

            index.by_name.entry(name.to_string()).or_default().push(path);
            index.file_count += 1;
        }

        for paths in index.by_name.values_mut() {
            paths.sort();
        }

        tracing::debug!(
            "Game index built: {} files, {} distinct names",
            index.file_count,
            index.by_name.len()
        );

        Ok(index)
    }

    /// All game files whose name equals `file_name`, sorted by path.
    pub fn find(&self, file_name: &str) -> &[Utf8PathBuf] {
        self.by_name
            .get(file_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }
}

fn is_excluded(path: &std::path::Path, excluded: &[Utf8PathBuf]) -> bool {
    excluded.iter().any(|dir| path == dir.as_std_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Utf8Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_finds_files_by_exact_name_in_any_folder() {
        let dir = tempfile::tempdir().unwrap();
        let game = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        touch(&game.join("a").join("char.unity3d"));
        touch(&game.join("b").join("c").join("char.unity3d"));
        touch(&game.join("b").join("Char.unity3d"));

        let index = GameIndex::build(&game, &[]).unwrap();

        let found = index.find("char.unity3d");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], game.join("a").join("char.unity3d"));
        assert_eq!(index.find("Char.unity3d").len(), 1);
        assert!(index.find("missing.unity3d").is_empty());
        assert_eq!(index.file_count(), 3);
    }

    #[test]
    fn test_excluded_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let game = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mods = game.join("Mods");
        touch(&game.join("data").join("char.unity3d"));
        touch(&mods.join("A").join("char.unity3d"));

        let index = GameIndex::build(&game, &[mods]).unwrap();

        assert_eq!(index.find("char.unity3d"), &[game.join("data").join("char.unity3d")]);
    }

    #[test]
    fn test_missing_game_dir() {
        let dir = tempfile::tempdir().unwrap();
        let game = Utf8PathBuf::from_path_buf(dir.path().join("nope")).unwrap();
        assert!(matches!(
            GameIndex::build(&game, &[]),
            Err(Error::InvalidGameDir(_))
        ));
    }
}
