//! Detection of enabled mods that target the same game files.
//!
//! Mods match game files by filename, so two enabled mods with the same name
//! (in different folders) overwrite each other and the last one applied wins.
//! This is reported, never prevented.

use crate::status::{ModRecord, ModStatusStore};
use crate::utils::posix_file_name;
use std::collections::BTreeMap;

/// Enabled mods sharing one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictGroup {
    pub file_name: String,
    /// Relative paths of the mods involved, sorted.
    pub mods: Vec<String>,
}

/// Other enabled mods with the same filename as `mod_path`.
pub fn find_conflicts(store: &ModStatusStore, mod_path: &str) -> Vec<ModRecord> {
    store.find_enabled_conflicts(posix_file_name(mod_path), Some(mod_path))
}

/// Every filename claimed by two or more enabled mods.
pub fn enabled_conflict_groups(store: &ModStatusStore) -> Vec<ConflictGroup> {
    let mut by_name: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for record in store.records().iter().filter(|r| r.enabled) {
        by_name
            .entry(record.file_name())
            .or_default()
            .push(record.path.clone());
    }

    by_name
        .into_iter()
        .filter(|(_, mods)| mods.len() > 1)
        .map(|(file_name, mut mods)| {
            mods.sort();
            ConflictGroup {
                file_name: file_name.to_string(),
                mods,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::collections::BTreeSet;

    fn store_with(mods: &[(&str, bool)]) -> (tempfile::TempDir, ModStatusStore) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mods_root = root.join("Mods");
        let mut files = BTreeSet::new();
        for (path, _) in mods {
            let file = mods_root.join(path);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(&file, path.as_bytes()).unwrap();
            files.insert(path.to_string());
        }

        let mut store = ModStatusStore::open(mods_root, root.join("ModsStatus.json"));
        store.sync(&files);
        for (path, enabled) in mods {
            store.set_enabled(path, *enabled).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_find_conflicts_ignores_disabled_and_self() {
        let (_dir, store) = store_with(&[
            ("A/x.unity3d", true),
            ("B/x.unity3d", true),
            ("C/x.unity3d", false),
        ]);

        let conflicts = find_conflicts(&store, "A/x.unity3d");
        let paths: Vec<_> = conflicts.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["B/x.unity3d"]);
    }

    #[test]
    fn test_find_conflicts_for_disabled_mod() {
        let (_dir, store) = store_with(&[("A/x.unity3d", true), ("C/x.unity3d", false)]);
        assert_eq!(find_conflicts(&store, "C/x.unity3d").len(), 1);
    }

    #[test]
    fn test_enabled_conflict_groups() {
        let (_dir, store) = store_with(&[
            ("B/x.unity3d", true),
            ("A/x.unity3d", true),
            ("A/y.unity3d", true),
            ("B/y.unity3d", false),
        ]);

        let groups = enabled_conflict_groups(&store);

        assert_eq!(
            groups,
            vec![ConflictGroup {
                file_name: "x.unity3d".to_string(),
                mods: vec!["A/x.unity3d".to_string(), "B/x.unity3d".to_string()],
            }]
        );
    }
}
