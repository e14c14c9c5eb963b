//! Stella Sora path detection and validation utilities.

use camino::{Utf8Path, Utf8PathBuf};
use sysinfo::{ProcessRefreshKind, RefreshKind, System, UpdateKind};

pub const GAME_EXE_NAME: &str = "StellaSora.exe";

/// Validates if a path points to an existing Stella Sora executable.
pub fn is_valid_game_path(path: &Utf8Path) -> bool {
    if !path.is_file() {
        return false;
    }
    path.file_name()
        .map(|name| name.eq_ignore_ascii_case(GAME_EXE_NAME))
        .unwrap_or(false)
}

/// Directory whose files mods are matched against: the folder holding the
/// executable.
pub fn game_dir_for(exe_path: &Utf8Path) -> Option<&Utf8Path> {
    exe_path.parent().filter(|dir| !dir.as_str().is_empty())
}

/// Find the executable path of a running game process.
pub fn detect_from_running_process() -> Option<Utf8PathBuf> {
    let system = System::new_with_specifics(
        RefreshKind::new().with_processes(ProcessRefreshKind::new().with_exe(UpdateKind::Always)),
    );

    system
        .processes()
        .values()
        .filter(|process| {
            process
                .name()
                .to_string_lossy()
                .eq_ignore_ascii_case(GAME_EXE_NAME)
        })
        .filter_map(|process| process.exe())
        .filter_map(|exe| Utf8PathBuf::from_path_buf(exe.to_path_buf()).ok())
        .find(|exe| is_valid_game_path(exe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_game_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let exe = root.join("StellaSora.exe");
        let other = root.join("Launcher.exe");
        std::fs::write(&exe, b"").unwrap();
        std::fs::write(&other, b"").unwrap();

        assert!(is_valid_game_path(&exe));
        assert!(!is_valid_game_path(&other));
        assert!(!is_valid_game_path(&root.join("missing").join("StellaSora.exe")));
        assert!(!is_valid_game_path(&root));
    }

    #[test]
    fn test_game_dir_for() {
        assert_eq!(
            game_dir_for(Utf8Path::new("/games/stella/StellaSora.exe")),
            Some(Utf8Path::new("/games/stella"))
        );
        assert_eq!(game_dir_for(Utf8Path::new("StellaSora.exe")), None);
    }
}
