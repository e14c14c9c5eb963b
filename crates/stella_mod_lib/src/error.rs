use camino::Utf8PathBuf;
use stella_overlay::ConflictGroup;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibError>;

#[derive(Error, Debug)]
pub enum LibError {
    #[error(transparent)]
    Overlay(#[from] stella_overlay::Error),

    #[error(transparent)]
    Core(#[from] stella_mod_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Game path not configured")]
    GameExeNotSet,

    #[error("Game not found: {0}")]
    GameExeNotFound(Utf8PathBuf),

    #[error("Game is already running! Please close it first.")]
    AlreadyRunning,

    #[error("Another instance is already using {0}")]
    InstanceLocked(Utf8PathBuf),

    #[error("Mod conflict detected: {}", describe_conflicts(.0))]
    Conflicts(Vec<ConflictGroup>),

    #[error("Launch worker panicked")]
    WorkerPanicked,
}

fn describe_conflicts(groups: &[ConflictGroup]) -> String {
    groups
        .iter()
        .map(|group| format!("{} ({})", group.file_name, group.mods.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
