use camino::Utf8PathBuf;
use miette::Diagnostic;
use stella_mod_core::CoreError;
use stella_mod_lib::LibError;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Game path not configured")]
    #[diagnostic(
        code(config::game_not_set),
        help("Run 'stella-mod config set game_exe_path <path to StellaSora.exe>', or start the game and run 'stella-mod config detect'")
    )]
    GameNotConfigured,

    #[error("Game not found: {path}")]
    #[diagnostic(
        code(config::game_not_found),
        help("The configured game_exe_path no longer exists. Update it with 'stella-mod config set game_exe_path <path>'")
    )]
    GameNotFound { path: Utf8PathBuf },

    #[error("Invalid game path: {path}")]
    #[diagnostic(
        code(config::invalid_game_path),
        help("The path must point to an existing StellaSora.exe")
    )]
    InvalidGamePath { path: Utf8PathBuf },

    #[error("Unknown config key: {key}")]
    #[diagnostic(
        code(config::unknown_key),
        help("Valid keys: game_exe_path, mods_dir, backups_dir, mod_extension, restore_on_close, hide_ui_while_running")
    )]
    UnknownConfigKey { key: String },

    #[error("Invalid value '{value}' for {key}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Use true/false, yes/no, on/off or 1/0")
    )]
    InvalidConfigValue { key: String, value: String },

    #[error("Configuration file error")]
    #[diagnostic(
        code(config::io_error),
        help("Check that config.toml next to the executable is writable and valid TOML")
    )]
    ConfigFile {
        #[source]
        source: CoreError,
    },

    #[error("Mods directory not found: {path}")]
    #[diagnostic(
        code(mods::directory_missing),
        help("Create the folder or point mods_dir somewhere else with 'stella-mod config set mods_dir <path>'")
    )]
    ModsDirMissing { path: Utf8PathBuf },

    #[error("Mod not found: {name}")]
    #[diagnostic(
        code(mods::not_found),
        help("Run 'stella-mod list' to see the available mods and their paths")
    )]
    ModNotFound { name: String },

    #[error("'{name}' matches several mods: {}", candidates.join(", "))]
    #[diagnostic(
        code(mods::ambiguous),
        help("Use the path relative to the mods folder instead of the file name")
    )]
    AmbiguousMod {
        name: String,
        candidates: Vec<String>,
    },

    #[error("No game file is named like {mod_path}")]
    #[diagnostic(
        code(mods::no_game_files),
        help("Mods replace game files with the exact same file name. Check the spelling of the mod file")
    )]
    NoGameFiles { mod_path: String },

    #[error("Game is already running! Please close it first.")]
    #[diagnostic(code(game::already_running))]
    GameAlreadyRunning,

    #[error("Another stella-mod instance is running")]
    #[diagnostic(
        code(launcher::locked),
        help("Wait for the other instance to finish. The lock file is {path}")
    )]
    InstanceLocked { path: Utf8PathBuf },

    #[error("{message}")]
    #[diagnostic(
        code(mods::conflict),
        help("Disable one of the mods in each group, or pass --allow-conflicts to launch anyway")
    )]
    Conflicts { message: String },

    #[error("{failed} mod(s) failed")]
    #[diagnostic(
        code(mods::batch_failed),
        help("See the lines above for the cause of each failure")
    )]
    BatchFailed { failed: usize },

    #[error(transparent)]
    #[diagnostic(code(stella::operation_failed))]
    Library(LibError),
}

impl CliError {
    pub fn mod_not_found(name: impl Into<String>) -> Self {
        Self::ModNotFound { name: name.into() }
    }

    pub fn ambiguous_mod(name: impl Into<String>, candidates: Vec<String>) -> Self {
        Self::AmbiguousMod {
            name: name.into(),
            candidates,
        }
    }

    pub fn invalid_game_path(path: Utf8PathBuf) -> Self {
        Self::InvalidGamePath { path }
    }

    pub fn batch_failed(failed: usize) -> Self {
        Self::BatchFailed { failed }
    }
}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnknownConfigKey(key) => Self::UnknownConfigKey { key },
            CoreError::InvalidBool { key, value } => Self::InvalidConfigValue { key, value },
            e @ CoreError::Spawn { .. } => Self::Library(LibError::Core(e)),
            source => Self::ConfigFile { source },
        }
    }
}

impl From<stella_overlay::Error> for CliError {
    fn from(e: stella_overlay::Error) -> Self {
        match e {
            stella_overlay::Error::InvalidModsDir(path) => Self::ModsDirMissing { path },
            stella_overlay::Error::NoGameFiles { mod_path } => Self::NoGameFiles { mod_path },
            stella_overlay::Error::ModNotFound(path) => Self::mod_not_found(path.as_str()),
            other => Self::Library(LibError::Overlay(other)),
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::Overlay(e) => e.into(),
            LibError::Core(e) => e.into(),
            LibError::GameExeNotSet => Self::GameNotConfigured,
            LibError::GameExeNotFound(path) => Self::GameNotFound { path },
            LibError::AlreadyRunning => Self::GameAlreadyRunning,
            LibError::InstanceLocked(path) => Self::InstanceLocked { path },
            e @ LibError::Conflicts(_) => Self::Conflicts {
                message: e.to_string(),
            },
            other => Self::Library(other),
        }
    }
}
