use camino::Utf8PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Could not determine the install directory")]
    InstallDirUnavailable,

    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    #[error("Invalid value '{value}' for {key}: expected true or false")]
    InvalidBool { key: String, value: String },

    #[error("Failed to start {path}: {source}")]
    Spawn {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
