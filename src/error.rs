//! Error type shared by the store, the page seam and the settings logic

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Error)]
pub enum SettingsError {
    /// The preference store rejected a read or write (quota, privacy mode, ...)
    #[error("preference store error for `{key}`: {reason}")]
    Storage { key: String, reason: String },

    #[error("failed to serialize value for `{name}`: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// No input control in the document matches the setting
    #[error("no control found for setting `{name}` (value: {value:?})")]
    MissingControl { name: String, value: Option<String> },

    #[error("`{value}` is not a valid choice for setting `{name}`")]
    UnknownChoice { name: String, value: String },

    #[error("setting `{name}` expected a {expected} value")]
    TypeMismatch { name: String, expected: &'static str },

    /// A document mutation failed
    #[error("DOM error: {0}")]
    Dom(String),
}
