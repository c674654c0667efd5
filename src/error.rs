//! Error taxonomy shared by the parser, renderer glue and pipeline driver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A card already holds front, back and example text.
    #[error("too many data sections for card starting at line {card_line} (flush at line {line})")]
    TooManyFields { card_line: usize, line: usize },

    #[error("missing required argument <{0}>")]
    MissingArgument(&'static str),

    /// The renderer or merger could not be started or exited unsuccessfully.
    #[error("{tool} failed: {detail}")]
    ExternalTool { tool: String, detail: String },

    #[error("failed to {action} {}", path.display())]
    FileIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sheet size must be at least 1")]
    InvalidSheetSize,

    #[error("deck contains no complete cards; nothing to render")]
    EmptyDeck,

    #[error("failed to serialize deck: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O failure together with the path and the attempted action.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileIo {
            action,
            path: path.into(),
            source,
        }
    }
}
