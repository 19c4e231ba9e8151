use instafeed_core::error::ConfigError;
use instafeed_core::pagination::PaginationError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Options(#[from] ConfigError),

    #[error("Failed to read options file {path}: {source}")]
    OptionsFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Cursor storage failed: {0}")]
    Cursor(#[from] PaginationError),

    /// A page failed; the message was already reported through the hooks.
    #[error("{0}")]
    Feed(String),
}
