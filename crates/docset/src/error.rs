//! Docset Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A docset error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for docset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A page tree to bundle does not exist.
    #[display("page tree source missing: {}", _0.display())]
    MissingSource(#[error(not(source))] PathBuf),
    /// Page tree names become directories below `Documents/`.
    #[display("invalid page tree name: {_0:?}")]
    InvalidTreeName(#[error(not(source))] String),
    /// A locator that does not point inside the bundle.
    #[display("invalid locator: {_0:?}")]
    InvalidLocator(#[error(not(source))] String),
    AssetNotFound(#[error(not(source))] String),
    #[display("template error")]
    Template,
    #[display("serialization error")]
    Serialization,
    #[display("compression error")]
    Compression,
    /// The written archive does not read back as a complete docset.
    #[display("incomplete archive: {} missing", _0.display())]
    IncompleteArchive(#[error(not(source))] PathBuf),
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
