//! Driver Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A driver error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    /// The `nix` executable could not be found.
    #[display("nix executable not found: {_0}")]
    NixNotFound(#[error(not(source))] String),
    /// A `nix` invocation exited unsuccessfully.
    #[display("`nix {command}` failed with status {status}")]
    NixFailed {
        #[error(not(source))]
        command: String,
        #[error(not(source))]
        status: String,
    },
    /// A build output is not a store path.
    #[display("build output outside of the nix store: {}", _0.display())]
    OutsideStore(#[error(not(source))] PathBuf),
    #[display("documentation extraction failed")]
    Extract,
    #[display("search index error")]
    Index,
    #[display("docset assembly failed")]
    Docset,
    /// One or more revisions could not be built.
    #[display("{_0} revision(s) failed")]
    Revisions(#[error(not(source))] usize),
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::NixFailed { .. } | ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        let kind = ErrorKind::NixFailed {
            command: "build nixpkgs/master#path".to_string(),
            status: "exit status: 1".to_string(),
        };
        assert_eq!(kind.to_string(), "`nix build nixpkgs/master#path` failed with status exit status: 1");
        assert!(kind.is_retryable());
        assert_eq!(ErrorKind::Revisions(2).to_string(), "2 revision(s) failed");
    }
}
