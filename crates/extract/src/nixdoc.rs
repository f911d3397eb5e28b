//! Parser for the colorized output of `nix-doc search`.
//!
//! `nix-doc` prints, for every documented function, one or more highlighted
//! signature lines, the doc-comment body, then a `# /nix/store/...:LINE`
//! source-location comment followed by a blank separator:
//!
//! ```text
//! \x1b[38;5;15;1mconcatStrings\x1b[0m = concatStringsSep ""
//!   Concatenate a list of strings.
//! # /nix/store/…-source/lib/strings.nix:60
//!
//! ```
//!
//! [`DocStream`] turns such a line stream into [`Function`](crate::models::Kind::Function)
//! records, one per location line.

use crate::ansi::strip_ansi;
use crate::consts::{DEFAULT_STORE_ROOT, LOCATION_MARKER, NAME_MARKER};
use crate::models::DocumentationRecord;
use std::mem::take;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Collecting signature and body lines for the pending record.
    Accumulating,
    /// A record was just emitted; the next line is a separator.
    Separator,
}

/// Lazy iterator of function records parsed from `nix-doc` output lines.
///
/// A record is only emitted when its source-location line is seen; a stream
/// that ends before that drops the pending record.
///
/// ```
/// use nixdocs_extract::DocStream;
/// let output = "\x1b[38;5;15;1mid\x1b[0m = x: x\nThe identity function.\n# /nix/store/abc/lib/trivial.nix:12\n\n";
/// let records: Vec<_> = DocStream::new(output.lines(), "lib.trivial").collect();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].name, "lib.trivial.id");
/// ```
#[derive(Debug)]
pub struct DocStream<I> {
    lines: I,
    namespace: String,
    store_root: String,
    state: State,
    doc: String,
    name: Option<String>,
}
impl<I, S> DocStream<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I, namespace: impl Into<String>) -> Self {
        Self {
            lines,
            namespace: namespace.into(),
            store_root: DEFAULT_STORE_ROOT.to_string(),
            state: State::Accumulating,
            doc: String::new(),
            name: None,
        }
    }

    /// Location lines are only recognized for paths below this root.
    pub fn with_store_root(mut self, store_root: impl Into<String>) -> Self {
        self.store_root = store_root.into();
        self
    }

    /// Returns the source location if `line` is a location comment.
    fn location<'l>(&self, line: &'l str) -> Option<&'l str> {
        line.strip_prefix(LOCATION_MARKER).filter(|path| path.starts_with(self.store_root.as_str()))
    }
}
impl<I, S> Iterator for DocStream<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = DocumentationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            let line = line.as_ref();
            if self.state == State::Separator {
                self.state = State::Accumulating;
                continue;
            }
            if line.starts_with(NAME_MARKER) {
                // Signatures are prepended: with overloads or re-exports the
                // last signature seen ends up first, and names the record.
                let signature = strip_ansi(line);
                let name = signature.split('=').next().unwrap_or_default().trim();
                self.name = (!name.is_empty()).then(|| name.to_string());
                self.doc = format!("{signature} \n{}", self.doc);
                continue;
            }
            if let Some(location) = self.location(line) {
                let doc = take(&mut self.doc);
                self.state = State::Separator;
                let Some(name) = self.name.take() else {
                    tracing::trace!(location, "Source location without a preceding signature; skipping");
                    continue;
                };
                let body = format!("{doc}\nDefined at: {location}");
                return Some(DocumentationRecord::function(&self.namespace, &name, body));
            }
            self.doc.push('\n');
            self.doc.push_str(line);
        }
    }
}
