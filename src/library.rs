//! Library function records, from `nix-doc` runs over a nixpkgs checkout.

use crate::error::{ErrorKind, Result};
use crate::nix::Nix;
use exn::ResultExt;
use nixdocs_extract::models::{DocumentationRecord, LibrarySection};
use nixdocs_extract::sections::SECTIONS_FILE;
use nixdocs_extract::{DocStream, parse_sections};
use std::path::Path;
use tracing::instrument;

/// Reads the library section list of the nixpkgs tree at `nixpkgs`.
pub async fn sections(nixpkgs: &Path) -> Result<Vec<LibrarySection>> {
    let source = tokio::fs::read_to_string(nixpkgs.join(SECTIONS_FILE)).await.or_raise(|| ErrorKind::Io)?;
    parse_sections(source.as_bytes()).or_raise(|| ErrorKind::Extract)
}

/// One `Environment` record per section, followed by its functions.
///
/// A section whose doc dump fails keeps its `Environment` record; its
/// functions are skipped with a warning.
#[instrument(skip(nix), fields(nixpkgs = %nixpkgs.display(), records))]
pub async fn records(nix: &Nix, nixpkgs: &Path) -> Result<Vec<DocumentationRecord>> {
    let store_root = nix.store_root().to_string_lossy().into_owned();
    let mut records = Vec::new();
    for section in sections(nixpkgs).await? {
        records.push(DocumentationRecord::environment(&section));
        let file = nixpkgs.join(section.source_file());
        match nix.doc_dump(&file).await {
            Ok(dump) => {
                let before = records.len();
                records.extend(DocStream::new(dump.lines(), section.namespace()).with_store_root(&store_root));
                tracing::debug!(section = %section.name, functions = records.len() - before, "library section");
            },
            Err(err) => tracing::warn!(section = %section.name, error = %err, "skipping library section"),
        }
    }
    tracing::Span::current().record("records", records.len());
    Ok(records)
}
