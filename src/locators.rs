//! Cross-checks between the search index and the bundled pages.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use nixdocs_docset::Docset;
use nixdocs_index::{Database, Repository};
use std::path::Path;

/// Locators in the index at `index_file` that don't resolve to a file in `docset`.
pub async fn check(index_file: &Path, docset: &Docset) -> Result<Vec<String>> {
    let db = Database::connect(index_file).await.or_raise(|| ErrorKind::Index)?;
    let entries = Repository::from(&db).entries().await.or_raise(|| ErrorKind::Index);
    db.close().await;
    let mut dangling = Vec::new();
    for entry in entries? {
        let exists = docset.resolve(&entry.locator).is_ok_and(|path| path.is_file());
        if !exists && !dangling.contains(&entry.locator) {
            dangling.push(entry.locator);
        }
    }
    Ok(dangling)
}
