use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A rendered manual to ship inside the bundle, as `Documents/<name>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTree {
    name: String,
    source: PathBuf,
}
impl PageTree {
    /// `name` must be a single, plain path segment.
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0'])
            && !name.starts_with('.');
        if !valid {
            exn::bail!(ErrorKind::InvalidTreeName(name));
        }
        Ok(Self { name, source: source.into() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Copies the tree below `documents`, returning the number of files.
    ///
    /// Symlinks are followed; the store's manual outputs are often symlink farms.
    #[instrument(skip_all, fields(name = %self.name, source = %self.source.display(), files))]
    pub(crate) fn copy_into(&self, documents: &Path) -> Result<usize> {
        if !self.source.is_dir() {
            exn::bail!(ErrorKind::MissingSource(self.source.clone()));
        }
        let files = copy_dir(&self.source, &documents.join(&self.name))?;
        tracing::Span::current().record("files", files);
        Ok(files)
    }
}

fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to).or_raise(|| ErrorKind::Io)?;
    let mut files = 0;
    for entry in fs::read_dir(from).or_raise(|| ErrorKind::Io)? {
        let entry = entry.or_raise(|| ErrorKind::Io)?;
        let source = entry.path();
        let destination = to.join(entry.file_name());
        // `fs::metadata` resolves symlinks, unlike `DirEntry::metadata`.
        let metadata = fs::metadata(&source).or_raise(|| ErrorKind::Io)?;
        if metadata.is_dir() {
            files += copy_dir(&source, &destination)?;
        } else {
            fs::copy(&source, &destination).or_raise(|| ErrorKind::Io)?;
            files += 1;
        }
    }
    Ok(files)
}
