use std::path::{Path, PathBuf};

/// Top-level directory of the bundle, and of the archive.
pub const DOCSET_DIR: &str = "nixpkgs.docset";
pub(crate) const META_FILE: &str = "meta.json";
pub(crate) const INDEX_FILE: &str = "docSet.dsidx";
/// The listing page, also the docset's start page.
pub const LISTING_FILE: &str = "index.html";

/// Paths inside one `nixpkgs.docset` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Docset {
    root: PathBuf,
}
impl Docset {
    /// `parent` is the directory containing `nixpkgs.docset/`.
    pub fn new(parent: impl AsRef<Path>) -> Self {
        Self { root: parent.as_ref().join(DOCSET_DIR) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contents(&self) -> PathBuf {
        self.root.join("Contents")
    }

    pub fn resources(&self) -> PathBuf {
        self.contents().join("Resources")
    }

    pub fn documents(&self) -> PathBuf {
        self.resources().join("Documents")
    }

    pub fn info_plist(&self) -> PathBuf {
        self.contents().join("Info.plist")
    }

    pub fn meta(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    /// The SQLite search index.
    pub fn index(&self) -> PathBuf {
        self.resources().join(INDEX_FILE)
    }

    pub fn listing(&self) -> PathBuf {
        self.documents().join(LISTING_FILE)
    }
}
