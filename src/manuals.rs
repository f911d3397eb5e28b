//! Rendered manuals shipped inside the docset.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use nixdocs_docset::{Assembler, PageTree};
use nixdocs_extract::models::DocumentationRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Where the HTML lives inside a manual build output.
pub const DOC_DIR: &str = "share/doc";

/// A manual as laid out below `share/doc/<tree>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manual {
    pub tree: &'static str,
    pub title: &'static str,
    /// The page carrying the table of contents.
    pub toc_page: &'static str,
    pub options_page: Option<&'static str>,
}

pub const NIXPKGS_MANUAL: Manual = Manual {
    tree: "nixpkgs",
    title: "Nixpkgs Manual",
    toc_page: "manual.html",
    options_page: None,
};

pub const NIXOS_MANUAL: Manual = Manual {
    tree: "nixos",
    title: "NixOS Manual",
    toc_page: "index.html",
    options_page: Some("options.html"),
};

impl Manual {
    /// The nix attribute building this manual for `system`.
    pub fn attribute(&self, system: &str) -> String {
        match self.tree {
            "nixos" => format!("htmlDocs.nixosManual.{system}"),
            _ => format!("htmlDocs.nixpkgsManual.{system}"),
        }
    }

    fn source(&self, output: &Path) -> PathBuf {
        output.join(DOC_DIR).join(self.tree)
    }

    fn read(&self, output: &Path, page: &str) -> Result<String> {
        fs::read_to_string(self.source(output).join(page)).or_raise(|| ErrorKind::Io)
    }

    /// Copies the manual into the bundle and returns its records.
    #[instrument(skip(self, assembler), fields(manual = self.title, output = %output.display(), records))]
    pub fn stage(&self, assembler: &mut Assembler, output: &Path) -> Result<Vec<DocumentationRecord>> {
        let tree = PageTree::new(self.tree, self.source(output)).or_raise(|| ErrorKind::Docset)?;
        assembler.add_tree(&tree).or_raise(|| ErrorKind::Docset)?;

        let html = self.read(output, self.toc_page)?;
        let base = format!("{}/{}", self.tree, self.toc_page);
        let mut records = nixdocs_extract::manual(&html, self.title, &base).or_raise(|| ErrorKind::Extract)?;
        if let Some(page) = self.options_page {
            let html = self.read(output, page)?;
            records.extend(nixdocs_extract::options(&html, &format!("{}/{page}", self.tree)));
        }
        tracing::Span::current().record("records", records.len());
        Ok(records)
    }
}

/// Symlinks every file of `output/share/doc` into `target`, mirroring the
/// directory structure.
pub fn mirror(output: &Path, target: &Path) -> Result<usize> {
    link_dir(&output.join(DOC_DIR), target)
}

fn link_dir(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to).or_raise(|| ErrorKind::Io)?;
    let mut files = 0;
    for entry in fs::read_dir(from).or_raise(|| ErrorKind::Io)? {
        let entry = entry.or_raise(|| ErrorKind::Io)?;
        let source = entry.path();
        let destination = to.join(entry.file_name());
        if fs::metadata(&source).or_raise(|| ErrorKind::Io)?.is_dir() {
            files += link_dir(&source, &destination)?;
        } else {
            if fs::symlink_metadata(&destination).is_ok() {
                fs::remove_file(&destination).or_raise(|| ErrorKind::Io)?;
            }
            symlink(&source, &destination)?;
            files += 1;
        }
    }
    Ok(files)
}

#[cfg(unix)]
fn symlink(source: &Path, destination: &Path) -> Result<()> {
    std::os::unix::fs::symlink(source, destination).or_raise(|| ErrorKind::Io)
}

#[cfg(not(unix))]
fn symlink(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination).map(|_| ()).or_raise(|| ErrorKind::Io)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const NIXPKGS_TOC: &str = r##"<html><body><div class="toc"><dl class="toc">
        <dt><span class="preface">Preface</span></dt>
        <dt><span class="chapter"><a href="#chap-overview">1. Overview</a></span></dt>
        <dd><dl><dt><span class="section"><a href="#sec-scope">1.1. Scope</a></span></dt></dl></dd>
    </dl></div></body></html>"##;

    pub(crate) const NIXOS_TOC: &str = r##"<html><body><div class="toc"><dl class="toc">
        <dt><span class="part"><a href="index.html#ch-installation">Installation</a></span></dt>
    </dl></div></body></html>"##;

    pub(crate) const NIXOS_OPTIONS: &str = r##"<html><body><dl class="variablelist">
        <dt><span class="term"><a id="opt-boot.kernel" class="term" href="options.html#opt-boot.kernel"><code>boot.kernel</code></a></span></dt>
        <dt><span class="term"><a class="term"><code>unlinked</code></a></span></dt>
    </dl></body></html>"##;

    /// A fake manual build output with both manuals.
    pub(crate) fn fake_output() -> tempfile::TempDir {
        let output = tempfile::tempdir().unwrap();
        let docs = output.path().join(DOC_DIR);
        fs::create_dir_all(docs.join("nixpkgs")).unwrap();
        fs::create_dir_all(docs.join("nixos")).unwrap();
        fs::write(docs.join("nixpkgs/manual.html"), NIXPKGS_TOC).unwrap();
        fs::write(docs.join("nixos/index.html"), NIXOS_TOC).unwrap();
        fs::write(docs.join("nixos/options.html"), NIXOS_OPTIONS).unwrap();
        output
    }

    #[test]
    fn test_attribute() {
        assert_eq!(NIXPKGS_MANUAL.attribute("x86_64-linux"), "htmlDocs.nixpkgsManual.x86_64-linux");
        assert_eq!(NIXOS_MANUAL.attribute("aarch64-linux"), "htmlDocs.nixosManual.aarch64-linux");
    }

    #[test]
    fn test_stage() {
        let output = fake_output();
        let mut assembler = Assembler::new("master").unwrap();
        let records = NIXPKGS_MANUAL.stage(&mut assembler, output.path()).unwrap();
        let locators: Vec<_> = records.iter().map(|r| r.locator.as_str()).collect();
        assert_eq!(locators, vec!["nixpkgs/manual.html#chap-overview", "nixpkgs/manual.html#sec-scope"]);
        assert!(assembler.docset().documents().join("nixpkgs/manual.html").is_file());

        let records = NIXOS_MANUAL.stage(&mut assembler, output.path()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["NixOS Manual > Installation", "NixOS Options > boot.kernel"]);
    }

    #[test]
    fn test_missing_manual() {
        let output = tempfile::tempdir().unwrap();
        let mut assembler = Assembler::new("master").unwrap();
        let err = NIXOS_MANUAL.stage(&mut assembler, output.path()).unwrap_err();
        assert_eq!(*err, ErrorKind::Docset);
    }

    #[cfg(unix)]
    #[test]
    fn test_mirror() {
        let output = fake_output();
        let target = tempfile::tempdir().unwrap();
        assert_eq!(mirror(output.path(), target.path()).unwrap(), 3);
        let link = target.path().join("nixos/options.html");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        // Mirroring again replaces the existing links.
        assert_eq!(mirror(output.path(), target.path()).unwrap(), 3);
    }
}
