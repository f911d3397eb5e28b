use crate::assets::{INFO_PLIST, Templates};
use crate::error::{ErrorKind, Result};
use crate::layout::{DOCSET_DIR, LISTING_FILE};
use crate::{Docset, Meta, PageTree};
use exn::{OptionExt, ResultExt};
use nixdocs_compress::Compression;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::instrument;

const DOCSET_NAME: &str = "nixpkgs";
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;

#[derive(Serialize)]
struct PlistContext<'a> {
    revision: &'a str,
    title: &'a str,
    index: &'a str,
}

/// Lays out one revision's docset in a private working directory and
/// packs it into a single archive.
///
/// The working directory is removed when the assembler is dropped, whether
/// or not [`finish`](Self::finish) succeeded.
pub struct Assembler {
    revision: String,
    compression: Compression,
    archive_name: Option<String>,
    generated_at: OffsetDateTime,
    docset: Docset,
    trees: Vec<String>,
    _workdir: TempDir,
}

impl Assembler {
    pub fn new(revision: impl Into<String>) -> Result<Self> {
        let workdir = tempfile::Builder::new().prefix("nixdocs-").tempdir().or_raise(|| ErrorKind::Io)?;
        let docset = Docset::new(workdir.path());
        fs::create_dir_all(docset.documents()).or_raise(|| ErrorKind::Io)?;
        Ok(Self {
            revision: revision.into(),
            compression: Compression::Gzip,
            archive_name: None,
            generated_at: OffsetDateTime::now_utc(),
            docset,
            trees: Vec::new(),
            _workdir: workdir,
        })
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Overrides the default `nixpkgs.docset.tar.<ext>` archive name.
    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = Some(name.into());
        self
    }

    pub fn with_generated_at(mut self, generated_at: OffsetDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// The bundle being assembled; write the search index to [`Docset::index`].
    pub fn docset(&self) -> &Docset {
        &self.docset
    }

    pub fn archive_name(&self) -> String {
        match &self.archive_name {
            Some(name) => name.clone(),
            None => format!("{DOCSET_DIR}{}", self.compression.archive_extension()),
        }
    }

    /// Copies a page tree into `Documents/<name>/`.
    pub fn add_tree(&mut self, tree: &PageTree) -> Result<usize> {
        if self.trees.iter().any(|t| t == tree.name()) || tree.name() == LISTING_FILE {
            exn::bail!(ErrorKind::InvalidTreeName(tree.name().to_string()));
        }
        let files = tree.copy_into(&self.docset.documents())?;
        self.trees.push(tree.name().to_string());
        Ok(files)
    }

    /// Writes the rendered listing as the docset's start page.
    pub fn write_listing(&self, html: &str) -> Result<()> {
        fs::write(self.docset.listing(), html).or_raise(|| ErrorKind::Io)
    }

    fn title(&self) -> String {
        format!("{DOCSET_NAME} ({})", self.revision)
    }

    fn write_descriptors(&self) -> Result<()> {
        let title = self.title();
        let plist = Templates::render(INFO_PLIST, &PlistContext {
            revision: &self.revision,
            title: &title,
            index: LISTING_FILE,
        })?;
        fs::write(self.docset.info_plist(), plist).or_raise(|| ErrorKind::Io)?;
        let meta = Meta {
            name: DOCSET_NAME.to_string(),
            title,
            revision: self.revision.clone(),
            generated_at: self.generated_at.format(&Rfc3339).or_raise(|| ErrorKind::Serialization)?,
        };
        let json = serde_json::to_vec_pretty(&meta).or_raise(|| ErrorKind::Serialization)?;
        fs::write(self.docset.meta(), json).or_raise(|| ErrorKind::Io)
    }

    /// Writes the descriptors and packs the bundle into `output_dir`.
    ///
    /// The archive is written to a temporary sibling, read back, and renamed
    /// into place world-readable, so the output directory never holds a
    /// partial archive.
    #[instrument(skip(self), fields(revision = %self.revision, compression = %self.compression))]
    pub fn finish(self, output_dir: &Path) -> Result<PathBuf> {
        for required in [self.docset.index(), self.docset.listing()] {
            if !required.is_file() {
                exn::bail!(ErrorKind::MissingSource(required));
            }
        }
        self.write_descriptors()?;
        fs::create_dir_all(output_dir).or_raise(|| ErrorKind::Io)?;
        let destination = output_dir.join(self.archive_name());
        let parent = destination.parent().ok_or_raise(|| ErrorKind::Io)?;
        let mut tmp = NamedTempFile::new_in(parent).or_raise(|| ErrorKind::Io)?;
        {
            let encoder = self
                .compression
                .encoder(BufWriter::new(&mut tmp))
                .or_raise(|| ErrorKind::Compression)?;
            let mut builder = tar::Builder::new(encoder);
            builder.follow_symlinks(true);
            builder.append_dir_all(DOCSET_DIR, self.docset.root()).or_raise(|| ErrorKind::Io)?;
            let encoder = builder.into_inner().or_raise(|| ErrorKind::Io)?;
            encoder.finish().or_raise(|| ErrorKind::Compression)?;
        }
        let index = self.docset.index();
        let index = Path::new(DOCSET_DIR).join(index.strip_prefix(self.docset.root()).or_raise(|| ErrorKind::Io)?);
        let entries = verify_archive(self.compression, tmp.as_file_mut(), &index)?;
        tmp.as_file().sync_all().or_raise(|| ErrorKind::Io)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file().set_permissions(fs::Permissions::from_mode(ARCHIVE_MODE)).or_raise(|| ErrorKind::Io)?;
        }
        tmp.persist(&destination).or_raise(|| ErrorKind::Io)?;
        tracing::info!(archive = %destination.display(), trees = self.trees.len(), entries, "docset archived");
        Ok(destination)
    }
}

/// Reads a freshly written archive back from the start: the stream must carry
/// the signature of `compression` and the tarball must contain `index`.
fn verify_archive(compression: Compression, file: &mut File, index: &Path) -> Result<usize> {
    let mut head = Vec::with_capacity(8);
    file.seek(SeekFrom::Start(0)).or_raise(|| ErrorKind::Io)?;
    (&mut *file).take(8).read_to_end(&mut head).or_raise(|| ErrorKind::Io)?;
    if !compression.check_magic_bytes(&head) {
        exn::bail!(ErrorKind::Compression);
    }
    file.seek(SeekFrom::Start(0)).or_raise(|| ErrorKind::Io)?;
    let reader = compression.wrap_reader(BufReader::new(&mut *file)).or_raise(|| ErrorKind::Compression)?;
    let mut archive = tar::Archive::new(reader);
    let (mut entries, mut found) = (0, false);
    for entry in archive.entries().or_raise(|| ErrorKind::Compression)? {
        let entry = entry.or_raise(|| ErrorKind::Compression)?;
        let path = entry.path().or_raise(|| ErrorKind::Compression)?;
        found |= *path == *index;
        entries += 1;
    }
    if !found {
        exn::bail!(ErrorKind::IncompleteArchive(index.to_path_buf()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Read;
    use time::macros::datetime;

    fn manual() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("manual.html"), "<html>manual</html>").unwrap();
        dir
    }

    fn ready(revision: &str) -> (Assembler, TempDir) {
        let source = manual();
        let mut assembler = Assembler::new(revision).unwrap().with_generated_at(datetime!(2025-06-01 12:00 UTC));
        assembler.add_tree(&PageTree::new("nixpkgs", source.path()).unwrap()).unwrap();
        fs::write(assembler.docset().index(), b"SQLite format 3\0").unwrap();
        assembler.write_listing("<h1 id=\"lib.id\">lib.id</h1><pre>x</pre>\n").unwrap();
        (assembler, source)
    }

    fn entries(archive: &Path, compression: Compression) -> BTreeSet<String> {
        let file = fs::File::open(archive).unwrap();
        let mut archive = tar::Archive::new(compression.wrap_reader(file).unwrap());
        archive
            .entries()
            .unwrap()
            .map(|entry| entry.unwrap().path().unwrap().to_string_lossy().trim_end_matches('/').to_string())
            .collect()
    }

    #[test]
    fn test_default_archive_name() {
        let assembler = Assembler::new("master").unwrap();
        assert_eq!(assembler.archive_name(), "nixpkgs.docset.tar.gz");
        let assembler = assembler.with_archive_name("nixpkgs.docset.tgz");
        assert_eq!(assembler.archive_name(), "nixpkgs.docset.tgz");
    }

    #[test]
    fn test_archive_layout() {
        let (assembler, _source) = ready("nixos-25.05");
        let output = tempfile::tempdir().unwrap();
        let archive = assembler.finish(output.path()).unwrap();
        assert_eq!(archive, output.path().join("nixpkgs.docset.tar.gz"));

        let entries = entries(&archive, Compression::Gzip);
        for expected in [
            "nixpkgs.docset/meta.json",
            "nixpkgs.docset/Contents/Info.plist",
            "nixpkgs.docset/Contents/Resources/docSet.dsidx",
            "nixpkgs.docset/Contents/Resources/Documents/index.html",
            "nixpkgs.docset/Contents/Resources/Documents/nixpkgs/manual.html",
        ] {
            assert!(entries.contains(expected), "missing {expected} in {entries:?}");
        }
        assert!(entries.iter().all(|e| e.starts_with("nixpkgs.docset")));
        // Only the archive is left behind.
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_descriptors() {
        let (assembler, _source) = ready("nixos-25.05");
        let output = tempfile::tempdir().unwrap();
        let archive = assembler.with_compression(Compression::None).finish(output.path()).unwrap();
        assert_eq!(archive.file_name().unwrap(), "nixpkgs.docset.tar");

        let mut archive = tar::Archive::new(fs::File::open(archive).unwrap());
        let mut found = 0;
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().to_string_lossy().to_string();
            let mut contents = String::new();
            if path == "nixpkgs.docset/meta.json" {
                entry.read_to_string(&mut contents).unwrap();
                let meta: Meta = serde_json::from_str(&contents).unwrap();
                assert_eq!(meta.revision, "nixos-25.05");
                assert_eq!(meta.title, "nixpkgs (nixos-25.05)");
                assert_eq!(meta.generated_at, "2025-06-01T12:00:00Z");
                found += 1;
            } else if path == "nixpkgs.docset/Contents/Info.plist" {
                entry.read_to_string(&mut contents).unwrap();
                assert!(contents.contains("<string>nixpkgs-nixos-25.05</string>"));
                assert!(contents.contains("<string>index.html</string>"));
                found += 1;
            }
        }
        assert_eq!(found, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let (assembler, _source) = ready("master");
        let output = tempfile::tempdir().unwrap();
        let archive = assembler.finish(output.path()).unwrap();
        let mode = fs::metadata(archive).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_verify_rejects_wrong_signature() {
        let mut file = tempfile::tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"not a gzip stream").unwrap();
        let err = verify_archive(Compression::Gzip, &mut file, Path::new("nixpkgs.docset")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Compression));
    }

    #[test]
    fn test_verify_requires_index() {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(4);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, "nixpkgs.docset/meta.json", &b"{}\n\n"[..]).unwrap();
        let bytes = builder.into_inner().unwrap();

        let mut file = tempfile::tempfile().unwrap();
        std::io::Write::write_all(&mut file, &bytes).unwrap();
        let index = Path::new("nixpkgs.docset/Contents/Resources/docSet.dsidx");
        let err = verify_archive(Compression::None, &mut file, index).unwrap_err();
        assert!(matches!(&*err, ErrorKind::IncompleteArchive(p) if p == index));
    }

    #[test]
    fn test_missing_index_publishes_nothing() {
        let assembler = Assembler::new("master").unwrap();
        assembler.write_listing("").unwrap();
        let output = tempfile::tempdir().unwrap();
        let err = assembler.finish(output.path()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingSource(p) if p.ends_with("docSet.dsidx")));
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_duplicate_tree_name() {
        let (mut assembler, source) = ready("master");
        let err = assembler.add_tree(&PageTree::new("nixpkgs", source.path()).unwrap()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidTreeName(_)));
    }

    #[test]
    fn test_resolved_locators_exist() {
        let (assembler, _source) = ready("master");
        let docset = assembler.docset();
        assert!(docset.resolve("#lib.id").unwrap().is_file());
        assert!(docset.resolve("nixpkgs/manual.html#chap-intro").unwrap().is_file());
    }
}
