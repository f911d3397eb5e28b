//! Per-revision orchestration.

use crate::error::{ErrorKind, Result};
use crate::manuals::{self, Manual, NIXOS_MANUAL, NIXPKGS_MANUAL};
use crate::nix::Nix;
use crate::revision::Revision;
use crate::{library, locators};
use exn::{OptionExt, ResultExt};
use futures::StreamExt;
use nixdocs_compress::Compression;
use nixdocs_config::{Config, ListingPolicy};
use nixdocs_docset::{Assembler, LandingPage};
use nixdocs_extract::models::DocumentationRecord;
use nixdocs_index::{Database, IndexBuilder, Listing};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Instrument, instrument};

const NIXPKGS_ATTRIBUTE: &str = "path";
const LANDING_FILE: &str = "index.html";

/// Settings shared by every revision of one run.
#[derive(Debug, Clone)]
pub struct Context {
    pub nix: Nix,
    pub output: PathBuf,
    pub system: String,
    pub compression: Compression,
    pub archive_name: String,
    pub listing_policy: ListingPolicy,
    pub jobs: usize,
}
impl Context {
    pub fn new(config: &Config, nix: Nix) -> Result<Self> {
        Ok(Self {
            nix,
            output: config.output.clone(),
            system: config.system.clone(),
            compression: config.compression().or_raise(|| ErrorKind::Config)?,
            archive_name: config.archive_name().or_raise(|| ErrorKind::Config)?,
            listing_policy: config.listing_policy,
            jobs: config.jobs,
        })
    }
}

/// Builds every revision, then writes the landing page listing the ones
/// that succeeded. Failed revisions are logged and skipped.
pub async fn build_all(context: &Context, revisions: Vec<Revision>) -> Result<()> {
    tokio::fs::create_dir_all(&context.output).await.or_raise(|| ErrorKind::Io)?;
    let results: Vec<_> = futures::stream::iter(revisions)
        .map(|revision| async move {
            let result = build_revision(context, &revision).await;
            (revision, result)
        })
        .buffer_unordered(context.jobs.max(1))
        .collect()
        .await;

    let mut landing = LandingPage::new(&context.archive_name);
    let mut failed = 0;
    for (revision, result) in results {
        match result {
            Ok(archive) => {
                tracing::info!(revision = %revision.name, archive = %archive.display(), "revision built");
                landing.push(revision.name);
            },
            Err(err) => {
                tracing::error!(revision = %revision.reference, "revision failed: {err:?}");
                failed += 1;
            },
        }
    }
    let path = context.output.join(LANDING_FILE);
    landing.write_to(&path).or_raise(|| ErrorKind::Docset)?;
    tracing::info!(path = %path.display(), "landing page written");
    if failed > 0 {
        exn::bail!(ErrorKind::Revisions(failed));
    }
    Ok(())
}

/// Builds, indexes and packages one revision into `<output>/<name>/`.
#[instrument(skip(context), fields(revision = %revision.reference))]
pub async fn build_revision(context: &Context, revision: &Revision) -> Result<PathBuf> {
    let nix = &context.nix;
    let nixpkgs = nix.build(&revision.reference, NIXPKGS_ATTRIBUTE).await?;
    let mut outputs = Vec::new();
    for manual in [NIXPKGS_MANUAL, NIXOS_MANUAL] {
        let output = nix.build(&revision.reference, &manual.attribute(&context.system)).await?;
        outputs.push((manual, output));
    }

    let assembler = Assembler::new(&revision.name)
        .or_raise(|| ErrorKind::Docset)?
        .with_compression(context.compression)
        .with_archive_name(&context.archive_name);
    let staged = outputs.clone();
    let (assembler, manual_records) = tokio::task::spawn_blocking(move || stage(assembler, &staged))
        .await
        .or_raise(|| ErrorKind::Io)??;
    let library_records = library::records(nix, &nixpkgs).await?;

    let listing = index(
        &assembler.docset().index(),
        context.listing_policy,
        library_records.into_iter().chain(manual_records),
    )
    .await?;
    assembler
        .write_listing(&listing.render_html().or_raise(|| ErrorKind::Index)?)
        .or_raise(|| ErrorKind::Docset)?;
    let dangling = locators::check(&assembler.docset().index(), assembler.docset()).await?;
    if !dangling.is_empty() {
        tracing::warn!(count = dangling.len(), first = %dangling[0], "index entries without a page in the docset");
    }

    let target = context.output.join(&revision.name);
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        publish(assembler, &outputs, &target)
    })
    .await
    .or_raise(|| ErrorKind::Io)?
}

/// Packs the docset and mirrors the manuals into a staging directory beside
/// `target`, then swaps it in. Until the swap, `target` keeps its previous
/// contents.
fn publish(assembler: Assembler, outputs: &[(Manual, PathBuf)], target: &Path) -> Result<PathBuf> {
    let parent = target.parent().ok_or_raise(|| ErrorKind::Io)?;
    fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
    let staging = tempfile::Builder::new()
        .prefix(".nixdocs-staging-")
        .tempdir_in(parent)
        .or_raise(|| ErrorKind::Io)?;
    let archive = assembler.finish(staging.path()).or_raise(|| ErrorKind::Docset)?;
    for (_, output) in outputs {
        let files = manuals::mirror(output, staging.path())?;
        tracing::debug!(output = %output.display(), files, "manual mirrored");
    }
    let archive = target.join(archive.file_name().ok_or_raise(|| ErrorKind::Io)?);

    // Dropping `retired` removes the previous build once the swap is done.
    let retired = tempfile::Builder::new()
        .prefix(".nixdocs-retired-")
        .tempdir_in(parent)
        .or_raise(|| ErrorKind::Io)?;
    let previous = retired.path().join("previous");
    let replacing = fs::symlink_metadata(target).is_ok();
    if replacing {
        fs::rename(target, &previous).or_raise(|| ErrorKind::Io)?;
    }
    if let Err(err) = fs::rename(staging.path(), target) {
        if replacing {
            fs::rename(&previous, target).or_raise(|| ErrorKind::Io)?;
        }
        return Err(err).or_raise(|| ErrorKind::Io);
    }
    Ok(archive)
}

/// Copies the manuals into the bundle and collects their records.
fn stage(mut assembler: Assembler, outputs: &[(Manual, PathBuf)]) -> Result<(Assembler, Vec<DocumentationRecord>)> {
    let mut records = Vec::new();
    for (manual, output) in outputs {
        records.extend(manual.stage(&mut assembler, output)?);
    }
    Ok((assembler, records))
}

/// Rebuilds the index file at `path` from `records`.
pub async fn index<I>(path: &Path, policy: ListingPolicy, records: I) -> Result<Listing>
where
    I: IntoIterator<Item = DocumentationRecord>,
{
    let db = Database::connect(path).await.or_raise(|| ErrorKind::Index)?;
    let mut builder = IndexBuilder::create(&db, policy).await.or_raise(|| ErrorKind::Index)?;
    builder.extend(records).await.or_raise(|| ErrorKind::Index)?;
    let (_, listing) = builder.finish().await.or_raise(|| ErrorKind::Index)?;
    db.close().await;
    Ok(listing)
}

/// The standalone indexer: library documentation only, no packaging.
pub async fn index_library(
    nix: &Nix,
    nixpkgs: &Path,
    index_file: &Path,
    listing_file: &Path,
    policy: ListingPolicy,
    revision: &str,
) -> Result<()> {
    async {
        let records = library::records(nix, nixpkgs).await?;
        let listing = index(index_file, policy, records).await?;
        let html = listing.render_html().or_raise(|| ErrorKind::Index)?;
        tokio::fs::write(listing_file, html).await.or_raise(|| ErrorKind::Io)?;
        tracing::info!(index = %index_file.display(), listing = %listing_file.display(), "library indexed");
        Ok(())
    }
    .instrument(tracing::info_span!("index", revision))
    .await
}
