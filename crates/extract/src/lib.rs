//! Documentation record extraction.
//!
//! Three independent producers turn raw documentation sources into
//! [`DocumentationRecord`]s:
//!
//! - [`DocStream`] parses the colorized line stream printed by `nix-doc`
//!   into library [`Function`](models::Kind::Function) records.
//! - [`TocWalker`] reconstructs the chapter/section hierarchy of a rendered
//!   manual's table of contents into [`Section`](models::Kind::Section) and
//!   [`Guide`](models::Kind::Guide) records.
//! - [`OptionScanner`] lists the entries of a rendered options reference as
//!   [`Option`](models::Kind::Option) records.
//!
//! All producers are lazy iterators holding their own cursor state, so any
//! number of them can run side by side.

mod ansi;
mod consts;
pub mod error;
pub mod locator;
pub mod models;
mod nixdoc;
mod options;
pub mod sections;
pub mod toc;

use scraper::Html;
use tracing::instrument;

pub use crate::ansi::strip_ansi;
use crate::error::Result;
use crate::models::DocumentationRecord;
pub use crate::nixdoc::DocStream;
pub use crate::options::{OPTIONS_TITLE, OptionScanner};
pub use crate::sections::parse_sections;
pub use crate::toc::{RenderDocsToc, TocWalker};

/// Collects the table of contents of a `nixos-render-docs` manual page.
///
/// `base` is the bundle-relative path the page will be copied to.
#[instrument(skip(html), fields(html_size = html.len(), records))]
pub fn manual(html: &str, title: &str, base: &str) -> Result<Vec<DocumentationRecord>> {
    let toc = RenderDocsToc::from_html(html);
    let records: Vec<_> = TocWalker::new(&toc, title, base)?.collect();
    tracing::Span::current().record("records", records.len());
    Ok(records)
}

/// Collects every option of a rendered NixOS options page.
#[instrument(skip(html), fields(html_size = html.len(), records))]
pub fn options(html: &str, base: &str) -> Vec<DocumentationRecord> {
    let document = Html::parse_document(html);
    let records: Vec<_> = OptionScanner::new(&document, base).collect();
    tracing::Span::current().record("records", records.len());
    records
}
