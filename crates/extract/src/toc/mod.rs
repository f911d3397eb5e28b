//! Manual table-of-contents walking.
//!
//! The hierarchy logic ([`TocWalker`]) only sees a flat, document-ordered
//! sequence of [`TocMarker`]s; knowledge of a particular generator's markup
//! lives behind [`TocSource`]. [`RenderDocsToc`] is the adapter for manuals
//! produced by `nixos-render-docs`.

mod render_docs;

pub use self::render_docs::RenderDocsToc;
use crate::error::Result;
use crate::locator;
use crate::models::{DocumentationRecord, Kind};
use std::collections::VecDeque;

/// Chapter title in effect before the first linked chapter.
pub const FRONT_MATTER: &str = "Preface";

/// A link in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Visible text, whitespace-collapsed.
    pub text: String,
    /// Raw `href`, if the entry is linked at all.
    pub href: Option<String>,
}

/// One top-level child of a table of contents, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocMarker {
    /// A chapter heading (`<dt>`-equivalent).
    Chapter(TocEntry),
    /// The entries nested below the preceding chapter (`<dd>`-equivalent).
    Group(Vec<TocEntry>),
}

/// Capability to enumerate chapter and section-group markers of a manual.
pub trait TocSource {
    /// Fails if the document doesn't contain a table of contents at all.
    fn markers(&self) -> Result<Box<dyn Iterator<Item = TocMarker> + '_>>;
}

/// Lazy iterator of [`Section`](Kind::Section) and [`Guide`](Kind::Guide)
/// records reconstructed from a two-level table of contents.
///
/// A linked chapter becomes the current chapter and yields a `Section` named
/// `{manual} > {chapter}`; every linked entry of a following group yields a
/// `Guide` named `{manual} > {chapter} > {entry}`. Unlinked chapters are
/// structural only: they yield nothing and leave the current chapter as is.
pub struct TocWalker<'a> {
    markers: Box<dyn Iterator<Item = TocMarker> + 'a>,
    manual: String,
    base: String,
    chapter: String,
    pending: VecDeque<TocEntry>,
}
impl<'a> TocWalker<'a> {
    /// `base` is the bundle-relative path of the page holding the table of
    /// contents; links are resolved against it.
    pub fn new<S: TocSource + ?Sized>(
        source: &'a S,
        manual: impl Into<String>,
        base: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            markers: source.markers()?,
            manual: manual.into(),
            base: base.into(),
            chapter: FRONT_MATTER.to_string(),
            pending: VecDeque::new(),
        })
    }

    fn resolve(&self, entry: &TocEntry) -> Option<String> {
        let href = entry.href.as_deref()?;
        match locator::join(&self.base, href) {
            Ok(locator) => Some(locator),
            Err(err) => {
                tracing::debug!(href, error = %err, "Skipping unresolvable table of contents link");
                None
            },
        }
    }
}
impl Iterator for TocWalker<'_> {
    type Item = DocumentationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                if entry.text.is_empty() {
                    continue;
                }
                let Some(locator) = self.resolve(&entry) else {
                    continue;
                };
                let name = DocumentationRecord::breadcrumb(&[&self.manual, &self.chapter, &entry.text]);
                return Some(DocumentationRecord::new(name, Kind::Guide, locator));
            }
            match self.markers.next()? {
                TocMarker::Chapter(chapter) => {
                    if chapter.text.is_empty() {
                        continue;
                    }
                    let Some(locator) = self.resolve(&chapter) else {
                        continue;
                    };
                    self.chapter = chapter.text;
                    let name = DocumentationRecord::breadcrumb(&[&self.manual, &self.chapter]);
                    return Some(DocumentationRecord::new(name, Kind::Section, locator));
                },
                TocMarker::Group(entries) => self.pending.extend(entries),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct Fixture(Vec<TocMarker>);
    impl TocSource for Fixture {
        fn markers(&self) -> Result<Box<dyn Iterator<Item = TocMarker> + '_>> {
            Ok(Box::new(self.0.iter().cloned()))
        }
    }

    struct Broken;
    impl TocSource for Broken {
        fn markers(&self) -> Result<Box<dyn Iterator<Item = TocMarker> + '_>> {
            exn::bail!(ErrorKind::MissingElement("table of contents"))
        }
    }

    fn entry(text: &str, href: Option<&str>) -> TocEntry {
        TocEntry { text: text.to_string(), href: href.map(str::to_string) }
    }

    fn walk(markers: Vec<TocMarker>) -> Vec<DocumentationRecord> {
        let source = Fixture(markers);
        TocWalker::new(&source, "Nixpkgs Manual", "nixpkgs/manual.html").unwrap().collect()
    }

    #[test]
    fn unlinked_chapter_is_structural_only() {
        let records = walk(vec![
            TocMarker::Chapter(entry("I. Using Nixpkgs", None)),
            TocMarker::Chapter(entry("1. Overview", Some("#chap-overview"))),
            TocMarker::Group(vec![entry("1.1. Scope", Some("#sec-scope"))]),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, Kind::Section);
        assert_eq!(records[0].name, "Nixpkgs Manual > 1. Overview");
        assert_eq!(records[0].locator, "nixpkgs/manual.html#chap-overview");
        assert_eq!(records[1].kind, Kind::Guide);
        assert_eq!(records[1].name, "Nixpkgs Manual > 1. Overview > 1.1. Scope");
        assert_eq!(records[1].locator, "nixpkgs/manual.html#sec-scope");
    }

    #[test]
    fn groups_before_any_chapter_use_front_matter() {
        let records = walk(vec![TocMarker::Group(vec![entry("About", Some("#about"))])]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Nixpkgs Manual > Preface > About");
    }

    #[test]
    fn chapter_updates_are_not_retroactive() {
        let records = walk(vec![
            TocMarker::Chapter(entry("A", Some("#a"))),
            TocMarker::Group(vec![entry("a1", Some("#a1")), entry("a2", Some("#a2"))]),
            TocMarker::Chapter(entry("B", Some("#b"))),
            TocMarker::Group(vec![entry("b1", Some("#b1"))]),
        ]);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Nixpkgs Manual > A",
                "Nixpkgs Manual > A > a1",
                "Nixpkgs Manual > A > a2",
                "Nixpkgs Manual > B",
                "Nixpkgs Manual > B > b1",
            ]
        );
    }

    #[test]
    fn unlinked_or_unresolvable_entries_are_skipped() {
        let records = walk(vec![
            TocMarker::Chapter(entry("A", Some("#a"))),
            TocMarker::Group(vec![
                entry("no link", None),
                entry("external", Some("https://example.org")),
                entry("", Some("#empty-text")),
                entry("kept", Some("#kept")),
            ]),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "Nixpkgs Manual > A > kept");
    }

    #[test]
    fn untitled_chapter_keeps_previous_breadcrumb() {
        let records = walk(vec![
            TocMarker::Chapter(entry("A", Some("#a"))),
            TocMarker::Chapter(entry("", Some("#x"))),
            TocMarker::Group(vec![entry("a1", Some("#a1"))]),
        ]);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Nixpkgs Manual > A", "Nixpkgs Manual > A > a1"]);
    }

    #[test]
    fn missing_container_is_fatal() {
        assert!(TocWalker::new(&Broken, "Manual", "manual.html").is_err());
    }
}
