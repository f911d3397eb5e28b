use super::{TocEntry, TocMarker, TocSource};
use crate::consts::{ANCHOR_SELECTOR, DT_SELECTOR, TOC_SELECTOR, WHITESPACE_REGEX};
use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use scraper::{ElementRef, Html};

/// Table of contents of a manual rendered by `nixos-render-docs`:
///
/// ```html
/// <div class="toc">
///   <dl class="toc">
///     <dt><span class="part"><a href="#part-using">I. Using Nixpkgs</a></span></dt>
///     <dd>
///       <dl>
///         <dt><span class="chapter"><a href="#chap-intro">1. Overview</a></span></dt>
///       </dl>
///     </dd>
///   </dl>
/// </div>
/// ```
///
/// Direct `dt` children of the outer list are chapter markers, direct `dd`
/// children are section groups; every `dt` anywhere inside a group is an entry.
#[derive(Debug)]
pub struct RenderDocsToc {
    document: Html,
}
impl RenderDocsToc {
    pub fn from_html(html: &str) -> Self {
        Self { document: Html::parse_document(html) }
    }

    /// Visible text and first link of an element.
    fn entry(element: ElementRef<'_>) -> TocEntry {
        let text = element.text().collect::<String>();
        TocEntry {
            text: WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned(),
            href: element
                .select(&ANCHOR_SELECTOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
        }
    }

    fn marker(element: ElementRef<'_>) -> Option<TocMarker> {
        match element.value().name() {
            "dt" => Some(TocMarker::Chapter(Self::entry(element))),
            "dd" => Some(TocMarker::Group(element.select(&DT_SELECTOR).map(Self::entry).collect())),
            _ => None,
        }
    }
}
impl TocSource for RenderDocsToc {
    fn markers(&self) -> Result<Box<dyn Iterator<Item = TocMarker> + '_>> {
        let container = self
            .document
            .select(&TOC_SELECTOR)
            .next()
            .ok_or_raise(|| ErrorKind::MissingElement("table of contents"))?;
        Ok(Box::new(container.children().filter_map(ElementRef::wrap).filter_map(Self::marker)))
    }
}
