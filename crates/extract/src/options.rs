//! NixOS options reference scanning.

use crate::consts::{OPTION_TERM_SELECTOR, WHITESPACE_REGEX};
use crate::locator;
use crate::models::{DocumentationRecord, Kind};
use scraper::Html;
use scraper::html::Select;

/// Breadcrumb root of every option record.
pub const OPTIONS_TITLE: &str = "NixOS Options";

/// Lazy iterator of [`Option`](Kind::Option) records, one per option term
/// (`<a class="term" href="…">`) of a rendered options page, in document order.
///
/// Terms without an `href`, without text, or whose link can't be resolved are
/// skipped. No hierarchy is reconstructed.
pub struct OptionScanner<'a> {
    terms: Select<'a, 'static>,
    base: String,
}
impl<'a> OptionScanner<'a> {
    /// `base` is the bundle-relative path of the options page.
    pub fn new(document: &'a Html, base: impl Into<String>) -> Self {
        Self {
            terms: document.select(&OPTION_TERM_SELECTOR),
            base: base.into(),
        }
    }
}
impl Iterator for OptionScanner<'_> {
    type Item = DocumentationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for term in self.terms.by_ref() {
            let Some(href) = term.value().attr("href") else {
                continue;
            };
            let text = term.text().collect::<String>();
            let option = WHITESPACE_REGEX.replace_all(text.trim(), " ");
            if option.is_empty() {
                continue;
            }
            match locator::join(&self.base, href) {
                Ok(locator) => {
                    let name = DocumentationRecord::breadcrumb(&[OPTIONS_TITLE, &*option]);
                    return Some(DocumentationRecord::new(name, Kind::Option, locator));
                },
                Err(err) => tracing::debug!(href, error = %err, "Skipping unresolvable option link"),
            }
        }
        None
    }
}
