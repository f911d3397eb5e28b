use super::{BREADCRUMB_SEPARATOR, Kind, LibrarySection};
use crate::locator;

/// The unit of indexable knowledge: one row of the search index.
///
/// `(name, kind, locator)` identifies an entry; `body` is display-only and is
/// never part of the uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentationRecord {
    pub name: String,
    pub kind: Kind,
    /// Bundle-relative path with an optional `#fragment`, or a bare `#anchor`.
    pub locator: String,
    pub body: Option<String>,
}
impl DocumentationRecord {
    /// Names and bodies are trimmed; an empty body is stored as `None`.
    pub fn new(name: impl AsRef<str>, kind: Kind, locator: impl Into<String>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            kind,
            locator: locator.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl AsRef<str>) -> Self {
        let body = body.as_ref().trim();
        self.body = (!body.is_empty()).then(|| body.to_string());
        self
    }

    /// A library function, anchored on its own fully-qualified name.
    pub fn function(namespace: &str, name: &str, body: impl AsRef<str>) -> Self {
        let name = format!("{namespace}.{}", name.trim());
        let anchor = locator::anchor(&name);
        Self::new(name, Kind::Function, anchor).with_body(body)
    }

    /// A library namespace, carrying its description as body.
    pub fn environment(section: &LibrarySection) -> Self {
        let name = section.namespace();
        let anchor = locator::anchor(&name);
        Self::new(name, Kind::Environment, anchor).with_body(&section.description)
    }

    /// Joins hierarchy levels into a single breadcrumb name.
    pub fn breadcrumb<S: AsRef<str>>(levels: &[S]) -> String {
        levels.iter().map(|l| l.as_ref().trim()).collect::<Vec<_>>().join(BREADCRUMB_SEPARATOR)
    }

    /// The uniqueness key of the index.
    pub fn key(&self) -> (&str, Kind, &str) {
        (&self.name, self.kind, &self.locator)
    }
}
