//! Human-readable listing of documentation bodies.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use nixdocs_extract::models::DocumentationRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;
use upon::Engine;

const TEMPLATE: &str = include_str!("../templates/listing.html");

/// Which body is kept when several records share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingPolicy {
    /// The first body seen for a name is kept, mirroring the index's
    /// insert-or-ignore behaviour.
    #[default]
    FirstWins,
    /// Later bodies replace earlier ones.
    LastWins,
}

/// One body per name, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    policy: ListingPolicy,
    entries: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct Entry<'a> {
    name: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct Context<'a> {
    entries: Vec<Entry<'a>>,
}

impl Listing {
    pub fn new(policy: ListingPolicy) -> Self {
        Self { policy, entries: BTreeMap::new() }
    }

    /// Returns `true` if the listing now holds `body` for `name`.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) -> bool {
        let name = name.into();
        match self.policy {
            ListingPolicy::FirstWins if self.entries.contains_key(&name) => false,
            _ => {
                self.entries.insert(name, body.into());
                true
            },
        }
    }

    /// Records without a body are not listed.
    pub fn record(&mut self, record: &DocumentationRecord) -> bool {
        match &record.body {
            Some(body) => self.insert(record.name.as_str(), body.as_str()),
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, body)| (name.as_str(), body.as_str()))
    }

    /// Renders one `<h1 id=name>` heading and `<pre>` body per entry.
    #[instrument(skip(self), fields(entries = self.entries.len()))]
    pub fn render_html(&self) -> Result<String> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(TEMPLATE).or_raise(|| ErrorKind::Template)?;
        let context = Context {
            entries: self.iter().map(|(name, body)| Entry { name, body }).collect(),
        };
        template.render(&engine, &context).to_string().or_raise(|| ErrorKind::Template)
    }
}

mod addons {
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Escapes text for use in HTML element content and quoted attributes.
    fn html_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                for c in s.chars() {
                    match c {
                        '&' => f.write_str("&amp;")?,
                        '<' => f.write_str("&lt;")?,
                        '>' => f.write_str("&gt;")?,
                        '"' => f.write_str("&quot;")?,
                        '\'' => f.write_str("&#x27;")?,
                        c => f.write_char(c)?,
                    }
                }
            },
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("html", html_formatter);
    }
}
