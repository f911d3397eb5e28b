use crate::assets::{LANDING_PAGE, Templates};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use std::fs;
use std::path::Path;
use time::OffsetDateTime;
use time::macros::format_description;

#[derive(Serialize)]
struct Revision<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct Context<'a> {
    revisions: Vec<Revision<'a>>,
    archive: &'a str,
    generated_at: String,
}

/// The page linking every built revision's docset and manuals.
#[derive(Debug, Clone)]
pub struct LandingPage {
    revisions: Vec<String>,
    archive_name: String,
    generated_at: OffsetDateTime,
}
impl LandingPage {
    pub fn new(archive_name: impl Into<String>) -> Self {
        Self {
            revisions: Vec::new(),
            archive_name: archive_name.into(),
            generated_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_generated_at(mut self, generated_at: OffsetDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Revisions are listed sorted, each once.
    pub fn push(&mut self, revision: impl Into<String>) {
        let revision = revision.into();
        if let Err(position) = self.revisions.binary_search(&revision) {
            self.revisions.insert(position, revision);
        }
    }

    pub fn render(&self) -> Result<String> {
        let generated_at = self
            .generated_at
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .or_raise(|| ErrorKind::Template)?;
        Templates::render(LANDING_PAGE, &Context {
            revisions: self.revisions.iter().map(|name| Revision { name }).collect(),
            archive: &self.archive_name,
            generated_at,
        })
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.render()?).or_raise(|| ErrorKind::Io)
    }
}
