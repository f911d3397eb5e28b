use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::listing::{Listing, ListingPolicy};
use exn::ResultExt;
use nixdocs_extract::models::DocumentationRecord;
use sqlx::{Sqlite, Transaction};
use tracing::instrument;

/// Row counters for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Rows written to the index.
    pub inserted: usize,
    /// Records whose `(name, type, path)` was already present.
    pub ignored: usize,
}
impl IndexStats {
    pub fn total(&self) -> usize {
        self.inserted + self.ignored
    }
}

/// Rebuilds the search index from scratch.
///
/// All work happens inside one transaction on the database's single
/// connection: nothing is visible to readers until [`finish`](Self::finish),
/// and dropping the builder early rolls the whole build back.
pub struct IndexBuilder {
    tx: Transaction<'static, Sqlite>,
    listing: Listing,
    stats: IndexStats,
}

impl IndexBuilder {
    /// Drops and recreates the `searchIndex` table.
    #[instrument(skip(db))]
    pub async fn create(db: &Database, policy: ListingPolicy) -> Result<Self> {
        let mut tx = db.pool().begin().await.or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/schema.sql"))
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(Self {
            tx,
            listing: Listing::new(policy),
            stats: IndexStats::default(),
        })
    }

    /// Returns `false` if an identical `(name, type, path)` row already exists.
    ///
    /// The record's body goes to the listing either way; the listing policy
    /// decides whether it replaces an earlier one.
    pub async fn insert(&mut self, record: &DocumentationRecord) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/insert.sql"))
            .bind(&record.name)
            .bind(record.kind.as_str())
            .bind(&record.locator)
            .execute(&mut *self.tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.listing.record(record);
        let inserted = result.rows_affected() > 0;
        if inserted {
            self.stats.inserted += 1;
        } else {
            tracing::trace!(name = %record.name, kind = %record.kind, "duplicate index entry");
            self.stats.ignored += 1;
        }
        Ok(inserted)
    }

    pub async fn extend<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = DocumentationRecord>,
    {
        for record in records {
            self.insert(&record).await?;
        }
        Ok(())
    }

    /// Commits the index and hands back the collected listing.
    #[instrument(skip(self), fields(inserted = self.stats.inserted, ignored = self.stats.ignored))]
    pub async fn finish(self) -> Result<(IndexStats, Listing)> {
        self.tx.commit().await.or_raise(|| ErrorKind::Database)?;
        tracing::info!(
            inserted = self.stats.inserted,
            ignored = self.stats.ignored,
            listed = self.listing.len(),
            "search index built"
        );
        Ok((self.stats, self.listing))
    }
}
