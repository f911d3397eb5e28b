//! Read side of the search index.

use crate::Database;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use nixdocs_extract::models::Kind;
use sqlx::SqlitePool;

type Row = (String, String, String);

/// One row of `searchIndex`, minus its synthetic id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    pub name: String,
    pub kind: Kind,
    pub locator: String,
}
impl TryFrom<Row> for IndexEntry {
    type Error = crate::error::Error;
    fn try_from((name, kind, locator): Row) -> Result<Self> {
        let kind = kind.parse::<Kind>().or_raise(|| ErrorKind::InvalidData("type"))?;
        Ok(Self { name, kind, locator })
    }
}

#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn convert(rows: Vec<Row>) -> Result<Vec<IndexEntry>> {
        rows.into_iter().map(IndexEntry::try_from).collect()
    }

    /// All entries registered under `name`, ordered by type then path.
    pub async fn lookup(&self, name: &str) -> Result<Vec<IndexEntry>> {
        let rows: Vec<Row> = sqlx::query_as(include_str!("../queries/lookup.sql"))
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Self::convert(rows)
    }

    /// Every entry, ordered by name, type and path.
    pub async fn entries(&self) -> Result<Vec<IndexEntry>> {
        let rows: Vec<Row> = sqlx::query_as(include_str!("../queries/entries.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Self::convert(rows)
    }

    pub async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM searchIndex")
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("count"))
    }
}
