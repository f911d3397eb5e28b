use serde::{Deserialize, Serialize};

/// Contents of `meta.json`, read by docset feeds and browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub name: String,
    pub title: String,
    pub revision: String,
    /// RFC 3339.
    pub generated_at: String,
}
