mod kind;
mod record;
mod section;

pub use self::kind::Kind;
pub use self::record::DocumentationRecord;
pub use self::section::LibrarySection;

/// Separator between the levels of a breadcrumb name (`Manual > Chapter > Section`).
pub const BREADCRUMB_SEPARATOR: &str = " > ";
