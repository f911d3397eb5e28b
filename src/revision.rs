//! Revision names as given on the command line.

/// Alias replaced by the configured stable branch.
pub const STABLE_ALIAS: &str = "stable";

/// A nixpkgs revision to build, and the directory name it is published under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision {
    /// Passed to `nix build nixpkgs/<reference>#...`.
    pub reference: String,
    /// `reference` with `/` and `:` replaced by `-`.
    pub name: String,
}
impl Revision {
    pub fn new(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        let name = normalize(&reference);
        Self { reference, name }
    }
}

/// Makes a revision usable as a single path segment.
pub fn normalize(reference: &str) -> String {
    reference.replace(['/', ':'], "-")
}

/// Substitutes the stable alias and drops duplicates, keeping the first
/// occurrence. Two references normalizing to the same name are duplicates:
/// they would be published to the same directory.
pub fn resolve<S: AsRef<str>>(references: &[S], stable_branch: &str) -> Vec<Revision> {
    let mut revisions: Vec<Revision> = Vec::with_capacity(references.len());
    for reference in references {
        let reference = reference.as_ref().trim();
        if reference.is_empty() {
            continue;
        }
        let revision = match reference {
            STABLE_ALIAS => {
                tracing::info!(stable = stable_branch, "substituting stable branch");
                Revision::new(stable_branch)
            },
            other => Revision::new(other),
        };
        if !revisions.iter().any(|r| r.name == revision.name) {
            revisions.push(revision);
        }
    }
    revisions
}
