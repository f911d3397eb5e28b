/// A library namespace listed in `doc/doc-support/lib-function-docs.nix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    /// Section key, also the file stem under `lib/` (`strings` for `lib/strings.nix`).
    pub name: String,
    /// One-line human description.
    pub description: String,
}
impl LibrarySection {
    /// Dotted namespace the section's functions are indexed under (`lib.strings`).
    pub fn namespace(&self) -> String {
        format!("lib.{}", self.name)
    }

    /// Source file, relative to the nixpkgs root, that documents the section.
    pub fn source_file(&self) -> String {
        format!("lib/{}.nix", self.name)
    }
}
