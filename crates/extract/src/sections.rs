//! Library section list parsing.
//!
//! nixpkgs enumerates the documented library namespaces in
//! `doc/doc-support/lib-function-docs.nix`, one per line:
//!
//! ```text
//! docgen strings 'String manipulation functions'
//! docgen lists 'List manipulation functions'
//! ```

use crate::error::{ErrorKind, Result};
use crate::models::LibrarySection;
use exn::ResultExt;
use std::io::BufRead;

/// Location of the section list, relative to the nixpkgs root.
pub const SECTIONS_FILE: &str = "doc/doc-support/lib-function-docs.nix";

const DIRECTIVE: &str = "docgen";

/// Parses one line; anything that isn't a `docgen <name> <description…>`
/// directive is ignored.
fn parse_line(line: &str) -> Option<LibrarySection> {
    let mut words = line.trim().split(' ');
    if words.next()? != DIRECTIVE {
        return None;
    }
    let name = words.next().map(str::trim).filter(|n| !n.is_empty())?;
    let description = words.collect::<Vec<_>>().join(" ");
    Some(LibrarySection {
        name: name.to_string(),
        description: description.trim_matches('\'').to_string(),
    })
}

/// Parses every section directive in `source`, in order.
pub fn parse_sections(source: impl BufRead) -> Result<Vec<LibrarySection>> {
    let mut sections = Vec::new();
    for line in source.lines() {
        let line = line.or_raise(|| ErrorKind::Io)?;
        if let Some(section) = parse_line(&line) {
            sections.push(section);
        }
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("docgen strings 'String manipulation functions'", "strings", "String manipulation functions")]
    #[case("  docgen lists 'List manipulation functions'  ", "lists", "List manipulation functions")]
    #[case("docgen trivial", "trivial", "")]
    #[case("docgen asserts 'assertion functions'", "asserts", "assertion functions")]
    fn parses_directives(#[case] line: &str, #[case] name: &str, #[case] description: &str) {
        let section = parse_line(line).unwrap();
        assert_eq!(section.name, name);
        assert_eq!(section.description, description);
    }

    #[rstest]
    #[case("")]
    #[case("docgen")]
    #[case("{ pkgs, nixpkgs ? { }, libsets ? [ ] }:")]
    #[case("# docgen strings 'commented out'")]
    #[case("docgenerator strings 'not the directive'")]
    fn ignores_other_lines(#[case] line: &str) {
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn parses_whole_file_in_order() {
        let source = "with pkgs; stdenv.mkDerivation {\n  docgen strings 'String manipulation functions'\n  docgen lists 'List manipulation functions'\n}\n";
        let sections = parse_sections(source.as_bytes()).unwrap();
        let names: Vec<_> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["strings", "lists"]);
        assert_eq!(sections[0].namespace(), "lib.strings");
        assert_eq!(sections[1].source_file(), "lib/lists.nix");
    }
}
