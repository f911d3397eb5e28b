//! Locators: where in the bundle an index entry resolves to.
//!
//! A locator is either a bare in-page anchor (`#lib.strings.concat`, resolved
//! against the listing page) or a path relative to the bundle's `Documents`
//! directory with an optional fragment (`nixos/options.html#opt-boot.loader`).

use crate::consts::URL_SCHEME_REGEX;
use crate::error::{ErrorKind, Result};

/// In-page anchor for a named entry.
pub fn anchor(name: impl AsRef<str>) -> String {
    format!("#{}", name.as_ref())
}

/// Splits a locator into its path and fragment parts.
///
/// ```
/// use nixdocs_extract::locator::split;
/// assert_eq!(split("nixos/index.html#ch-intro"), ("nixos/index.html", Some("ch-intro")));
/// assert_eq!(split("#lib.trivial.id"), ("", Some("lib.trivial.id")));
/// assert_eq!(split("nixos/index.html"), ("nixos/index.html", None));
/// ```
pub fn split(locator: &str) -> (&str, Option<&str>) {
    match locator.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (locator, None),
    }
}

/// Resolves `href`, as found inside the page at bundle-relative path `base`,
/// into a normalized bundle-relative locator.
///
/// Fragment-only links attach to `base` itself; relative links resolve against
/// the directory containing `base`. Links that leave the bundle (absolute URLs,
/// or `..` past the root) are rejected with [`ErrorKind::InvalidLocator`].
///
/// ```
/// use nixdocs_extract::locator::join;
/// assert_eq!(join("nixpkgs/manual.html", "#chap-intro").unwrap(), "nixpkgs/manual.html#chap-intro");
/// assert_eq!(join("nixos/index.html", "options.html#opt-x").unwrap(), "nixos/options.html#opt-x");
/// assert_eq!(join("nixos/index.html", "./../nixpkgs/manual.html").unwrap(), "nixpkgs/manual.html");
/// assert!(join("nixos/index.html", "https://nixos.org").is_err());
/// assert!(join("index.html", "../../etc/passwd").is_err());
/// ```
pub fn join(base: &str, href: &str) -> Result<String> {
    let href = href.trim();
    if href.is_empty() || URL_SCHEME_REGEX.is_match(href) || href.contains('\0') {
        exn::bail!(ErrorKind::InvalidLocator(href.to_string()));
    }
    let (path, fragment) = split(href);
    let combined = match path {
        "" => base.to_string(),
        p if p.starts_with('/') => p.to_string(),
        p => match base.rsplit_once('/') {
            Some((directory, _page)) => format!("{directory}/{p}"),
            None => p.to_string(),
        },
    };
    let mut segments: Vec<&str> = Vec::new();
    for segment in combined.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidLocator(href.to_string()));
                }
            },
            s => segments.push(s),
        }
    }
    let path = segments.join("/");
    match (path.is_empty(), fragment) {
        (true, None) => exn::bail!(ErrorKind::InvalidLocator(href.to_string())),
        (_, None) => Ok(path),
        (_, Some(fragment)) => Ok(format!("{path}#{fragment}")),
    }
}
