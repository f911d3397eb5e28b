use crate::Docset;
use crate::error::{ErrorKind, Result};
use crate::layout::LISTING_FILE;
use exn::ResultExt;
use nixdocs_extract::locator;
use std::path::PathBuf;

impl Docset {
    /// The file below `Documents/` a locator points at.
    ///
    /// Fragment-only locators (`#lib.lists.map`) point into the listing page.
    pub fn resolve(&self, locator: &str) -> Result<PathBuf> {
        let (path, _) = locator::split(locator);
        if path.is_empty() {
            return Ok(self.documents().join(LISTING_FILE));
        }
        // Normalizing against the bundle root rejects escapes and absolute URLs.
        let path = locator::join("", path).or_raise(|| ErrorKind::InvalidLocator(locator.to_string()))?;
        Ok(path.split('/').fold(self.documents(), |acc, segment| acc.join(segment)))
    }
}

#[cfg(test)]
mod tests {
    use crate::Docset;
    use crate::error::ErrorKind;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case("#lib.lists.map", "index.html")]
    #[case("nixpkgs/manual.html#chap-overview", "nixpkgs/manual.html")]
    #[case("nixos/options.html", "nixos/options.html")]
    fn test_resolve(#[case] locator: &str, #[case] expected: &str) {
        let docset = Docset::new("/build");
        let documents = Path::new("/build/nixpkgs.docset/Contents/Resources/Documents");
        assert_eq!(docset.resolve(locator).unwrap(), documents.join(expected));
    }

    #[rstest]
    #[case("../Info.plist")]
    #[case("https://nixos.org/manual#x")]
    fn test_resolve_outside_bundle(#[case] locator: &str) {
        let err = Docset::new("/build").resolve(locator).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidLocator(l) if l == locator));
    }
}
