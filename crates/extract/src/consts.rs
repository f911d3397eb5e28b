use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Escape sequence `nix-doc` emits right before a function signature.
pub(crate) const NAME_MARKER: &str = "\x1b[38;5;15;1m";
/// Prefix of the comment line carrying the source location (`# /nix/store/...`).
pub(crate) const LOCATION_MARKER: &str = "# ";
pub(crate) const DEFAULT_STORE_ROOT: &str = "/nix/store";

// ESC, then either a 7-bit C1 Fe byte (0x40-0x5F minus `[`), or a CSI: `[` followed
// by parameter bytes, intermediate bytes and a final byte.
regex!(ANSI_ESCAPE_REGEX, r"\x1B(?:[@-Z\x5C-_]|\[[0-?]*[ -/]*[@-~])");
regex!(URL_SCHEME_REGEX, r"^[A-Za-z][A-Za-z0-9+.\-]*:");
regex!(WHITESPACE_REGEX, r"\s+");

// Table of contents as rendered by `nixos-render-docs`.
selector!(TOC_SELECTOR, "div.toc > dl.toc");
selector!(DT_SELECTOR, "dt");
selector!(ANCHOR_SELECTOR, "a[href]");
// Options reference: `<a class="term" href="options.html#opt-...">`.
selector!(OPTION_TERM_SELECTOR, "a.term");
