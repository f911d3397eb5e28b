//! Dash/Zeal docset bundles.
//!
//! An [`Assembler`] lays out one revision's bundle in a private working
//! directory:
//!
//! ```text
//! nixpkgs.docset/
//!   meta.json
//!   Contents/Info.plist
//!   Contents/Resources/docSet.dsidx
//!   Contents/Resources/Documents/index.html
//!   Contents/Resources/Documents/<tree>/...
//! ```
//!
//! and packs it into a single compressed tarball. The search index itself is
//! written by the caller to [`Docset::index`] before finishing.

mod assemble;
mod assets;
pub mod error;
mod landing;
mod layout;
mod meta;
mod resolve;
mod tree;

pub use crate::assemble::Assembler;
pub use crate::landing::LandingPage;
pub use crate::layout::{DOCSET_DIR, Docset, LISTING_FILE};
pub use crate::meta::Meta;
pub use crate::tree::PageTree;
