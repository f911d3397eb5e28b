//! Compression formats for docset archives.
//!
//! This crate wraps several compression libraries behind a unified
//! [`Compression`] enum, providing:
//!
//! - **Format selection** by name ([`Compression::from_str`](std::str::FromStr))
//!   and signature checks ([`Compression::check_magic_bytes`])
//! - **Streaming** via [`Compression::encoder`], whose [`Encoder::finish`]
//!   surfaces trailer write failures instead of swallowing them on drop, and
//!   [`Compression::wrap_reader`]
//!
//! Bzip2 and Gzip are always available. Optional formats (Brotli, XZ, Zstd)
//! are behind feature flags.

mod construct;
mod encoder;
pub mod error;
mod ops;
mod util;

pub use crate::encoder::Encoder;

/// A supported compression format.
///
/// Variants gated behind feature flags (`brotli`, `xz`, `zstd`) are only
/// available when the corresponding feature is enabled. Defaults to
/// [`None`](Self::None) (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Brotli compression (.br)
    #[cfg(feature = "brotli")]
    Brotli,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// Gzip compression (.gz)
    Gzip,
    /// XZ/LZMA compression (.xz)
    #[cfg(feature = "xz")]
    Xz,
    /// Zstd compression (.zst)
    #[cfg(feature = "zstd")]
    Zstd,
}

#[cfg(test)]
mod tests {
    use crate::Compression;

    #[test]
    fn compression_default() {
        assert_eq!(Compression::default(), Compression::None);
    }
}
