use crate::Compression;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Compression {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl Compression {
    /// Returns the file extension for this compression format.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Compression::None => "",
            #[cfg(feature = "brotli")]
            Compression::Brotli => ".br",
            Compression::Bzip2 => ".bz2",
            Compression::Gzip => ".gz",
            #[cfg(feature = "xz")]
            Compression::Xz => ".xz",
            #[cfg(feature = "zstd")]
            Compression::Zstd => ".zst",
        }
    }

    /// Short name accepted by [`FromStr`](std::str::FromStr).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            #[cfg(feature = "brotli")]
            Compression::Brotli => "brotli",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
            #[cfg(feature = "xz")]
            Compression::Xz => "xz",
            #[cfg(feature = "zstd")]
            Compression::Zstd => "zstd",
        }
    }

    /// Suffix for a tarball compressed with this format, e.g. `.tar.gz`.
    #[must_use]
    pub fn archive_extension(&self) -> String {
        format!(".tar{}", self.extension())
    }

    /// Leading bytes of a stream in this format, if it has any.
    fn magic(&self) -> Option<&'static [u8]> {
        match self {
            // Brotli streams and plain tarballs carry no leading signature.
            Compression::None => None,
            #[cfg(feature = "brotli")]
            Compression::Brotli => None,
            Compression::Bzip2 => Some(b"BZh".as_slice()),
            Compression::Gzip => Some(&[0x1F, 0x8B][..]),
            #[cfg(feature = "xz")]
            Compression::Xz => Some(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00][..]),
            #[cfg(feature = "zstd")]
            Compression::Zstd => Some(&[0x28, 0xB5, 0x2F, 0xFD][..]),
        }
    }

    /// Whether `bytes` look like the start of a stream in this format.
    /// Always `true` for formats without a signature.
    #[must_use]
    pub fn check_magic_bytes(&self, bytes: &[u8]) -> bool {
        self.magic().is_none_or(|magic| bytes.starts_with(magic))
    }
}
