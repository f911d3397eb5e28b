//! Reader-side decoding.

use crate::Compression;
#[cfg(feature = "brotli")]
use crate::encoder::BROTLI_BUFFER_SIZE;
use crate::error::Result;
#[cfg(feature = "zstd")]
use crate::error::ErrorKind;
#[cfg(feature = "brotli")]
use brotli::Decompressor as BrotliDecoder;
use bzip2::read::BzDecoder;
#[cfg(feature = "zstd")]
use exn::ResultExt;
use flate2::read::GzDecoder;
use std::io::Read;
#[cfg(feature = "xz")]
use xz2::read::XzDecoder;
#[cfg(feature = "zstd")]
use zstd::stream::read::Decoder as ZstdDecoder;

impl Compression {
    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// ```
    /// use std::io::{Cursor, Read, Write};
    /// use nixdocs_compress::Compression;
    ///
    /// let mut encoder = Compression::Gzip.encoder(Vec::new()).unwrap();
    /// encoder.write_all(b"Hello, world!").unwrap();
    /// let compressed = encoder.finish().unwrap();
    /// let mut reader = Compression::Gzip.wrap_reader(Cursor::new(compressed)).unwrap();
    /// let mut decompressed = Vec::new();
    /// reader.read_to_end(&mut decompressed).unwrap();
    /// assert_eq!(decompressed, b"Hello, world!");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => Box::new(reader),
            #[cfg(feature = "brotli")]
            Compression::Brotli => Box::new(BrotliDecoder::new(reader, BROTLI_BUFFER_SIZE)),
            Compression::Bzip2 => Box::new(BzDecoder::new(reader)),
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(XzDecoder::new(reader)),
            #[cfg(feature = "zstd")]
            Compression::Zstd => Box::new(ZstdDecoder::new(reader).or_raise(|| ErrorKind::Encoder)?),
        })
    }
}
