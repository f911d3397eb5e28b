use crate::Compression;
use crate::error::{ErrorKind, Result};
#[cfg(feature = "brotli")]
use brotli::CompressorWriter as BrotliEncoder;
use bzip2::{Compression as BzCompression, write::BzEncoder};
use exn::ResultExt;
use flate2::{Compression as GzCompression, write::GzEncoder};
use std::io::{Result as IoResult, Write};
#[cfg(feature = "xz")]
use xz2::write::XzEncoder;
#[cfg(feature = "zstd")]
use zstd::stream::write::Encoder as ZstdEncoder;

// Archives are built once and downloaded many times; favour size over speed.
const BZIP2_LEVEL: BzCompression = BzCompression::best();
const GZIP_LEVEL: GzCompression = GzCompression::best();
#[cfg(feature = "xz")]
const XZ_LEVEL: u32 = 9;
#[cfg(feature = "zstd")]
const ZSTD_LEVEL: i32 = 19;
#[cfg(feature = "brotli")]
pub(crate) const BROTLI_LEVEL: u32 = 11;
#[cfg(feature = "brotli")]
pub(crate) const BROTLI_BUFFER_SIZE: usize = 4096;
#[cfg(feature = "brotli")]
pub(crate) const BROTLI_LG_WINDOW_SIZE: u32 = 22;

/// A streaming compressor over any writer.
///
/// Dropping an encoder without calling [`finish`](Self::finish) may silently
/// lose the stream trailer; always finish it.
pub enum Encoder<W: Write> {
    None(W),
    #[cfg(feature = "brotli")]
    Brotli(Box<BrotliEncoder<W>>),
    Bzip2(BzEncoder<W>),
    Gzip(GzEncoder<W>),
    #[cfg(feature = "xz")]
    Xz(XzEncoder<W>),
    #[cfg(feature = "zstd")]
    Zstd(ZstdEncoder<'static, W>),
}
impl<W: Write> Encoder<W> {
    /// Writes any trailer and returns the inner writer, flushed.
    pub fn finish(self) -> Result<W> {
        let mut inner = match self {
            Encoder::None(w) => w,
            #[cfg(feature = "brotli")]
            Encoder::Brotli(e) => {
                let mut e = *e;
                e.flush().or_raise(|| ErrorKind::Io)?;
                e.into_inner()
            },
            Encoder::Bzip2(e) => e.finish().or_raise(|| ErrorKind::Io)?,
            Encoder::Gzip(e) => e.finish().or_raise(|| ErrorKind::Io)?,
            #[cfg(feature = "xz")]
            Encoder::Xz(e) => e.finish().or_raise(|| ErrorKind::Io)?,
            #[cfg(feature = "zstd")]
            Encoder::Zstd(e) => e.finish().or_raise(|| ErrorKind::Io)?,
        };
        inner.flush().or_raise(|| ErrorKind::Io)?;
        Ok(inner)
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Encoder::None(w) => w,
            #[cfg(feature = "brotli")]
            Encoder::Brotli(e) => e.as_mut(),
            Encoder::Bzip2(e) => e,
            Encoder::Gzip(e) => e,
            #[cfg(feature = "xz")]
            Encoder::Xz(e) => e,
            #[cfg(feature = "zstd")]
            Encoder::Zstd(e) => e,
        }
    }
}
impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.writer().flush()
    }
}

impl Compression {
    /// Wrap a writer with the appropriate compression layer.
    ///
    /// ```
    /// use std::io::Write;
    /// use nixdocs_compress::Compression;
    ///
    /// let mut encoder = Compression::Gzip.encoder(Vec::new()).unwrap();
    /// encoder.write_all(b"Hello, world!").unwrap();
    /// let compressed = encoder.finish().unwrap();
    /// assert!(Compression::Gzip.check_magic_bytes(&compressed));
    /// ```
    pub fn encoder<W: Write>(&self, writer: W) -> Result<Encoder<W>> {
        Ok(match self {
            Compression::None => Encoder::None(writer),
            #[cfg(feature = "brotli")]
            Compression::Brotli => Encoder::Brotli(Box::new(BrotliEncoder::new(
                writer,
                BROTLI_BUFFER_SIZE,
                BROTLI_LEVEL,
                BROTLI_LG_WINDOW_SIZE,
            ))),
            Compression::Bzip2 => Encoder::Bzip2(BzEncoder::new(writer, BZIP2_LEVEL)),
            Compression::Gzip => Encoder::Gzip(GzEncoder::new(writer, GZIP_LEVEL)),
            #[cfg(feature = "xz")]
            Compression::Xz => Encoder::Xz(XzEncoder::new(writer, XZ_LEVEL)),
            #[cfg(feature = "zstd")]
            Compression::Zstd => Encoder::Zstd(ZstdEncoder::new(writer, ZSTD_LEVEL).or_raise(|| ErrorKind::Encoder)?),
        })
    }
}
