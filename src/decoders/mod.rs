//! Stream decoding.
//!
//! Turning a [`ContentStream`] into [`DecodedText`] is an explicit two-step
//! decision:
//!
//! 1. choose the path: declared filters, a verified undeclared zlib stream,
//!    or none;
//! 2. run exactly that path.
//!
//! An undeclared zlib stream counts as verified only when it inflates to
//! the end with a matching checksum. A stream whose declared filters fail
//! is reported to the caller, which skips it.

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::stream::{ContentStream, StreamFilter};
use flate2::{Decompress, FlushDecompress, Status};
use std::borrow::Cow;

mod ascii_hex;
mod flate;
mod lzw;

pub use ascii_hex::AsciiHexDecoder;
pub use flate::FlateDecoder;
pub use lzw::LzwDecoder;

/// Trait for stream filter decoders.
pub trait StreamDecoder {
    /// Decode the input data.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Name of the filter (e.g., "FlateDecode").
    fn name(&self) -> &str;
}

/// How a stream was turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePath {
    /// Bytes used as-is.
    Direct,
    /// Declared filters applied.
    Filtered,
    /// No filters declared but a zlib header was found.
    DetectedFlate,
}

/// Decoded content stream bytes.
///
/// The textual view maps each byte to the code point of the same value
/// (ISO-8859-1), which cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText<'a> {
    bytes: Cow<'a, [u8]>,
    path: DecodePath,
}

impl<'a> DecodedText<'a> {
    /// Wrap bytes that need no decoding.
    pub fn direct(bytes: &'a [u8]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
            path: DecodePath::Direct,
        }
    }

    /// Decoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Path taken to produce these bytes.
    pub fn path(&self) -> DecodePath {
        self.path
    }

    /// Latin-1 text view.
    pub fn to_latin1(&self) -> String {
        latin1(&self.bytes)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Map each byte to the code point of the same value.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decode a content stream according to its declared or detected compression.
///
/// Declared filters always run and their failures are errors. A zlib header
/// on a stream without filters is only a hint: the stream is decoded as
/// Flate when it inflates to a complete zlib stream, and used directly
/// otherwise, since plain content such as `800 0 0 600 0 0 cm` can carry a
/// valid header.
///
/// # Errors
///
/// Returns an error when a filter is not supported, when decompression
/// fails, or when the output exceeds the configured limits.
pub fn decode_content<'a>(
    stream: &'a ContentStream,
    config: &ExtractionConfig,
) -> Result<DecodedText<'a>> {
    if stream.is_flagged_compressed() {
        log::debug!(
            "Decoding {} byte stream via {} filter(s)",
            stream.data().len(),
            stream.filters().len()
        );
        let bytes = decode_filters(stream.data(), stream.filters(), config)?;
        return Ok(DecodedText {
            bytes: Cow::Owned(bytes),
            path: DecodePath::Filtered,
        });
    }

    if stream.looks_like_zlib() {
        if let Some(bytes) = inflate_detected(stream.data(), config)? {
            log::debug!(
                "Inflated undeclared zlib stream: {} -> {} bytes",
                stream.data().len(),
                bytes.len()
            );
            return Ok(DecodedText {
                bytes: Cow::Owned(bytes),
                path: DecodePath::DetectedFlate,
            });
        }
        log::debug!("Zlib header without a zlib stream, using bytes directly");
    }

    Ok(DecodedText::direct(stream.data()))
}

/// Inflate `data` as a complete zlib stream.
///
/// Returns `Ok(None)` when the data is not one: corrupt deflate data, a
/// bad checksum, or input ending before the final block.
fn inflate_detected(data: &[u8], config: &ExtractionConfig) -> Result<Option<Vec<u8>>> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(data.len().saturating_mul(4).max(256));

    loop {
        let (total_in, total_out) = (inflater.total_in(), inflater.total_out());
        let consumed = usize::try_from(total_in).unwrap_or(data.len()).min(data.len());
        let status = match inflater.decompress_vec(&data[consumed..], &mut output, FlushDecompress::Finish) {
            Ok(status) => status,
            Err(e) => {
                log::debug!("Not a zlib stream: {}", e);
                return Ok(None);
            },
        };

        match status {
            Status::StreamEnd => break,
            _ if output.len() == output.capacity() => {
                check_limits(data.len().max(1), output.len(), config)?;
                output.reserve(output.capacity());
            },
            _ if inflater.total_in() == total_in && inflater.total_out() == total_out => {
                return Ok(None);
            },
            _ => {},
        }
    }

    check_limits(data.len().max(1), output.len(), config)?;
    Ok(Some(output))
}

/// Apply a filter chain in order, enforcing the decompression limits in
/// `config` after each filter.
pub fn decode_filters(
    data: &[u8],
    filters: &[StreamFilter],
    config: &ExtractionConfig,
) -> Result<Vec<u8>> {
    let compressed_size = data.len().max(1);
    let mut current = data.to_vec();

    for filter in filters {
        let decoder: Box<dyn StreamDecoder> = match filter {
            StreamFilter::FlateDecode => Box::new(FlateDecoder),
            StreamFilter::LZWDecode => Box::new(LzwDecoder),
            StreamFilter::ASCIIHexDecode => Box::new(AsciiHexDecoder),
            StreamFilter::Other(name) => return Err(Error::UnsupportedFilter(name.clone())),
        };

        current = decoder.decode(&current)?;
        check_limits(compressed_size, current.len(), config)?;
    }

    Ok(current)
}

fn check_limits(compressed: usize, decompressed: usize, config: &ExtractionConfig) -> Result<()> {
    let max_ratio = u64::from(config.max_decompression_ratio);
    if max_ratio > 0 {
        let ratio = decompressed as u64 / compressed as u64;
        if ratio > max_ratio {
            return Err(Error::DecompressionLimit {
                reason: format!(
                    "ratio {}:1 exceeds {}:1 ({} -> {} bytes)",
                    ratio, max_ratio, compressed, decompressed
                ),
            });
        }
    }

    if config.max_decompressed_size > 0 && decompressed > config.max_decompressed_size {
        return Err(Error::DecompressionLimit {
            reason: format!(
                "size {} bytes exceeds {} bytes",
                decompressed, config.max_decompressed_size
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_plain_stream_is_direct() {
        let stream = ContentStream::new(&b"0 0 0 1 k"[..]);
        let text = decode_content(&stream, &ExtractionConfig::default()).unwrap();
        assert_eq!(text.path(), DecodePath::Direct);
        assert_eq!(text.as_bytes(), b"0 0 0 1 k");
    }

    #[test]
    fn test_flagged_stream_is_filtered() {
        let stream = ContentStream::compressed(zlib(b"1 1 1 rg"));
        let text = decode_content(&stream, &ExtractionConfig::default()).unwrap();
        assert_eq!(text.path(), DecodePath::Filtered);
        assert_eq!(text.as_bytes(), b"1 1 1 rg");
    }

    #[test]
    fn test_unflagged_zlib_is_detected() {
        let stream = ContentStream::new(zlib(b"0.5 g"));
        let text = decode_content(&stream, &ExtractionConfig::default()).unwrap();
        assert_eq!(text.path(), DecodePath::DetectedFlate);
        assert_eq!(text.to_latin1(), "0.5 g");
    }

    #[test]
    fn test_zlib_like_text_is_direct() {
        for text in [&b"800 0 0 600 0 0 cm 0 0 0 1 k"[..], &b"(Summary) Tj 0 g"[..], &b"x^ 1 g"[..]] {
            let stream = ContentStream::new(text);
            assert!(stream.looks_like_zlib());
            let decoded = decode_content(&stream, &ExtractionConfig::default()).unwrap();
            assert_eq!(decoded.path(), DecodePath::Direct);
            assert_eq!(decoded.as_bytes(), text);
        }
    }

    #[test]
    fn test_truncated_undeclared_zlib_is_direct() {
        let compressed = zlib(&b"0 0 1 rg ".repeat(64));
        let truncated = &compressed[..compressed.len() - 4];
        let stream = ContentStream::new(truncated.to_vec());
        let decoded = decode_content(&stream, &ExtractionConfig::default()).unwrap();
        assert_eq!(decoded.path(), DecodePath::Direct);
    }

    #[test]
    fn test_undeclared_bomb_hits_limit() {
        let stream = ContentStream::new(zlib(&vec![b' '; 1024 * 1024]));
        let result = decode_content(&stream, &ExtractionConfig::default());
        assert!(matches!(result, Err(Error::DecompressionLimit { .. })));
    }

    #[test]
    fn test_large_undeclared_stream_grows_output() {
        let content = b"0.25 0.5 0.75 rg 10 10 m 20 20 l S ".repeat(2000);
        let stream = ContentStream::new(zlib(&content));
        let decoded = decode_content(&stream, &ExtractionConfig::new().with_max_decompression_ratio(0)).unwrap();
        assert_eq!(decoded.path(), DecodePath::DetectedFlate);
        assert_eq!(decoded.as_bytes(), content.as_slice());
    }

    #[test]
    fn test_filter_chain_in_order() {
        // ASCIIHex wrapping of zlib data
        let hex: String = zlib(b"0 1 0 RG").iter().map(|b| format!("{:02X}", b)).collect();
        let stream = ContentStream::new(hex.into_bytes())
            .with_filters(vec![StreamFilter::ASCIIHexDecode, StreamFilter::FlateDecode]);
        let text = decode_content(&stream, &ExtractionConfig::default()).unwrap();
        assert_eq!(text.as_bytes(), b"0 1 0 RG");
    }

    #[test]
    fn test_unsupported_filter() {
        let stream = ContentStream::new(&b"data"[..])
            .with_filters(vec![StreamFilter::from_name("DCTDecode")]);
        let result = decode_content(&stream, &ExtractionConfig::default());
        assert!(matches!(result, Err(Error::UnsupportedFilter(name)) if name == "DCTDecode"));
    }

    #[test]
    fn test_corrupt_flagged_stream_fails() {
        let stream = ContentStream::compressed(&b"not compressed at all"[..]);
        assert!(decode_content(&stream, &ExtractionConfig::default()).is_err());
    }

    #[test]
    fn test_ratio_limit() {
        let compressed = zlib(&[b' '; 100_000]);
        let config = ExtractionConfig::new().with_max_decompression_ratio(10);
        let result = decode_filters(&compressed, &[StreamFilter::FlateDecode], &config);
        assert!(matches!(result, Err(Error::DecompressionLimit { .. })));

        let unlimited = ExtractionConfig::new().with_max_decompression_ratio(0);
        let decoded = decode_filters(&compressed, &[StreamFilter::FlateDecode], &unlimited).unwrap();
        assert_eq!(decoded.len(), 100_000);
    }

    #[test]
    fn test_size_limit() {
        let compressed = zlib(&[b'q'; 4096]);
        let config = ExtractionConfig::new()
            .with_max_decompression_ratio(0)
            .with_max_decompressed_size(1024);
        let result = decode_filters(&compressed, &[StreamFilter::FlateDecode], &config);
        assert!(matches!(result, Err(Error::DecompressionLimit { .. })));
    }

    #[test]
    fn test_latin1_maps_high_bytes() {
        assert_eq!(latin1(&[0x41, 0xE9, 0xFF]), "A\u{e9}\u{ff}");
    }
}
