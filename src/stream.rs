//! Content stream input model.
//!
//! A [`ContentStream`] is what the external document parser hands over: the
//! raw stream bytes plus the `/Filter` entries declared in the stream
//! dictionary. Filters may be empty even for compressed data, in which case
//! compression is detected from the zlib header.

use bytes::Bytes;
use std::fmt;

/// A stream filter declared in stream metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamFilter {
    /// FlateDecode (zlib/deflate)
    FlateDecode,
    /// LZWDecode
    LZWDecode,
    /// ASCIIHexDecode
    ASCIIHexDecode,
    /// Any other filter; content streams using it are not decoded.
    Other(String),
}

impl StreamFilter {
    /// Resolve a filter name, with or without the leading `/`.
    ///
    /// Accepts the abbreviated names allowed in inline image dictionaries.
    ///
    /// ```
    /// use pdf_chroma::stream::StreamFilter;
    ///
    /// assert_eq!(StreamFilter::from_name("/FlateDecode"), StreamFilter::FlateDecode);
    /// assert_eq!(StreamFilter::from_name("AHx"), StreamFilter::ASCIIHexDecode);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.trim_start_matches('/') {
            "FlateDecode" | "Fl" => StreamFilter::FlateDecode,
            "LZWDecode" | "LZW" => StreamFilter::LZWDecode,
            "ASCIIHexDecode" | "AHx" => StreamFilter::ASCIIHexDecode,
            other => StreamFilter::Other(other.to_string()),
        }
    }

    /// Canonical filter name.
    pub fn name(&self) -> &str {
        match self {
            StreamFilter::FlateDecode => "FlateDecode",
            StreamFilter::LZWDecode => "LZWDecode",
            StreamFilter::ASCIIHexDecode => "ASCIIHexDecode",
            StreamFilter::Other(name) => name,
        }
    }
}

impl fmt::Display for StreamFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw bytes of one content stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStream {
    data: Bytes,
    filters: Vec<StreamFilter>,
    page: Option<u32>,
}

impl ContentStream {
    /// Stream with no declared filters.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            filters: Vec::new(),
            page: None,
        }
    }

    /// Stream declared as `/Filter /FlateDecode`.
    pub fn compressed(data: impl Into<Bytes>) -> Self {
        Self::new(data).with_filters(vec![StreamFilter::FlateDecode])
    }

    /// Set the declared filter chain, applied in order.
    pub fn with_filters(mut self, filters: Vec<StreamFilter>) -> Self {
        self.filters = filters;
        self
    }

    /// Attach the page index this stream belongs to.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Raw stream bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Declared filters.
    pub fn filters(&self) -> &[StreamFilter] {
        &self.filters
    }

    /// Page index, if known.
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Whether the stream declares at least one filter.
    pub fn is_flagged_compressed(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Whether the first two bytes form a valid zlib header.
    pub fn looks_like_zlib(&self) -> bool {
        has_zlib_header(&self.data)
    }
}

/// Check for a zlib header (RFC 1950): CM = 8, CINFO <= 7, and the 16-bit
/// header a multiple of 31.
pub fn has_zlib_header(data: &[u8]) -> bool {
    let [cmf, flg, ..] = data else {
        return false;
    };
    let method = cmf & 0x0F;
    let window = cmf >> 4;
    method == 8 && window <= 7 && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0
}
