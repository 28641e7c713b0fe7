// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::enum_variant_names)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::while_let_on_iterator)]

//! # PDF Chroma
//!
//! Color usage statistics from PDF content streams.
//!
//! Content streams handed over by a document parser are decoded (Flate, LZW
//! and ASCIIHex, declared or detected), scanned for color-setting operators
//! and every matched value is converted to a canonical RGB triple before it
//! is counted.
//!
//! ## Pipeline
//!
//! - **Stream decoding** ([`decoders`]): explicit choice between declared
//!   filters, a detected zlib header and the raw bytes
//! - **Lexing** ([`lexer`]): content stream tokens per ISO 32000-1:2008 §7.2
//! - **Matching** ([`content`]): `g`/`G`, `rg`/`RG`, `k`/`K` and
//!   `cs`/`sc`/`scn` in device color spaces
//! - **Conversion** ([`color`]): DeviceGray, DeviceRGB and DeviceCMYK to RGB
//! - **Aggregation** ([`usage`]): per-color counts, shares and CSS3 names
//!
//! Streams that fail to decode are skipped and listed in the report; no
//! stream can abort a document pass.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_chroma::{ColorExtractor, ContentStream};
//! use pdf_chroma::color::CanonicalColor;
//!
//! let streams = vec![
//!     ContentStream::new(&b"0 0 0 1 k BT (Hello) Tj ET"[..]).with_page(0),
//!     ContentStream::new(&b"1 0 0 RG 0 0 m 100 0 l S"[..]).with_page(1),
//! ];
//!
//! let report = ColorExtractor::new().analyze(&streams);
//! assert_eq!(report.usage.count(CanonicalColor::BLACK), 1);
//!
//! for row in report.usage.ranked() {
//!     println!("{} {:>4} {:5.1}% {}", row.color, row.count, row.share * 100.0, row.name);
//! }
//! ```
//!
//! The library logs through the [`log`] facade and installs no logger.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Input model and decoding
pub mod decoders;
pub mod stream;

// Content stream parsing
pub mod content;
pub mod lexer;

// Colors and aggregation
pub mod color;
pub mod usage;

// Document pass
pub mod extractor;

// Re-exports
pub use color::{CanonicalColor, ColorSpaceKind, ColorValue};
pub use config::{ExtractionConfig, UnsupportedColorPolicy};
pub use content::{ColorMatcher, ColorOperation, MatchStats, PaintTarget};
pub use decoders::{DecodePath, DecodedText, decode_content};
pub use error::{Error, Result};
pub use extractor::{ColorExtractor, ColorReport, SpaceCounts, StreamFailure};
pub use stream::{ContentStream, StreamFilter};
pub use usage::{ColorUsage, UsageTable};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
