//! Document-level color extraction.
//!
//! [`ColorExtractor`] runs every content stream of a document through
//! decoding, matching, conversion and counting. A stream that cannot be
//! decoded is logged, recorded in the report and skipped; the pass always
//! completes.
//!
//! ```
//! use pdf_chroma::{ColorExtractor, ContentStream};
//! use pdf_chroma::color::CanonicalColor;
//!
//! let streams = vec![
//!     ContentStream::new(&b"1 1 1 rg 0 0 10 10 re f"[..]),
//!     ContentStream::new(&b"1 1 1 rg"[..]),
//! ];
//! let report = ColorExtractor::new().analyze(&streams);
//! assert_eq!(report.usage.count(CanonicalColor::WHITE), 2);
//! assert!(report.failures.is_empty());
//! ```

use crate::color::ColorSpaceKind;
use crate::config::ExtractionConfig;
use crate::content::{ColorMatcher, ColorOperation, MatchStats, PaintTarget};
use crate::decoders::decode_content;
use crate::error::Result;
use crate::stream::ContentStream;
use crate::usage::UsageTable;
use serde::Serialize;
use std::borrow::Borrow;

/// Counted operations per source color space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpaceCounts {
    /// DeviceGray operations
    pub gray: u64,
    /// DeviceRGB operations
    pub rgb: u64,
    /// DeviceCMYK operations
    pub cmyk: u64,
}

impl SpaceCounts {
    /// Count one operation in `space`.
    pub fn record(&mut self, space: ColorSpaceKind) {
        match space {
            ColorSpaceKind::Gray => self.gray += 1,
            ColorSpaceKind::Rgb => self.rgb += 1,
            ColorSpaceKind::Cmyk => self.cmyk += 1,
        }
    }

    /// Operations counted in `space`.
    pub fn get(&self, space: ColorSpaceKind) -> u64 {
        match space {
            ColorSpaceKind::Gray => self.gray,
            ColorSpaceKind::Rgb => self.rgb,
            ColorSpaceKind::Cmyk => self.cmyk,
        }
    }

    /// Sum over all spaces.
    pub fn total(&self) -> u64 {
        self.gray + self.rgb + self.cmyk
    }
}

/// A stream that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamFailure {
    /// Position of the stream in the input sequence
    pub index: usize,
    /// Page the stream belongs to, if known
    pub page: Option<u32>,
    /// Error message
    pub reason: String,
}

/// Result of one document pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorReport {
    /// Uses per canonical color
    pub usage: UsageTable,
    /// Counted operations per source color space
    pub spaces: SpaceCounts,
    /// Matcher counters summed over all decoded streams
    pub stats: MatchStats,
    /// Streams that were skipped
    pub failures: Vec<StreamFailure>,
    /// Streams seen, including failed ones
    pub streams: usize,
}

impl ColorReport {
    /// Whether every stream was decoded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consume the report, keeping only the usage table.
    pub fn into_usage(self) -> UsageTable {
        self.usage
    }

    fn count(&mut self, op: &ColorOperation) {
        self.spaces.record(op.space());
        self.usage.record(op.canonical());
    }
}

/// Color extractor for the content streams of one document.
#[derive(Debug, Clone, Default)]
pub struct ColorExtractor {
    config: ExtractionConfig,
}

impl ColorExtractor {
    /// Extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with a custom configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Analyze a document's streams into a fresh report.
    pub fn analyze<I>(&self, streams: I) -> ColorReport
    where
        I: IntoIterator,
        I::Item: Borrow<ContentStream>,
    {
        self.analyze_into(streams, UsageTable::new())
    }

    /// Analyze a document's streams, continuing from an existing table.
    ///
    /// The table is moved into the returned report.
    pub fn analyze_into<I>(&self, streams: I, usage: UsageTable) -> ColorReport
    where
        I: IntoIterator,
        I::Item: Borrow<ContentStream>,
    {
        let mut report = ColorReport {
            usage,
            ..Default::default()
        };

        for (index, stream) in streams.into_iter().enumerate() {
            let stream = stream.borrow();
            report.streams += 1;

            if let Err(e) = self.process_stream(stream, &mut report) {
                match stream.page() {
                    Some(page) => log::warn!("Skipping content stream {} (page {}): {}", index, page, e),
                    None => log::warn!("Skipping content stream {}: {}", index, e),
                }
                report.failures.push(StreamFailure {
                    index,
                    page: stream.page(),
                    reason: e.to_string(),
                });
            }
        }

        log::info!(
            "Analyzed {} stream(s): {} color use(s), {} distinct, {} skipped",
            report.streams,
            report.usage.total(),
            report.usage.distinct(),
            report.failures.len()
        );

        report
    }

    /// Decode one stream and count its colors into `report`.
    ///
    /// On error nothing is counted.
    ///
    /// # Errors
    ///
    /// Returns the decoding error for streams that cannot be decoded.
    pub fn process_stream(&self, stream: &ContentStream, report: &mut ColorReport) -> Result<()> {
        let text = decode_content(stream, &self.config)?;
        let matcher = ColorMatcher::from_text(&text).with_policy(self.config.unsupported_policy);

        let mut operations = matcher.operations();
        for op in operations.by_ref() {
            if self.counts(op.target) {
                report.count(&op);
            }
        }

        let stats = operations.stats();
        if stats.malformed > 0 || stats.unsupported > 0 {
            log::debug!(
                "Stream via {:?}: {} malformed, {} unsupported color operation(s)",
                text.path(),
                stats.malformed,
                stats.unsupported
            );
        }
        report.stats.absorb(stats);
        Ok(())
    }

    fn counts(&self, target: PaintTarget) -> bool {
        match target {
            PaintTarget::Fill => self.config.count_fill,
            PaintTarget::Stroke => self.config.count_stroke,
        }
    }
}
