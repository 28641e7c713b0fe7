//! FlateDecode (zlib/deflate) implementation.
//!
//! Most content streams in the wild are Flate compressed. Decoding tries a
//! zlib stream first, then raw deflate for streams written without the zlib
//! wrapper. Output recovered before a mid-stream error is kept, since a
//! truncated stream still carries usable color operators.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

/// FlateDecode filter.
pub struct FlateDecoder;

impl StreamDecoder for FlateDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();

        let zlib_err = match ZlibDecoder::new(input).read_to_end(&mut output) {
            Ok(_) => return Ok(output),
            Err(e) if !output.is_empty() => {
                log::warn!(
                    "FlateDecode partial recovery: {} bytes before corruption: {}",
                    output.len(),
                    e
                );
                return Ok(output);
            },
            Err(e) => e,
        };

        log::debug!("Zlib decode failed ({}), trying raw deflate", zlib_err);
        output.clear();

        match DeflateDecoder::new(input).read_to_end(&mut output) {
            Ok(_) if !output.is_empty() => {
                log::info!("Raw deflate recovery succeeded: {} bytes", output.len());
                Ok(output)
            },
            Err(_) if !output.is_empty() => {
                log::warn!("Raw deflate partial recovery: {} bytes", output.len());
                Ok(output)
            },
            Ok(_) | Err(_) => Err(Error::Decode(format!(
                "FlateDecode decompression failed: {} (compressed size: {} bytes)",
                zlib_err,
                input.len()
            ))),
        }
    }

    fn name(&self) -> &str {
        "FlateDecode"
    }
}
