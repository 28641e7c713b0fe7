//! LZWDecode implementation.
//!
//! PDF LZW uses MSB-first codes starting at 9 bits, clear code 256, EOD 257,
//! and switches code size one code early (`/EarlyChange 1`). weezl's TIFF
//! size-switch mode matches that.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use weezl::{BitOrder, decode::Decoder};

/// LZWDecode filter.
pub struct LzwDecoder;

impl StreamDecoder for LzwDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = Decoder::with_tiff_size_switch(BitOrder::Msb, 8);
        let mut output = Vec::new();
        let result = decoder.into_vec(&mut output).decode_all(input);

        match result.status {
            Ok(_) => Ok(output),
            Err(e) if !output.is_empty() => {
                log::warn!(
                    "LZWDecode partial recovery: {} bytes before error: {:?}",
                    output.len(),
                    e
                );
                Ok(output)
            },
            Err(e) => Err(Error::Decode(format!("LZWDecode error: {:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "LZWDecode"
    }
}
