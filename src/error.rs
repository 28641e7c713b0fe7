//! Error types for color extraction.
//!
//! None of these errors is fatal to a document pass: the extractor records
//! stream-level failures and moves on to the next stream.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting colors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Unsupported stream filter
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Decompressed output exceeded a configured limit
    #[error("Decompression limit exceeded: {reason}")]
    DecompressionLimit {
        /// Which limit was hit and by how much
        reason: String,
    },

    /// Malformed color literal (hex string or CSS name)
    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    /// Invalid extraction configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error() {
        let err = Error::Decode("bad zlib header".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Stream decoding error"));
        assert!(msg.contains("bad zlib header"));
    }

    #[test]
    fn test_unsupported_filter_error() {
        let err = Error::UnsupportedFilter("DCTDecode".to_string());
        assert_eq!(err.to_string(), "Unsupported filter: DCTDecode");
    }

    #[test]
    fn test_decompression_limit_error() {
        let err = Error::DecompressionLimit {
            reason: "ratio 500:1 exceeds 100:1".to_string(),
        };
        assert!(err.to_string().contains("500:1"));
    }

    #[test]
    fn test_config_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
