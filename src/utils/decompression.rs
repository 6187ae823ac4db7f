//! Magic-byte detection and decompression of fetched bodies

use bytes::Bytes;

use crate::errors::SourceResult;
#[cfg(feature = "compression-gzip")]
use crate::errors::SourceError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Supported compression formats detected by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Gzip,
    Uncompressed,
}

pub struct DecompressionService;

impl DecompressionService {
    pub fn detect_compression_format(data: &[u8]) -> CompressionFormat {
        if data.len() >= 2 && data[..2] == GZIP_MAGIC {
            CompressionFormat::Gzip
        } else {
            CompressionFormat::Uncompressed
        }
    }

    /// Decompress data based on detected format; `url` is only used in errors
    pub fn decompress(data: Bytes, url: &str) -> SourceResult<Vec<u8>> {
        match Self::detect_compression_format(&data) {
            CompressionFormat::Gzip => Self::decompress_gzip(data, url),
            CompressionFormat::Uncompressed => Ok(data.to_vec()),
        }
    }

    #[cfg(feature = "compression-gzip")]
    fn decompress_gzip(data: Bytes, url: &str) -> SourceResult<Vec<u8>> {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let mut decoder = GzDecoder::new(data.as_ref());
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| SourceError::Decode {
                url: url.to_string(),
                message: format!("Failed to decompress gzip data: {e}"),
            })?;
        Ok(decompressed)
    }

    // Without gzip support the body is passed through; the parsers will find
    // nothing in it and the subscription contributes zero channels.
    #[cfg(not(feature = "compression-gzip"))]
    fn decompress_gzip(data: Bytes, url: &str) -> SourceResult<Vec<u8>> {
        tracing::warn!(url, "Received gzip body but gzip support is disabled");
        Ok(data.to_vec())
    }
}
