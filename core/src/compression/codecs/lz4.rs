//! codecs/lz4.rs
//! LZ4 raw block codec (no size prefix, no frame, no checksum).
use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size};

use crate::compression::types::{BlockCodec, CompressionError};

#[derive(Debug, Default, Clone, Copy)]
pub struct Lz4BlockCodec;

impl Lz4BlockCodec {
    pub fn new() -> Self {
        Self
    }

    /// Output capacity reserved for compressing `input_len` bytes: the input
    /// length plus LZ4's worst-case expansion margin.
    pub fn compress_bound(input_len: usize) -> usize {
        get_maximum_output_size(input_len)
    }
}

impl BlockCodec for Lz4BlockCodec {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress_block(&mut self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        // Empty payload stays empty on disk
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = vec![0u8; Self::compress_bound(input.len())];
        let written = compress_into(input, &mut out).map_err(|e| CompressionError::CodecProcessFailed {
            codec: "lz4",
            msg: e.to_string(),
        })?;
        if written == 0 {
            return Err(CompressionError::EmptyOutput { codec: "lz4", input_len: input.len() });
        }

        out.truncate(written);
        Ok(out)
    }

    fn decompress_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CompressionError> {
        if input.is_empty() {
            return Ok(0);
        }

        decompress_into(input, output).map_err(|e| match e {
            lz4_flex::block::DecompressError::OutputTooSmall { .. } => {
                CompressionError::OutputTooLarge { max: output.len() }
            }
            other => CompressionError::CodecProcessFailed { codec: "lz4", msg: other.to_string() },
        })
    }
}
