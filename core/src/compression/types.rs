//! compression/types.rs
//! Codec trait and its error type.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    /// Codec returned zero bytes for a non-empty input.
    #[error("codec {codec} produced no output for {input_len} input bytes")]
    EmptyOutput { codec: &'static str, input_len: usize },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    /// Decompressed payload does not fit the configured bound.
    #[error("decompressed payload exceeds {max} bytes")]
    OutputTooLarge { max: usize },
}

// Require Send so the codec can move onto the compression worker thread.
pub trait BlockCodec: Send {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Compress one whole payload into a single block.
    fn compress_block(&mut self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;

    /// Decompress one block into `output`, returning the decompressed length.
    /// `output` is pre-sized by the caller to the largest acceptable payload.
    fn decompress_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CompressionError>;
}
