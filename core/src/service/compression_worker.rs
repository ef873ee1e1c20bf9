//! service/compression_worker.rs
//! Codec stage on the dedicated compression thread.
//!
//! - read direction: decompress the bytes fetched by the I/O worker, then
//!   complete (never hands off further)
//! - write direction: compress the caller's bytes, then hand the item to the
//!   I/O queue so the compressed block is what reaches disk
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::compression::{BlockCodec, CompressionError};
use crate::constants::NULL_TERMINATOR;
use crate::service::pipeline::{after_stage, PipelineStage};
use crate::service::queue::{QueueConsumer, QueueMessage, QueueProducer};
use crate::service::work::{Operation, WorkItem};
use crate::telemetry::{Stage, Telemetry};
use crate::types::FsError;

pub(crate) struct CompressionWorker {
    pub(crate) queue: QueueConsumer<Box<WorkItem>>,
    /// Compressed writes continue here.
    pub(crate) io: QueueProducer<Box<WorkItem>>,
    pub(crate) codec: Box<dyn BlockCodec>,
    pub(crate) max_decompressed_size: usize,
    pub(crate) telemetry: Arc<Telemetry>,
}

impl CompressionWorker {
    pub(crate) fn run(mut self) {
        debug!(codec = self.codec.name(), "compression worker started");
        while let QueueMessage::Payload(mut item) = self.queue.pop() {
            item.begin();
            let start = Instant::now();

            let (stage, outcome) = match item.op {
                Operation::Read => (Stage::Decompress, self.decompress(&mut item)),
                Operation::Write => (Stage::Compress, self.compress(&mut item)),
            };
            self.telemetry.add_stage_time(stage, start.elapsed());

            let stage_ok = outcome.is_ok();
            if let Err(e) = outcome {
                self.telemetry.update(|c| c.add_failure());
                item.fail(e);
            }

            let transition = after_stage(item.op, item.flags, PipelineStage::Compression, stage_ok);
            item.route(transition, &self.io, &self.telemetry);
        }
        info!("compression worker stopped");
    }

    /// Replace the compressed buffer with its decompressed, null-terminated
    /// form. On failure the item keeps an empty, terminated buffer.
    fn decompress(&mut self, item: &mut WorkItem) -> Result<(), FsError> {
        let max = self.max_decompressed_size;
        // One spare byte for the terminator
        let Some(capacity) = max.checked_add(1) else {
            item.buffer = Some(item.heap.alloc(1));
            item.size = 0;
            return Err(FsError::Decompression(CompressionError::OutputTooLarge { max }));
        };
        let mut out = item.heap.alloc(capacity);

        let decoded = self.codec.decompress_block(item.payload(), &mut out[..max]);
        let compressed_len = item.size;
        let len = decoded.as_ref().map_or(0, |n| (*n).min(max));

        out[len] = NULL_TERMINATOR;
        out.truncate(len + 1);
        item.buffer = Some(out);
        item.size = len;

        match decoded {
            Ok(n) => {
                debug!(id = item.id, compressed = compressed_len, size = n, "payload decompressed");
                self.telemetry.update(|c| c.add_decompress(compressed_len, n));
                Ok(())
            }
            Err(e) => Err(FsError::Decompression(e)),
        }
    }

    /// Replace the caller's bytes with one compressed block. On failure the
    /// payload becomes empty; the write still goes ahead.
    fn compress(&mut self, item: &mut WorkItem) -> Result<(), FsError> {
        let plain_len = item.size;
        let compressed = match self.codec.compress_block(item.payload()) {
            Ok(bytes) if bytes.is_empty() && plain_len > 0 => Err(CompressionError::EmptyOutput {
                codec: self.codec.name(),
                input_len: plain_len,
            }),
            other => other,
        };

        match compressed {
            Ok(bytes) => {
                item.size = bytes.len();
                item.buffer = Some(item.heap.adopt(bytes));
                debug!(id = item.id, plain = plain_len, size = item.size, "payload compressed");
                self.telemetry.update(|c| c.add_compress(plain_len, item.size));
                Ok(())
            }
            Err(e) => {
                item.buffer = Some(item.heap.alloc(0));
                item.size = 0;
                Err(FsError::Compression(e))
            }
        }
    }
}
