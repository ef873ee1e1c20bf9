//! service/core.rs
//! `FsService`: owns both queues and both worker threads.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use crate::compression::{BlockCodec, Lz4BlockCodec};
use crate::config::FsConfig;
use crate::constants::thread_names;
use crate::heap::{Heap, HeapBuffer};
use crate::service::compression_worker::CompressionWorker;
use crate::service::io_worker::IoWorker;
use crate::service::pipeline::{entry_stage, PipelineStage};
use crate::service::queue::{work_queue, QueueClosed, QueueProducer};
use crate::service::work::{Operation, WorkFlags, WorkHandle, WorkItem, WorkPath};
use crate::telemetry::{Telemetry, TelemetrySnapshot};
use crate::types::FsError;

/// Asynchronous filesystem service.
///
/// Created once at startup, dropped once at shutdown. Dropping it pushes a
/// shutdown marker onto each queue and joins each worker, I/O first.
///
/// Shutdown contract: no caller may still be waiting on a request when the
/// service is dropped. Requests that have not reached their final stage by
/// then (for instance a compressed write whose hand-off arrives after the
/// I/O worker stopped) are abandoned and their handles never complete.
///
/// Capacity: a compressed read waiting to enter the compression queue and a
/// compressed write waiting to enter the I/O queue block each other's worker
/// once both queues are full. Normal operation and shutdown then hang alike.
/// Keep `queue_capacity` at or above the number of compressed requests in
/// flight at once.
#[derive(Debug)]
pub struct FsService {
    config: FsConfig,
    heap: Heap,
    io_queue: QueueProducer<Box<WorkItem>>,
    compression_queue: QueueProducer<Box<WorkItem>>,
    io_thread: Option<JoinHandle<()>>,
    compression_thread: Option<JoinHandle<()>>,
    telemetry: Arc<Telemetry>,
    next_id: AtomicU64,
}

impl FsService {
    /// Start the service with the default LZ4 block codec.
    /// `heap` backs the write-path buffers.
    pub fn new(config: FsConfig, heap: Heap) -> Result<Self, FsError> {
        Self::with_codec(config, heap, Box::new(Lz4BlockCodec::new()))
    }

    pub fn with_codec(config: FsConfig, heap: Heap, codec: Box<dyn BlockCodec>) -> Result<Self, FsError> {
        config.validate()?;

        let telemetry = Arc::new(Telemetry::new());
        let (io_queue, io_rx) = work_queue(config.queue_capacity);
        let (compression_queue, compression_rx) = work_queue(config.queue_capacity);

        let io_worker = IoWorker {
            queue: io_rx,
            compression: compression_queue.clone(),
            telemetry: Arc::clone(&telemetry),
        };
        let io_thread = thread::Builder::new()
            .name(thread_names::IO_WORKER.into())
            .spawn(move || io_worker.run())
            .map_err(|e| FsError::WorkerSpawn { worker: thread_names::IO_WORKER, source: Arc::new(e) })?;

        let compression_worker = CompressionWorker {
            queue: compression_rx,
            io: io_queue.clone(),
            codec,
            max_decompressed_size: config.max_decompressed_size,
            telemetry: Arc::clone(&telemetry),
        };
        let compression_thread = thread::Builder::new()
            .name(thread_names::COMPRESSION_WORKER.into())
            .spawn(move || compression_worker.run());

        let compression_thread = match compression_thread {
            Ok(handle) => handle,
            Err(e) => {
                // Stop the I/O worker before reporting
                io_queue.push_shutdown();
                let _ = io_thread.join();
                return Err(FsError::WorkerSpawn { worker: thread_names::COMPRESSION_WORKER, source: Arc::new(e) });
            }
        };

        info!(queue_capacity = config.queue_capacity, heap = heap.name(), "filesystem service started");

        Ok(Self {
            config,
            heap,
            io_queue,
            compression_queue,
            io_thread: Some(io_thread),
            compression_thread: Some(compression_thread),
            telemetry,
            next_id: AtomicU64::new(1),
        })
    }

    /// Queue a whole-file read. The final buffer is drawn from `heap`.
    /// Blocks while the target queue is full.
    pub fn submit_read(
        &self,
        path: impl Into<String>,
        heap: &Heap,
        null_terminate: bool,
        use_compression: bool,
    ) -> Result<WorkHandle, FsError> {
        let flags = WorkFlags::for_read(null_terminate, use_compression);
        self.submit(Operation::Read, path.into(), flags, None, heap.clone())
    }

    /// Queue a write of `buffer` (its length is the write size). Blocks
    /// while the target queue is full.
    pub fn submit_write(
        &self,
        path: impl Into<String>,
        buffer: impl Into<Vec<u8>>,
        use_compression: bool,
        append_mode: bool,
    ) -> Result<WorkHandle, FsError> {
        let flags = WorkFlags::for_write(use_compression, append_mode);
        let buffer = self.heap.adopt(buffer.into());
        self.submit(Operation::Write, path.into(), flags, Some(buffer), self.heap.clone())
    }

    fn submit(
        &self,
        op: Operation,
        path: String,
        flags: WorkFlags,
        buffer: Option<HeapBuffer>,
        heap: Heap,
    ) -> Result<WorkHandle, FsError> {
        let path = WorkPath::new(path, self.config.max_path_len)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stage = entry_stage(op, flags);

        let (item, handle) = WorkItem::new(id, op, path, flags, buffer, heap, stage);
        debug!(id, path = handle.path(), %op, ?flags, %stage, "request submitted");

        let queue = match stage {
            PipelineStage::Io => &self.io_queue,
            PipelineStage::Compression => &self.compression_queue,
        };
        queue.push(item).map_err(|QueueClosed(_)| FsError::ServiceStopped)?;
        Ok(handle)
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Heap backing write-path buffers.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    /// Explicit form of drop.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for FsService {
    fn drop(&mut self) {
        let workers = [
            (&self.io_queue, self.io_thread.take(), thread_names::IO_WORKER),
            (&self.compression_queue, self.compression_thread.take(), thread_names::COMPRESSION_WORKER),
        ];
        for (queue, thread, name) in workers {
            queue.push_shutdown();
            if let Some(thread) = thread {
                if thread.join().is_err() {
                    error!(worker = name, "worker thread panicked");
                }
            }
        }
        let snapshot = self.telemetry.snapshot();
        let counters = &snapshot.counters;
        info!(
            reads = counters.reads_completed,
            writes = counters.writes_completed,
            failures = counters.failures,
            abandoned = counters.abandoned,
            busy_ms = snapshot.stage_times.total().as_millis() as u64,
            "filesystem service stopped"
        );
    }
}
