//! service: asynchronous filesystem requests.
//!
//! Two fixed workers, each fed by its own bounded queue:
//!
//! ```text
//! submit_read ──► io queue ──► IoWorker ──(compressed)──► compression queue ──► CompressionWorker ──► done
//! submit_write ─(compressed)─► compression queue ──► CompressionWorker ──► io queue ──► IoWorker ──► done
//! ```

pub mod core;
pub mod event;
pub mod pipeline;
pub mod queue;
pub mod work;

mod compression_worker;
mod io_worker;

pub use self::core::FsService;
pub use event::CompletionEvent;
pub use pipeline::{after_stage, entry_stage, ItemState, PipelineStage, Transition};
pub use queue::{work_queue, QueueClosed, QueueConsumer, QueueMessage, QueueProducer};
pub use work::{Operation, WorkFlags, WorkHandle, WorkItem, WorkPath};
