//! service/work.rs
//! Work items and the caller-side handle.
//!
//! A `WorkItem` is owned by exactly one party at a time: the submitting
//! caller, then whichever worker popped it. It moves between queues by
//! value. The only state shared with the caller is the `WorkShared` slot:
//! the final outcome plus the completion event, filled once by
//! `WorkItem::complete`.
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::constants::RESULT_OK;
use crate::heap::{Heap, HeapBuffer};
use crate::service::event::CompletionEvent;
use crate::service::pipeline::{ItemState, PipelineStage, Transition};
use crate::service::queue::{QueueClosed, QueueProducer};
use crate::telemetry::Telemetry;
use crate::types::FsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => f.write_str("read"),
            Operation::Write => f.write_str("write"),
        }
    }
}

bitflags::bitflags! {
    /// Request flags, fixed at submission.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WorkFlags: u8 {
        /// Append a zero byte past the logical data length (reads).
        const NULL_TERMINATE  = 0b0000_0001;

        /// Route through the compression worker.
        const USE_COMPRESSION = 0b0000_0010;

        /// Extend an existing file instead of replacing it (writes).
        const APPEND_MODE     = 0b0000_0100;
    }
}

impl WorkFlags {
    pub fn for_read(null_terminate: bool, use_compression: bool) -> Self {
        let mut flags = WorkFlags::empty();
        flags.set(WorkFlags::NULL_TERMINATE, null_terminate);
        flags.set(WorkFlags::USE_COMPRESSION, use_compression);
        flags
    }

    pub fn for_write(use_compression: bool, append_mode: bool) -> Self {
        let mut flags = WorkFlags::empty();
        flags.set(WorkFlags::USE_COMPRESSION, use_compression);
        flags.set(WorkFlags::APPEND_MODE, append_mode);
        flags
    }
}

/// Owned, length-checked request path (UTF-8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPath(String);

impl WorkPath {
    /// Reject paths longer than `max_len` bytes instead of truncating them.
    pub fn new(path: impl Into<String>, max_len: usize) -> Result<Self, FsError> {
        let path = path.into();
        if path.len() > max_len {
            return Err(FsError::PathTooLong { len: path.len(), max: max_len });
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Translate to the platform path form used at the I/O boundary.
    pub fn to_native(&self) -> Result<PathBuf, FsError> {
        if self.0.is_empty() {
            return Err(FsError::PathEncoding { path: self.0.clone(), reason: "empty path" });
        }
        if self.0.contains('\0') {
            return Err(FsError::PathEncoding { path: self.0.clone(), reason: "interior NUL byte" });
        }
        Ok(PathBuf::from(&self.0))
    }
}

impl fmt::Display for WorkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final state of a request, moved into the shared slot on completion.
#[derive(Debug)]
pub(crate) struct WorkOutcome {
    result: Result<(), FsError>,
    buffer: Option<HeapBuffer>,
    size: usize,
}

#[derive(Debug)]
pub(crate) struct WorkShared {
    id: u64,
    op: Operation,
    path: WorkPath,
    event: CompletionEvent,
    outcome: Mutex<Option<WorkOutcome>>,
}

impl WorkShared {
    fn outcome(&self) -> MutexGuard<'_, Option<WorkOutcome>> {
        self.outcome.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// One in-flight request.
#[derive(Debug)]
pub struct WorkItem {
    pub(crate) id: u64,
    pub(crate) op: Operation,
    pub(crate) path: WorkPath,
    pub(crate) flags: WorkFlags,
    pub(crate) buffer: Option<HeapBuffer>,
    pub(crate) size: usize,
    pub(crate) result: Result<(), FsError>,
    /// Heap the final buffer is drawn from.
    pub(crate) heap: Heap,
    pub(crate) state: ItemState,
    shared: Arc<WorkShared>,
}

impl WorkItem {
    pub(crate) fn new(
        id: u64,
        op: Operation,
        path: WorkPath,
        flags: WorkFlags,
        buffer: Option<HeapBuffer>,
        heap: Heap,
        entry: PipelineStage,
    ) -> (Box<WorkItem>, WorkHandle) {
        let shared = Arc::new(WorkShared {
            id,
            op,
            path: path.clone(),
            event: CompletionEvent::new(),
            outcome: Mutex::new(None),
        });
        let size = buffer.as_ref().map_or(0, |b| b.len());
        let item = Box::new(WorkItem {
            id,
            op,
            path,
            flags,
            buffer,
            size,
            result: Ok(()),
            heap,
            state: ItemState::Queued(entry),
            shared: Arc::clone(&shared),
        });
        (item, WorkHandle { shared })
    }

    /// Current logical bytes of the buffer (`size` may be shorter than the
    /// allocation, e.g. when a terminator follows the data).
    pub(crate) fn payload(&self) -> &[u8] {
        match &self.buffer {
            Some(buf) => &buf[..self.size.min(buf.len())],
            None => &[],
        }
    }

    /// Record a stage failure. Later failures overwrite earlier ones.
    pub(crate) fn fail(&mut self, err: FsError) {
        warn!(id = self.id, path = %self.path, op = %self.op, error = %err, "request failed");
        self.result = Err(err);
    }

    pub(crate) fn begin(&mut self) {
        debug_assert!(matches!(self.state, ItemState::Queued(_)), "item {} popped in state {:?}", self.id, self.state);
        if let Some(next) = self.state.begin() {
            self.state = next;
        }
    }

    /// Publish the outcome and fire the completion event. Consumes the item,
    /// so no code path can signal twice.
    pub(crate) fn complete(mut self: Box<Self>) {
        if let Some(next) = self.state.settle(Transition::Complete) {
            self.state = next;
        }
        debug!(id = self.id, path = %self.path, op = %self.op, size = self.size, ok = self.result.is_ok(), "request complete");

        let outcome = WorkOutcome {
            result: std::mem::replace(&mut self.result, Ok(())),
            buffer: self.buffer.take(),
            size: self.size,
        };
        *self.shared.outcome() = Some(outcome);
        self.shared.event.signal();
    }

    /// Apply `transition`: complete now, or push onto `next` for the
    /// following stage. An item the next worker can no longer accept
    /// (shutdown) is dropped without signaling.
    pub(crate) fn route(
        mut self: Box<Self>,
        transition: Transition,
        next: &QueueProducer<Box<WorkItem>>,
        telemetry: &Telemetry,
    ) {
        let stage = match transition {
            Transition::Complete => return self.complete(),
            Transition::HandOff(stage) => stage,
        };

        self.state = self
            .state
            .settle(transition)
            .and_then(ItemState::requeue)
            .unwrap_or(ItemState::Queued(stage));
        debug!(id = self.id, path = %self.path, op = %self.op, %stage, "handing off");

        if let Err(QueueClosed(item)) = next.push(self) {
            warn!(id = item.id, path = %item.path, op = %item.op, %stage, "service shut down, request abandoned");
            telemetry.update(|c| c.add_abandoned());
        }
    }
}

/// Caller-side handle to a submitted request.
///
/// Accessors other than [`poll`](Self::poll) block until the request
/// completes. A request abandoned by service shutdown never completes.
#[derive(Debug)]
pub struct WorkHandle {
    shared: Arc<WorkShared>,
}

impl WorkHandle {
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    pub fn operation(&self) -> Operation {
        self.shared.op
    }

    pub fn path(&self) -> &str {
        self.shared.path.as_str()
    }

    /// `true` once the completion event is set.
    pub fn poll(&self) -> bool {
        self.shared.event.is_signaled()
    }

    pub fn wait(&self) {
        self.shared.event.wait();
    }

    pub fn result(&self) -> Result<(), FsError> {
        self.wait();
        match self.shared.outcome().as_ref() {
            Some(outcome) => outcome.result.clone(),
            None => Ok(()),
        }
    }

    /// `0` on success, otherwise [`FsError::code`].
    pub fn result_code(&self) -> i32 {
        match self.result() {
            Ok(()) => RESULT_OK,
            Err(e) => e.code(),
        }
    }

    /// Take the final buffer. The first call transfers ownership; later
    /// calls return `None`.
    pub fn buffer(&self) -> Option<HeapBuffer> {
        self.wait();
        self.shared.outcome().as_mut().and_then(|o| o.buffer.take())
    }

    /// Logical length of the final buffer: bytes read, bytes written, or
    /// decompressed length, depending on the request.
    pub fn size(&self) -> usize {
        self.wait();
        self.shared.outcome().as_ref().map_or(0, |o| o.size)
    }

    /// Wait for completion and release the request. A buffer already taken
    /// with [`buffer`](Self::buffer) stays with the caller.
    pub fn destroy(self) {
        self.wait();
    }
}
