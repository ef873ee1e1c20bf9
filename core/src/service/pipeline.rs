//! service/pipeline.rs
//! Per-item stage progression, kept free of threads and I/O.
//!
//! ```text
//! read                 : Io -> [Compression if use_compression] -> Completed
//! write                : [Compression if use_compression] -> Io -> Completed
//! ```
//!
//! An item is `Queued(stage)` while it waits in a queue, `Processing(stage)`
//! while a worker owns it, then either `Completed` or `HandedOff(next)` on
//! its way into the other queue.
use std::fmt;

use crate::service::work::{Operation, WorkFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Raw file reads and writes.
    Io,
    /// Decompression after a read, compression before a write.
    Compression,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Io => f.write_str("io"),
            PipelineStage::Compression => f.write_str("compression"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Queued(PipelineStage),
    Processing(PipelineStage),
    HandedOff(PipelineStage),
    Completed,
}

/// What happens to an item once a stage is done with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Complete,
    HandOff(PipelineStage),
}

/// Queue a freshly submitted item goes to.
pub fn entry_stage(op: Operation, flags: WorkFlags) -> PipelineStage {
    match op {
        Operation::Write if flags.contains(WorkFlags::USE_COMPRESSION) => PipelineStage::Compression,
        _ => PipelineStage::Io,
    }
}

/// Next step after `stage` finished, `stage_ok` telling whether it succeeded.
///
/// A failed read completes at once. A compressed write always goes on to the
/// I/O stage, even when compression failed.
pub fn after_stage(op: Operation, flags: WorkFlags, stage: PipelineStage, stage_ok: bool) -> Transition {
    let compressed = flags.contains(WorkFlags::USE_COMPRESSION);
    match (stage, op) {
        (PipelineStage::Io, Operation::Read) if compressed && stage_ok => Transition::HandOff(PipelineStage::Compression),
        (PipelineStage::Io, _) => Transition::Complete,
        (PipelineStage::Compression, Operation::Read) => Transition::Complete,
        (PipelineStage::Compression, Operation::Write) => Transition::HandOff(PipelineStage::Io),
    }
}

impl ItemState {
    pub fn stage(&self) -> Option<PipelineStage> {
        match *self {
            ItemState::Queued(s) | ItemState::Processing(s) | ItemState::HandedOff(s) => Some(s),
            ItemState::Completed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemState::Completed)
    }

    /// `Queued(s)` -> `Processing(s)`.
    pub fn begin(self) -> Option<ItemState> {
        match self {
            ItemState::Queued(s) => Some(ItemState::Processing(s)),
            _ => None,
        }
    }

    /// `Processing(_)` -> `Completed` or `HandedOff(next)`.
    pub fn settle(self, transition: Transition) -> Option<ItemState> {
        match (self, transition) {
            (ItemState::Processing(_), Transition::Complete) => Some(ItemState::Completed),
            (ItemState::Processing(s), Transition::HandOff(next)) if s != next => Some(ItemState::HandedOff(next)),
            _ => None,
        }
    }

    /// `HandedOff(s)` -> `Queued(s)` once the item sits in the next queue.
    pub fn requeue(self) -> Option<ItemState> {
        match self {
            ItemState::HandedOff(s) => Some(ItemState::Queued(s)),
            _ => None,
        }
    }
}
