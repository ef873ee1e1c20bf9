//! fs-core
//!
//! Asynchronous filesystem service for the engine.
//! Any thread submits a read or write and gets a handle back immediately;
//! two fixed background workers (raw I/O, LZ4 codec) carry the request
//! through a queue pipeline until its completion event fires.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod heap;
pub mod logging;
pub mod types;

pub mod compression;
pub mod telemetry;

// Request pipeline
pub mod service;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::FsConfig;
    pub use crate::heap::{Heap, HeapBuffer};
    pub use crate::service::{FsService, Operation, WorkFlags, WorkHandle};
    pub use crate::types::FsError;
}
