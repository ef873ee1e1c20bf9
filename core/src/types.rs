use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::compression::CompressionError;
use crate::constants::RESULT_GENERIC_ERROR;

/// Unified filesystem error carried in a work item's `result`.
/// - Native I/O errors are kept verbatim (shared so the error stays `Clone`
///   and a handle can report it more than once).
/// - `code()` maps every variant onto the engine's integer result code.
#[derive(Debug, Clone, Error)]
pub enum FsError {
    /// Path exceeds the configured byte limit; rejected at submission.
    #[error("path is {len} bytes, limit is {max}")]
    PathTooLong { len: usize, max: usize },

    /// Path cannot be expressed in the platform's native encoding.
    #[error("path {path:?} cannot be translated to a native path: {reason}")]
    PathEncoding { path: String, reason: &'static str },

    #[error("open failed for {path:?}: {source}")]
    Open { path: String, #[source] source: Arc<io::Error> },

    #[error("size query failed for {path:?}: {source}")]
    SizeQuery { path: String, #[source] source: Arc<io::Error> },

    #[error("read failed for {path:?}: {source}")]
    Read { path: String, #[source] source: Arc<io::Error> },

    #[error("seek to end failed for {path:?}: {source}")]
    Seek { path: String, #[source] source: Arc<io::Error> },

    #[error("write failed for {path:?}: {source}")]
    Write { path: String, #[source] source: Arc<io::Error> },

    /// Codec produced no output for a non-empty payload.
    #[error("compression failed: {0}")]
    Compression(CompressionError),

    /// Codec rejected the bytes fetched from disk.
    #[error("decompression failed: {0}")]
    Decompression(CompressionError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to start {worker} worker: {source}")]
    WorkerSpawn { worker: &'static str, #[source] source: Arc<io::Error> },

    /// The worker that should take the request has exited.
    #[error("filesystem service has stopped")]
    ServiceStopped,
}

impl FsError {
    pub(crate) fn open(path: &str, e: io::Error) -> Self {
        FsError::Open { path: path.to_owned(), source: Arc::new(e) }
    }

    pub(crate) fn size_query(path: &str, e: io::Error) -> Self {
        FsError::SizeQuery { path: path.to_owned(), source: Arc::new(e) }
    }

    pub(crate) fn read(path: &str, e: io::Error) -> Self {
        FsError::Read { path: path.to_owned(), source: Arc::new(e) }
    }

    pub(crate) fn seek(path: &str, e: io::Error) -> Self {
        FsError::Seek { path: path.to_owned(), source: Arc::new(e) }
    }

    pub(crate) fn write(path: &str, e: io::Error) -> Self {
        FsError::Write { path: path.to_owned(), source: Arc::new(e) }
    }

    /// The underlying native error, for the I/O variants.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            FsError::Open { source, .. }
            | FsError::SizeQuery { source, .. }
            | FsError::Read { source, .. }
            | FsError::Seek { source, .. }
            | FsError::Write { source, .. }
            | FsError::WorkerSpawn { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// Integer result code: the native OS code when there is one, else `-1`.
    pub fn code(&self) -> i32 {
        self.io_error()
            .and_then(io::Error::raw_os_error)
            .unwrap_or(RESULT_GENERIC_ERROR)
    }
}
