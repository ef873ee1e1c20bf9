/// Path limit in bytes (UTF-8), checked at submission.
pub const MAX_PATH_LEN: usize = 1024;

/// Queue capacity used when the caller does not pick one.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Upper bound for a single decompressed payload (16 MiB).
/// Compressed files carry no size header, so the decompression stage
/// allocates this much and shrinks to the real length afterwards.
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 16 * 1024 * 1024;

/// Largest accepted decompression bound: LZ4's maximum block input size.
pub const MAX_DECOMPRESSED_SIZE_LIMIT: usize = 0x7E00_0000;

/// Largest accepted queue capacity; channel slots are preallocated.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 16;

/// Result code reported for a successful request.
pub const RESULT_OK: i32 = 0;

/// Result code for failures without a native OS code.
pub const RESULT_GENERIC_ERROR: i32 = -1;

/// Byte appended past the logical length for text consumers.
pub const NULL_TERMINATOR: u8 = 0;

/// Worker thread names (visible in debuggers and tracing output).
pub mod thread_names {
    pub const IO_WORKER: &str = "fs-io";
    pub const COMPRESSION_WORKER: &str = "fs-compression";
}
