//! compression/mod.rs
//! Block codecs used by the compression worker.
//!
//! Files written with `use_compression` hold one raw codec block: no size
//! prefix, no checksum, nothing self-describing. The reader must already
//! know the data is compressed and bound the decompressed size itself.

pub mod codecs;
pub mod types;

pub use codecs::*;
pub use types::*;
