//! compression/codecs/mod.rs
//! Concrete block codecs.

pub mod lz4;

pub use lz4::*;
