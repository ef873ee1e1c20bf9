//! config.rs
//! Service configuration.
//!
//! Every field has a default, so a partial JSON document is accepted:
//! `{"queue_capacity": 4}` keeps the default path and decompression limits.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_DECOMPRESSED_SIZE, DEFAULT_QUEUE_CAPACITY, MAX_DECOMPRESSED_SIZE_LIMIT, MAX_PATH_LEN,
    MAX_QUEUE_CAPACITY,
};
use crate::types::FsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Capacity of each of the two work queues.
    pub queue_capacity: usize,

    /// Longest accepted path, in UTF-8 bytes.
    pub max_path_len: usize,

    /// Buffer reserved for one decompressed payload.
    pub max_decompressed_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_path_len: MAX_PATH_LEN,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }
}

impl FsConfig {
    pub fn new(queue_capacity: usize) -> Self {
        Self { queue_capacity, ..Self::default() }
    }

    pub fn with_max_decompressed_size(mut self, max: usize) -> Self {
        self.max_decompressed_size = max;
        self
    }

    pub fn with_max_path_len(mut self, max: usize) -> Self {
        self.max_path_len = max;
        self
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, FsError> {
        let config: FsConfig =
            serde_json::from_str(raw).map_err(|e| FsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FsError> {
        // A zero-capacity channel would turn every push into a rendezvous
        if self.queue_capacity == 0 {
            return Err(FsError::InvalidConfig("queue_capacity must be at least 1".into()));
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(FsError::InvalidConfig(format!(
                "queue_capacity {} exceeds {MAX_QUEUE_CAPACITY}",
                self.queue_capacity
            )));
        }
        if self.max_path_len == 0 {
            return Err(FsError::InvalidConfig("max_path_len must be at least 1".into()));
        }
        if self.max_decompressed_size == 0 {
            return Err(FsError::InvalidConfig("max_decompressed_size must be at least 1".into()));
        }
        if self.max_decompressed_size > MAX_DECOMPRESSED_SIZE_LIMIT {
            return Err(FsError::InvalidConfig(format!(
                "max_decompressed_size {} exceeds {MAX_DECOMPRESSED_SIZE_LIMIT}",
                self.max_decompressed_size
            )));
        }
        Ok(())
    }
}
