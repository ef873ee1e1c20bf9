//! telemetry/counters.rs
//! Request and byte counters updated by the workers.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub reads_completed: u64,
    pub writes_completed: u64,
    pub compressions: u64,
    pub decompressions: u64,
    pub failures: u64,
    /// Items dropped at shutdown before reaching their next queue.
    pub abandoned: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// Uncompressed side of every codec run.
    pub bytes_plain: u64,
    /// Compressed side of every codec run.
    pub bytes_compressed: u64,
}

impl TelemetryCounters {
    pub fn add_read(&mut self, len: usize) {
        self.reads_completed += 1;
        self.bytes_read += len as u64;
    }

    pub fn add_write(&mut self, len: usize) {
        self.writes_completed += 1;
        self.bytes_written += len as u64;
    }

    pub fn add_compress(&mut self, plain_len: usize, compressed_len: usize) {
        self.compressions += 1;
        self.bytes_plain += plain_len as u64;
        self.bytes_compressed += compressed_len as u64;
    }

    pub fn add_decompress(&mut self, compressed_len: usize, plain_len: usize) {
        self.decompressions += 1;
        self.bytes_plain += plain_len as u64;
        self.bytes_compressed += compressed_len as u64;
    }

    pub fn add_failure(&mut self) {
        self.failures += 1;
    }

    pub fn add_abandoned(&mut self) {
        self.abandoned += 1;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.reads_completed  += rhs.reads_completed;
        self.writes_completed += rhs.writes_completed;
        self.compressions     += rhs.compressions;
        self.decompressions   += rhs.decompressions;
        self.failures         += rhs.failures;
        self.abandoned        += rhs.abandoned;
        self.bytes_read       += rhs.bytes_read;
        self.bytes_written    += rhs.bytes_written;
        self.bytes_plain      += rhs.bytes_plain;
        self.bytes_compressed += rhs.bytes_compressed;
    }
}
