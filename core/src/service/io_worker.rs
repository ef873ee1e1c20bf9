//! service/io_worker.rs
//! Raw file reads and writes on the dedicated I/O thread.
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::constants::NULL_TERMINATOR;
use crate::service::pipeline::{after_stage, PipelineStage};
use crate::service::queue::{QueueConsumer, QueueMessage, QueueProducer};
use crate::service::work::{Operation, WorkFlags, WorkItem};
use crate::telemetry::{Stage, Telemetry};
use crate::types::FsError;

pub(crate) struct IoWorker {
    pub(crate) queue: QueueConsumer<Box<WorkItem>>,
    /// Compressed reads continue here.
    pub(crate) compression: QueueProducer<Box<WorkItem>>,
    pub(crate) telemetry: Arc<Telemetry>,
}

impl IoWorker {
    pub(crate) fn run(self) {
        debug!("io worker started");
        while let QueueMessage::Payload(mut item) = self.queue.pop() {
            item.begin();
            let start = Instant::now();

            let outcome = match item.op {
                Operation::Read => read_file(&mut item),
                Operation::Write => write_file(&mut item),
            };
            let stage = match item.op {
                Operation::Read => Stage::Read,
                Operation::Write => Stage::Write,
            };
            self.telemetry.add_stage_time(stage, start.elapsed());

            let stage_ok = outcome.is_ok();
            match outcome {
                Ok(()) => {
                    let len = item.size;
                    self.telemetry.update(|c| match stage {
                        Stage::Read => c.add_read(len),
                        _ => c.add_write(len),
                    });
                }
                Err(e) => {
                    self.telemetry.update(|c| c.add_failure());
                    item.fail(e);
                }
            }

            let transition = after_stage(item.op, item.flags, PipelineStage::Io, stage_ok);
            item.route(transition, &self.compression, &self.telemetry);
        }
        info!("io worker stopped");
    }
}

/// Read the whole file into a buffer drawn from the item's heap.
fn read_file(item: &mut WorkItem) -> Result<(), FsError> {
    let native = item.path.to_native()?;
    let path = item.path.as_str();

    let mut file = File::open(&native).map_err(|e| FsError::open(path, e))?;
    let len = file.metadata().map_err(|e| FsError::size_query(path, e))?.len();
    let len = usize::try_from(len).map_err(|_| {
        FsError::size_query(path, io::Error::new(io::ErrorKind::OutOfMemory, "file does not fit in memory"))
    })?;

    let null_terminate = item.flags.contains(WorkFlags::NULL_TERMINATE);
    let mut buffer = item.heap.alloc(if null_terminate { len + 1 } else { len });

    let read = read_full(&mut file, &mut buffer[..len]).map_err(|e| FsError::read(path, e))?;
    if null_terminate {
        buffer[read] = NULL_TERMINATOR;
        buffer.truncate(read + 1);
    } else {
        buffer.truncate(read);
    }

    debug!(id = item.id, path, size = read, "file read");
    item.size = read;
    item.buffer = Some(buffer);
    Ok(())
}

/// Read until `buf` is full or EOF; returns the bytes read.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut off = 0;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(off)
}

/// Write the item's payload. Appends only when asked to and the target
/// already exists as a regular file; otherwise creates or truncates.
fn write_file(item: &mut WorkItem) -> Result<(), FsError> {
    let native = item.path.to_native()?;
    let path = item.path.as_str();

    let should_append = item.flags.contains(WorkFlags::APPEND_MODE)
        && fs::metadata(&native).map(|m| !m.is_dir()).unwrap_or(false);

    let mut file = if should_append {
        OpenOptions::new().append(true).create(true).open(&native)
    } else {
        File::create(&native)
    }
    .map_err(|e| FsError::open(path, e))?;

    if should_append {
        file.seek(SeekFrom::End(0)).map_err(|e| FsError::seek(path, e))?;
    }

    let payload = item.payload();
    file.write_all(payload).map_err(|e| FsError::write(path, e))?;
    let written = payload.len();

    debug!(id = item.id, path, size = written, append = should_append, "file written");
    item.size = written;
    Ok(())
}
