//! heap.rs
//! Tracking allocator handle for I/O buffers.
//!
//! Every buffer the service hands out is registered with the `Heap` it was
//! drawn from and deregistered when dropped, so outstanding buffers can be
//! listed at shutdown. A `Heap` is cheap to clone and safe to use from any
//! thread; reads name the heap their final buffer belongs to, the service
//! keeps its own for write-path buffers.
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Default)]
struct HeapInner {
    name: String,
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, usize>>,
}

impl HeapInner {
    fn live(&self) -> MutexGuard<'_, HashMap<u64, usize>> {
        // Bookkeeping only; a poisoned map is still consistent enough to report
        self.live.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn register(&self, len: usize) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.live().insert(id, len);
        id
    }

    fn resize(&self, id: u64, len: usize) {
        if let Some(size) = self.live().get_mut(&id) {
            *size = len;
        }
    }

    fn release(&self, id: u64) {
        self.live().remove(&id);
    }
}

/// Outstanding allocations of one heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeapStats {
    pub allocations: usize,
    pub bytes: usize,
}

#[derive(Clone, Default)]
pub struct Heap {
    inner: Arc<HeapInner>,
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("name", &self.inner.name)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Heap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(HeapInner { name: name.into(), ..HeapInner::default() }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Allocate a zero-filled buffer of `len` bytes.
    pub fn alloc(&self, len: usize) -> HeapBuffer {
        self.adopt(vec![0u8; len])
    }

    /// Take ownership of an existing vector and track it.
    pub fn adopt(&self, bytes: Vec<u8>) -> HeapBuffer {
        let id = self.inner.register(bytes.len());
        HeapBuffer { bytes, id, heap: Arc::clone(&self.inner) }
    }

    pub fn stats(&self) -> HeapStats {
        let live = self.inner.live();
        HeapStats { allocations: live.len(), bytes: live.values().sum() }
    }

    /// Log every outstanding allocation; returns how many there are.
    pub fn report_leaks(&self) -> usize {
        let live = self.inner.live();
        for (id, size) in live.iter() {
            warn!(heap = %self.inner.name, allocation = id, size, "memory leak");
        }
        live.len()
    }

    /// Whether two handles refer to the same heap.
    pub fn same_heap(&self, other: &Heap) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Owned bytes drawn from a [`Heap`]; released from tracking on drop.
pub struct HeapBuffer {
    bytes: Vec<u8>,
    id: u64,
    heap: Arc<HeapInner>,
}

impl HeapBuffer {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
        self.bytes.shrink_to_fit();
        self.heap.resize(self.id, self.bytes.len());
    }

    /// Name of the heap this buffer belongs to.
    pub fn heap_name(&self) -> &str {
        &self.heap.name
    }

    /// Leave the tracking heap and return the plain vector.
    pub fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

impl Deref for HeapBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for HeapBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl AsRef<[u8]> for HeapBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for HeapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapBuffer")
            .field("heap", &self.heap.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Drop for HeapBuffer {
    fn drop(&mut self) {
        self.heap.release(self.id);
    }
}
