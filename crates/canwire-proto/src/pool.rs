//! Reusable scratch buffers for frame encoding and decoding.
//!
//! Each pack/unpack call checks a buffer out of a shared pool and returns it
//! on every exit path, including errors, via an RAII guard. A buffer is never
//! touched again by the releasing call once the guard drops.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::BytesMut;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Buffers that grew past this are dropped instead of pooled, so one
/// oversized frame does not pin memory for the lifetime of the pool.
const MAX_RETAINED_CAPACITY: usize = 256 * 1024;

const MAX_POOLED_BUFFERS: usize = 16;

/// A shared pool of growable scratch buffers.
///
/// Cloning is cheap; clones share the same underlying pool.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    free: Mutex<Vec<BytesMut>>,
    outstanding: AtomicUsize,
}

impl BufferPool {
    /// Create an empty pool. Buffers are allocated lazily on first checkout.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(Vec::new()),
                outstanding: AtomicUsize::new(0),
            }),
        }
    }

    /// Check a cleared buffer out of the pool.
    pub fn acquire(&self) -> PooledBuf {
        let buf = {
            let mut free = self.inner.free.lock().unwrap_or_else(|e| e.into_inner());
            free.pop()
        };
        let buf = buf.unwrap_or_else(|| BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY));
        self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
        PooledBuf {
            buf,
            pool: Arc::clone(&self.inner),
        }
    }

    /// Number of buffers currently checked out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::SeqCst)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

/// An exclusively owned scratch buffer, returned to its pool on drop.
pub struct PooledBuf {
    buf: BytesMut,
    pool: Arc<PoolInner>,
}

impl std::ops::Deref for PooledBuf {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        &self.buf
    }
}

impl std::ops::DerefMut for PooledBuf {
    fn deref_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl Drop for PooledBuf {
    fn drop(&mut self) {
        self.pool.outstanding.fetch_sub(1, Ordering::SeqCst);
        let mut buf = std::mem::take(&mut self.buf);
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.pool.free.lock().unwrap_or_else(|e| e.into_inner());
        if free.len() < MAX_POOLED_BUFFERS {
            free.push(buf);
        }
    }
}

impl std::fmt::Debug for PooledBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuf").field("len", &self.buf.len()).finish()
    }
}
