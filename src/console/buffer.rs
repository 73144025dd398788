//! Bounded log buffer
//!
//! A thread-safe FIFO of pending console lines shared by the two stream
//! readers (producers) and the flusher (consumer). Size is policed with
//! a running counter of decoded characters plus terminators; crossing
//! the cap destroys buffered history rather than blocking producers or
//! dropping new output.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::warn;

use super::types::{BufferEntry, LINE_TERMINATOR};

/// Cheaply cloneable handle over the shared buffer state.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    inner: Arc<BufferInner>,
}

#[derive(Debug)]
struct BufferInner {
    queue: Mutex<VecDeque<BufferEntry>>,
    /// Characters appended since startup or the last overflow reset.
    /// Never decremented by draining.
    size: AtomicU64,
    /// Set once, on the first overflow episode of the session.
    overflowed: AtomicBool,
    max_chars: u64,
}

impl LogBuffer {
    pub fn new(max_chars: u64) -> Self {
        Self {
            inner: Arc::new(BufferInner {
                queue: Mutex::new(VecDeque::new()),
                size: AtomicU64::new(0),
                overflowed: AtomicBool::new(false),
                max_chars,
            }),
        }
    }

    /// Append one decoded line, enforcing the size cap.
    ///
    /// The cap check is coarse: with two concurrent producers a small
    /// overshoot past the cap is possible and accepted. The overflow
    /// flag transitions exactly once, so only one producer performs the
    /// destructive reset.
    pub fn push(&self, line: String) {
        let contribution = (line.chars().count() + LINE_TERMINATOR.len()) as u64;
        let total = self.inner.size.fetch_add(contribution, Ordering::SeqCst) + contribution;

        if total > self.inner.max_chars
            && self
                .inner
                .overflowed
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        {
            warn!(
                total,
                cap = self.inner.max_chars,
                "console buffer overflow, clearing history"
            );
            {
                let mut queue = self.inner.queue.lock().unwrap();
                queue.clear();
                queue.push_back(BufferEntry::OverflowMarker);
            }
            // The triggering line is the only content accounted for now.
            self.inner.size.store(contribution, Ordering::SeqCst);
        }

        self.inner.queue.lock().unwrap().push_back(BufferEntry::Line(line));
    }

    /// Remove up to `max` entries from the front, in FIFO order.
    pub fn drain(&self, max: usize) -> Vec<BufferEntry> {
        let mut queue = self.inner.queue.lock().unwrap();
        let take = queue.len().min(max);
        queue.drain(..take).collect()
    }

    /// Remove every pending entry.
    pub fn drain_all(&self) -> Vec<BufferEntry> {
        self.inner.queue.lock().unwrap().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().unwrap().is_empty()
    }

    /// Characters appended since startup or the last overflow reset.
    pub fn buffered_chars(&self) -> u64 {
        self.inner.size.load(Ordering::SeqCst)
    }

    pub fn has_overflowed(&self) -> bool {
        self.inner.overflowed.load(Ordering::SeqCst)
    }
}
