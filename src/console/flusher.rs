//! Batch flusher
//!
//! Wakes on a fixed period, drains pending lines from the buffer, and
//! delivers them to the sink as one append per pass. Display updates can
//! be expensive, so bursts are amortized into large batches; a saturated
//! pass re-runs immediately to work off backlog faster than real time.

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ConsoleConfig;

use super::buffer::LogBuffer;
use super::sink::SinkHandle;
use super::types::{BufferEntry, LINE_TERMINATOR, OVERFLOW_NOTICE};

/// Drain up to `max_lines` entries and deliver them as one batch,
/// returning the number of entries removed.
///
/// An overflow marker is never part of the batch text: it makes the pass
/// clear the display and show [`OVERFLOW_NOTICE`] before the remaining
/// lines. Pass `usize::MAX` for a ceiling-less final flush. An empty
/// buffer produces no sink calls at all.
pub(crate) fn flush_pass(buffer: &LogBuffer, sink: &SinkHandle, max_lines: usize) -> usize {
    let entries = if max_lines == usize::MAX {
        buffer.drain_all()
    } else {
        buffer.drain(max_lines)
    };
    if entries.is_empty() {
        return 0;
    }

    let removed = entries.len();
    let mut batch = String::new();
    for entry in entries {
        match entry {
            BufferEntry::OverflowMarker => {
                sink.clear_all();
                sink.append_batch(format!("{}{}", OVERFLOW_NOTICE, LINE_TERMINATOR));
            }
            BufferEntry::Line(line) => {
                batch.push_str(&line);
                batch.push_str(LINE_TERMINATOR);
            }
        }
    }

    if !batch.is_empty() {
        sink.append_batch(batch);
        sink.scroll_to_end();
    }

    removed
}

/// Timer-driven drain of the log buffer into the sink.
pub struct BatchFlusher {
    buffer: LogBuffer,
    sink: SinkHandle,
    flush_interval_ms: u64,
    max_lines_per_flush: usize,
}

impl BatchFlusher {
    pub fn new(buffer: LogBuffer, sink: SinkHandle, config: &ConsoleConfig) -> Self {
        Self {
            buffer,
            sink,
            flush_interval_ms: config.flush_interval_ms,
            max_lines_per_flush: config.max_lines_per_flush,
        }
    }

    /// Spawn the flush loop. Cancelling `shutdown` stops the periodic
    /// trigger; nothing else in the pipeline is affected.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(self.flush_interval_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Shutdown wins over a due tick.
                    biased;
                    _ = shutdown.cancelled() => {
                        debug!("flush trigger stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        // A pass that hits the ceiling means backlog:
                        // go again via the scheduler instead of waiting
                        // out the period (or recursing).
                        while flush_pass(&self.buffer, &self.sink, self.max_lines_per_flush)
                            == self.max_lines_per_flush
                        {
                            tokio::task::yield_now().await;
                        }
                    }
                }
            }
        })
    }
}
