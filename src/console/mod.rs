//! Live process output console
//!
//! Streams a child process's stdout and stderr into a display sink in
//! batched updates, with a size-capped buffer in between.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │ stdout reader│     │ stderr reader│   two producer tasks,
//! └──────┬───────┘     └──────┬───────┘   one per pipe
//!        │    decoded lines   │
//!        ▼                    ▼
//! ┌─────────────────────────────────────┐
//! │              LogBuffer              │  size-capped FIFO; crossing
//! │  (concurrent FIFO + char counter)   │  the cap clears history
//! └──────────────────┬──────────────────┘
//!                    │ drain ≤ N per pass
//!                    ▼
//! ┌─────────────────────────────────────┐
//! │            BatchFlusher             │  fixed period, re-runs
//! │     (timer-driven drain task)       │  immediately on saturation
//! └──────────────────┬──────────────────┘
//!                    │ batched appends        ┌──────────────────┐
//!                    ▼                        │ lifecycle monitor│
//! ┌─────────────────────────────────────┐     │ (waits for exit, │
//! │            SinkDispatcher           │◄────┤  final flush +   │
//! │  (single task owning the display)   │     │  exit notice)    │
//! └─────────────────────────────────────┘     └──────────────────┘
//! ```
//!
//! Ordering within one stream is preserved end to end; across the two
//! streams lines interleave in arrival order. Closing the console stops
//! only the flush trigger; readers and the monitor wind down on their
//! own when the pipes close and the process exits.

mod buffer;
mod flusher;
mod monitor;
mod pipeline;
mod process;
mod reader;
mod sink;
pub mod types;

pub use buffer::LogBuffer;
pub use flusher::BatchFlusher;
pub use monitor::spawn_monitor;
pub use pipeline::ConsolePipeline;
pub use process::{spawn_command, ProcessError, ProcessHandle, SpawnedProcess};
pub use reader::{spawn_reader, StreamKind};
pub use sink::{ConsoleSink, SinkDispatcher, SinkHandle, TerminalSink};
pub use types::{BufferEntry, SinkCommand, LINE_TERMINATOR, OVERFLOW_NOTICE};
