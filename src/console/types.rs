//! Shared types for the console pipeline
//!
//! Defines the buffer entry and display command vocabulary passed
//! between the readers, the flusher, and the sink dispatcher.

/// Terminator appended when re-joining decoded lines for display.
pub const LINE_TERMINATOR: &str = "\n";

/// Notice shown after buffered history is destroyed by the size cap.
pub const OVERFLOW_NOTICE: &str = "Max console size exceeded, logs cleared!";

// ============================================================================
// Buffer Entries
// ============================================================================

/// One pending item in the log buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferEntry {
    /// A decoded output line, terminator stripped.
    Line(String),
    /// Marks the point where an overflow reset destroyed earlier history.
    /// The flusher turns this into a display clear plus [`OVERFLOW_NOTICE`].
    OverflowMarker,
}

// ============================================================================
// Sink Commands
// ============================================================================

/// Display mutations, serialized through the sink dispatch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCommand {
    /// Append a pre-joined batch of lines to the display.
    AppendBatch(String),
    /// Wipe the entire displayed content.
    ClearAll,
    /// Reposition the view at the end of the content.
    ScrollToEnd,
    /// Enable or disable the "kill process" affordance.
    SetKillEnabled(bool),
}
