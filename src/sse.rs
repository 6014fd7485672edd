//! Server-Sent Events (SSE) framing for the chat stream.
//!
//! The back-end writes one event per message and terminates each event with a
//! blank line:
//! ```text
//! data: {"content": "Hel"}
//!
//! data: {"content": "lo"}
//!
//! :keep-alive
//!
//! data: [DONE]
//! ```
//!
//! [`EventFramer`] cuts decoded text into those events; the helpers below
//! inspect a single event.

/// Boundary between two events.
pub const EVENT_BOUNDARY: &str = "\n\n";

/// Prefix carried by every event that holds data.
pub const DATA_PREFIX: &str = "data: ";

/// Sentinel that ends the stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Accumulates decoded text and extracts complete events.
///
/// Text after the last boundary stays buffered until a later
/// [`push`](Self::push) completes it. Events come out in arrival order.
///
/// # Example
/// ```
/// use focusflow_ai::sse::EventFramer;
///
/// let mut framer = EventFramer::new();
/// framer.push("data: a\n\ndata: ");
/// assert_eq!(framer.next_event().as_deref(), Some("data: a"));
/// assert_eq!(framer.next_event(), None);
///
/// framer.push("b\n\n");
/// assert_eq!(framer.next_event().as_deref(), Some("data: b"));
/// ```
#[derive(Debug, Default)]
pub struct EventFramer {
    buffer: String,
    /// Bytes of `buffer` already known to hold no boundary.
    scanned: usize,
}

impl EventFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded fragment to the buffer.
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Remove and return the oldest complete event, if one is buffered.
    ///
    /// Only text not searched by an earlier call is scanned, so a long event
    /// arriving in many small pieces stays linear.
    pub fn next_event(&mut self) -> Option<String> {
        let Some(found) = self.buffer.as_bytes()[self.scanned..]
            .windows(EVENT_BOUNDARY.len())
            .position(|w| w == EVENT_BOUNDARY.as_bytes())
        else {
            // Back off one byte: the next push may complete a split boundary.
            self.scanned = self.buffer.len().saturating_sub(EVENT_BOUNDARY.len() - 1);
            return None;
        };

        let pos = self.scanned + found;
        let event = self.buffer[..pos].to_string();
        self.buffer.drain(..pos + EVENT_BOUNDARY.len());
        self.scanned = 0;
        Some(event)
    }

    /// Text waiting for a boundary.
    pub fn remainder(&self) -> &str {
        &self.buffer
    }

    /// Drop the unterminated remainder, returning how many bytes were lost.
    ///
    /// An event without its closing blank line never counts as an event.
    pub fn discard_remainder(&mut self) -> usize {
        let len = self.buffer.len();
        self.buffer.clear();
        self.scanned = 0;
        len
    }
}

/// Extract the payload of a `data: ` event.
///
/// Returns `None` for events without the prefix (comments, keep-alives,
/// other SSE fields).
///
/// # Example
/// ```
/// use focusflow_ai::sse::parse_sse_event;
///
/// let event = "data: {\"key\": \"value\"}";
/// assert_eq!(parse_sse_event(event), Some("{\"key\": \"value\"}"));
///
/// let event = ":keep-alive";
/// assert_eq!(parse_sse_event(event), None);
/// ```
pub fn parse_sse_event(event: &str) -> Option<&str> {
    event.strip_prefix(DATA_PREFIX).map(|s| s.trim())
}

/// Check if an event payload indicates the stream is done.
///
/// # Example
/// ```
/// use focusflow_ai::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker(""));
/// assert!(!is_done_marker("{\"done\": true}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == DONE_MARKER
}

/// Whether an unparseable event is routine noise rather than worth a warning.
pub fn is_keep_alive_noise(event: &str) -> bool {
    event.is_empty() || event.contains("keep-alive")
}
