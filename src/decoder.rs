//! Incremental UTF-8 decoding for streamed response bodies.
//!
//! Network chunks are cut wherever the transport pleases, so a multi-byte
//! character may arrive in two (or more) pieces. [`Utf8Decoder`] holds back
//! an incomplete trailing sequence until the next chunk completes it.

/// Stateful UTF-8 decoder fed one chunk at a time, in arrival order.
///
/// Invalid sequences are replaced with `U+FFFD` instead of failing, and an
/// unfinished sequence at the end of a chunk is kept for the next call.
///
/// # Example
/// ```
/// use focusflow_ai::decoder::Utf8Decoder;
///
/// let mut decoder = Utf8Decoder::new();
/// let bytes = "zażółć".as_bytes();
///
/// let mut text = decoder.decode(&bytes[..3]);
/// text.push_str(&decoder.decode(&bytes[3..]));
/// text.push_str(&decoder.finish());
/// assert_eq!(text, "zażółć");
/// ```
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder with no buffered bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        if self.pending.is_empty() {
            return self.decode_from(chunk);
        }

        let mut joined = std::mem::take(&mut self.pending);
        joined.extend_from_slice(chunk);
        self.decode_from(&joined)
    }

    /// Flush at end of stream. A still-incomplete tail becomes `U+FFFD`.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let tail = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&tail).into_owned()
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn decode_from(&mut self, mut bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());

        loop {
            match std::str::from_utf8(bytes) {
                Ok(valid) => {
                    out.push_str(valid);
                    return out;
                }
                Err(err) => {
                    let (valid, rest) = bytes.split_at(err.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            bytes = &rest[bad..];
                        }
                        None => {
                            // Truncated sequence at the end; wait for more bytes.
                            self.pending.extend_from_slice(rest);
                            return out;
                        }
                    }
                }
            }
        }
    }
}
