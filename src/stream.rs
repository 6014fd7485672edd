//! Streaming chat consumption.
//!
//! A [`StreamSession`] pulls chunks from a [`ChunkSource`], decodes them with
//! [`Utf8Decoder`], frames events with [`EventFramer`] and interprets each
//! `data: ` payload. Content fragments are pushed to the caller as they
//! arrive; the session ends in exactly one [`StreamEnd`] or error.
//!
//! [`StreamCallbacks`] layers the callback contract on top: `on_chunk` for
//! every fragment, then at most one of `on_complete` / `on_error`. Without an
//! `on_error` callback, errors are returned to the caller instead.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::ClientError;
use crate::decoder::Utf8Decoder;
use crate::payload::ParsedPayload;
use crate::source::{ChunkSource, SourceGuard};
use crate::sse::{is_keep_alive_noise, parse_sse_event, EventFramer};

/// Longest event excerpt written to the log for malformed payloads.
const LOG_PREVIEW_CHARS: usize = 100;

/// How a stream ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// `[DONE]`, `{"done": true}` or the body simply ended.
    Completed,
    /// The caller's cancellation token fired. No terminal callback runs.
    Cancelled,
    /// The error was handed to `on_error` instead of being returned.
    Failed,
}

/// Counters for one session, logged when it ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks: usize,
    pub bytes: usize,
    pub events: usize,
    pub fragments: usize,
    pub malformed: usize,
    /// Bytes of an unterminated trailing event dropped at end of body.
    pub discarded: usize,
}

/// State for consuming one streamed response.
///
/// Sessions are single-use: once a terminal outcome is reached, further
/// [`run`](Self::run) calls fail with [`ClientError::SessionFinished`].
#[derive(Debug, Default)]
pub struct StreamSession {
    decoder: Utf8Decoder,
    framer: EventFramer,
    terminal: bool,
    cancel: Option<CancellationToken>,
    stats: StreamStats,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the session when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Consume `source` until a terminal outcome, calling `on_chunk` for each
    /// content fragment in arrival order.
    ///
    /// The source is released exactly once on every path, including a panic
    /// inside `on_chunk`.
    pub async fn run<S: ChunkSource>(
        &mut self,
        source: S,
        on_chunk: &mut (dyn FnMut(&str) + Send),
    ) -> Result<StreamEnd, ClientError> {
        let mut guard = SourceGuard::new(source);
        if self.terminal {
            return Err(ClientError::SessionFinished);
        }

        let started = Instant::now();
        let result = self.pump(&mut guard, on_chunk).await;
        guard.release();
        self.terminal = true;

        match &result {
            Ok(end) => info!(
                outcome = ?end,
                elapsed = ?started.elapsed(),
                chunks = self.stats.chunks,
                bytes = self.stats.bytes,
                events = self.stats.events,
                fragments = self.stats.fragments,
                malformed = self.stats.malformed,
                "AI stream finished"
            ),
            Err(e) => warn!(
                error = %e,
                elapsed = ?started.elapsed(),
                fragments = self.stats.fragments,
                "AI stream failed"
            ),
        }

        result
    }

    async fn pump<S: ChunkSource>(
        &mut self,
        guard: &mut SourceGuard<S>,
        on_chunk: &mut (dyn FnMut(&str) + Send),
    ) -> Result<StreamEnd, ClientError> {
        loop {
            let next = match &self.cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => return Ok(StreamEnd::Cancelled),
                        next = guard.next_chunk() => next,
                    }
                }
                None => guard.next_chunk().await,
            };

            match next {
                Some(Ok(chunk)) => {
                    self.stats.chunks += 1;
                    self.stats.bytes += chunk.len();
                    debug!(bytes = chunk.len(), total = self.stats.bytes, "AI stream chunk");

                    let text = self.decoder.decode(&chunk);
                    self.framer.push(&text);
                    if let Some(end) = self.dispatch_events(on_chunk)? {
                        return Ok(end);
                    }
                }
                Some(Err(e)) => return Err(e),
                None => {
                    let discarded = self.framer.discard_remainder() + self.decoder.pending_len();
                    self.decoder.finish();
                    if discarded > 0 {
                        self.stats.discarded = discarded;
                        warn!(bytes = discarded, "dropping unterminated event at end of AI stream");
                    }
                    return Ok(StreamEnd::Completed);
                }
            }
        }
    }

    /// Interpret every complete event currently buffered.
    fn dispatch_events(
        &mut self,
        on_chunk: &mut (dyn FnMut(&str) + Send),
    ) -> Result<Option<StreamEnd>, ClientError> {
        while let Some(event) = self.framer.next_event() {
            if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                return Ok(Some(StreamEnd::Cancelled));
            }
            self.stats.events += 1;

            let Some(data) = parse_sse_event(&event) else {
                debug!(event = %preview(&event), "ignoring non-data event");
                continue;
            };

            match ParsedPayload::parse(data) {
                ParsedPayload::ContentFragment { text } => {
                    self.stats.fragments += 1;
                    on_chunk(&text);
                }
                ParsedPayload::CompletionSignal => return Ok(Some(StreamEnd::Completed)),
                ParsedPayload::ErrorSignal { message } => return Err(ClientError::InBand(message)),
                ParsedPayload::Empty => {}
                ParsedPayload::Unparseable => {
                    self.stats.malformed += 1;
                    if is_keep_alive_noise(&event) {
                        debug!("skipping keep-alive event");
                    } else {
                        warn!(event = %preview(&event), "failed to parse AI stream event");
                    }
                }
            }
        }
        Ok(None)
    }
}

fn preview(event: &str) -> String {
    event.chars().take(LOG_PREVIEW_CHARS).collect()
}

type ChunkFn<'a> = Box<dyn FnMut(&str) + Send + 'a>;
type ErrorFn<'a> = Box<dyn FnOnce(ClientError) + Send + 'a>;
type CompleteFn<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Caller-supplied handlers for one stream.
///
/// `on_chunk` runs zero or more times, strictly before the single terminal
/// handler. Cancellation runs neither terminal handler.
///
/// # Example
/// ```
/// use focusflow_ai::stream::StreamCallbacks;
///
/// let callbacks = StreamCallbacks::new(|text| print!("{}", text))
///     .on_error(|e| eprintln!("stream failed: {}", e))
///     .on_complete(|| println!());
/// ```
pub struct StreamCallbacks<'a> {
    on_chunk: ChunkFn<'a>,
    on_error: Option<ErrorFn<'a>>,
    on_complete: Option<CompleteFn<'a>>,
}

impl<'a> StreamCallbacks<'a> {
    pub fn new(on_chunk: impl FnMut(&str) + Send + 'a) -> Self {
        Self {
            on_chunk: Box::new(on_chunk),
            on_error: None,
            on_complete: None,
        }
    }

    /// Receive errors here instead of as a returned `Err`.
    pub fn on_error(mut self, on_error: impl FnOnce(ClientError) + Send + 'a) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub fn on_complete(mut self, on_complete: impl FnOnce() + Send + 'a) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Run `session` over `source` and deliver its outcome.
    pub async fn drive<S: ChunkSource>(
        mut self,
        session: &mut StreamSession,
        source: S,
    ) -> Result<StreamEnd, ClientError> {
        let result = session.run(source, &mut *self.on_chunk).await;
        self.finish(result)
    }

    /// Route a terminal outcome to the matching callback.
    ///
    /// Errors are passed to `on_error` when present (yielding
    /// [`StreamEnd::Failed`]) and returned otherwise.
    pub fn finish(self, result: Result<StreamEnd, ClientError>) -> Result<StreamEnd, ClientError> {
        match result {
            Ok(StreamEnd::Completed) => {
                if let Some(on_complete) = self.on_complete {
                    on_complete();
                }
                Ok(StreamEnd::Completed)
            }
            Ok(end) => Ok(end),
            Err(e) => match self.on_error {
                Some(on_error) => {
                    on_error(e);
                    Ok(StreamEnd::Failed)
                }
                None => Err(e),
            },
        }
    }
}

/// Consume a stream into one string.
pub async fn collect_content<S: ChunkSource>(
    session: &mut StreamSession,
    source: S,
) -> Result<String, ClientError> {
    let mut content = String::new();
    let end = session
        .run(source, &mut |text: &str| content.push_str(text))
        .await?;
    match end {
        StreamEnd::Cancelled => Err(ClientError::StreamCancelled),
        _ => Ok(content),
    }
}
