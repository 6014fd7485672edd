//! Byte sources feeding a stream session.
//!
//! A [`ChunkSource`] hands out raw body chunks in arrival order. Whatever
//! happens to the session, its [`release`](ChunkSource::release) routine runs
//! exactly once: [`SourceGuard`] owns the source for the session's lifetime
//! and releases it explicitly on every terminal path, or on drop if the
//! session unwinds.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::client::ClientError;

/// Pull-based producer of raw body chunks.
#[async_trait]
pub trait ChunkSource: Send {
    /// Wait for the next chunk. `None` means the body ended normally.
    async fn next_chunk(&mut self) -> Option<Result<Bytes, ClientError>>;

    /// Give the underlying resource back (close the body, free the reader).
    fn release(&mut self);
}

/// A streaming `reqwest` response body.
pub struct ResponseSource {
    response: Option<reqwest::Response>,
}

impl ResponseSource {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            response: Some(response),
        }
    }
}

#[async_trait]
impl ChunkSource for ResponseSource {
    async fn next_chunk(&mut self) -> Option<Result<Bytes, ClientError>> {
        let response = self.response.as_mut()?;
        match response.chunk().await {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => None,
            Err(e) => Some(Err(ClientError::from(e))),
        }
    }

    fn release(&mut self) {
        // Dropping the response closes the connection.
        self.response.take();
    }
}

/// Adapter for any fallible byte stream.
///
/// # Example
/// ```
/// use bytes::Bytes;
/// use focusflow_ai::client::ClientError;
/// use focusflow_ai::source::ByteStreamSource;
///
/// let chunks = vec![Ok::<_, ClientError>(Bytes::from_static(b"data: [DONE]\n\n"))];
/// let source = ByteStreamSource::new(futures::stream::iter(chunks));
/// ```
pub struct ByteStreamSource<S> {
    stream: Option<Pin<Box<S>>>,
}

impl<S> ByteStreamSource<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(Box::pin(stream)),
        }
    }
}

#[async_trait]
impl<S, E> ChunkSource for ByteStreamSource<S>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: Into<ClientError> + Send + 'static,
{
    async fn next_chunk(&mut self) -> Option<Result<Bytes, ClientError>> {
        let stream = self.stream.as_mut()?;
        stream.next().await.map(|item| item.map_err(Into::into))
    }

    fn release(&mut self) {
        self.stream.take();
    }
}

/// Owns a [`ChunkSource`] and guarantees a single release.
pub struct SourceGuard<S: ChunkSource> {
    source: S,
    released: bool,
}

impl<S: ChunkSource> SourceGuard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            released: false,
        }
    }

    /// Next chunk, or `None` once released.
    pub async fn next_chunk(&mut self) -> Option<Result<Bytes, ClientError>> {
        if self.released {
            return None;
        }
        self.source.next_chunk().await
    }

    /// Release the source. Later calls are no-ops.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.source.release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<S: ChunkSource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}
