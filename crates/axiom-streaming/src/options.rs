//! Tunables for batching and buffering.

use std::time::Duration;

use futures::Stream;
use serde::Deserialize;

use crate::backpressure::{backpressure, Backpressure};
use crate::batch::batch;
use crate::cancel::Cancellation;

/// Streaming options, typically loaded from application configuration.
///
/// ```
/// use axiom_streaming::StreamOptions;
///
/// let options: StreamOptions = serde_json::from_str(r#"{"batch_size": 10}"#).unwrap();
/// assert_eq!(options.batch_size, 10);
/// assert_eq!(options.wait().as_millis(), 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    /// Maximum elements per batch.
    pub batch_size: usize,
    /// Maximum time a partial batch waits after its first element, in milliseconds.
    pub max_wait_ms: u64,
    /// Elements buffered ahead of a slow consumer.
    pub buffer_capacity: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_wait_ms: 1_000,
            buffer_capacity: 64,
        }
    }
}

impl StreamOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch size.
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the batch wait.
    #[must_use]
    pub fn max_wait(mut self, wait: Duration) -> Self {
        self.max_wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the buffer capacity.
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Returns the batch wait as a duration.
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    /// Batches `source` with these options.
    pub fn batch<S>(&self, source: S, cancel: Cancellation) -> impl Stream<Item = Vec<S::Item>> + Send
    where
        S: Stream + Send,
        S::Item: Send,
    {
        batch(source, self.batch_size, self.wait(), cancel)
    }

    /// Buffers `source` with these options.
    pub fn backpressure<S>(&self, source: S, cancel: Cancellation) -> Backpressure<S::Item>
    where
        S: Stream + Send + 'static,
        S::Item: Send + 'static,
    {
        backpressure(source, self.buffer_capacity, cancel)
    }
}
