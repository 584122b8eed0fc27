//! Size- and time-bounded grouping of a stream.

use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};
use tokio::time::Instant;
use tracing::trace;

use crate::cancel::Cancellation;

enum Step<T> {
    Item(T),
    Deadline,
    Exhausted,
    Cancelled,
}

/// Groups `source` into batches of at most `size` elements.
///
/// A batch is emitted when it is full, or when `max_wait` has elapsed since
/// its first element arrived, whichever comes first. A trailing partial
/// batch is emitted when the source ends. Cancellation ends the output
/// immediately and drops any partial batch.
///
/// A `size` of zero is treated as one.
pub fn batch<S>(
    source: S,
    size: usize,
    max_wait: Duration,
    cancel: Cancellation,
) -> impl Stream<Item = Vec<S::Item>> + Send
where
    S: Stream + Send,
    S::Item: Send,
{
    let size = size.max(1);
    stream! {
        let mut source = Box::pin(source);
        let mut pending = Vec::with_capacity(size);
        let mut deadline: Option<Instant> = None;

        loop {
            let wake_at = deadline.unwrap_or_else(Instant::now);
            let step = tokio::select! {
                biased;
                () = cancel.cancelled() => Step::Cancelled,
                () = tokio::time::sleep_until(wake_at), if deadline.is_some() => Step::Deadline,
                item = source.next() => match item {
                    Some(item) => Step::Item(item),
                    None => Step::Exhausted,
                },
            };

            match step {
                Step::Item(item) => {
                    if pending.is_empty() {
                        deadline = Some(Instant::now() + max_wait);
                    }
                    pending.push(item);
                    if pending.len() >= size {
                        deadline = None;
                        trace!(len = pending.len(), "batch full");
                        yield std::mem::replace(&mut pending, Vec::with_capacity(size));
                    }
                }
                Step::Deadline => {
                    deadline = None;
                    if !pending.is_empty() {
                        trace!(len = pending.len(), "batch deadline reached");
                        yield std::mem::replace(&mut pending, Vec::with_capacity(size));
                    }
                }
                Step::Exhausted => {
                    if !pending.is_empty() {
                        trace!(len = pending.len(), "flushing final batch");
                        yield std::mem::take(&mut pending);
                    }
                    break;
                }
                Step::Cancelled => {
                    trace!(dropped = pending.len(), "batching cancelled");
                    break;
                }
            }
        }
    }
}
