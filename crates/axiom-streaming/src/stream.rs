//! Stream aliases and cancellation-aware helpers.

use std::future::Future;
use std::pin::Pin;

use async_stream::stream;
use futures::{Stream, StreamExt};
use tracing::trace;

use crate::cancel::Cancellation;
use crate::error::{Outcome, Result};

/// Boxed future type for async handler methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Boxed stream type.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// An inbound sequence of requests. An `Err` item means the client side
/// ended abnormally.
pub type RequestStream<T> = BoxStream<'static, Result<T>>;

/// An outbound sequence of responses. An `Err` item is terminal.
pub type ResponseStream<T> = BoxStream<'static, Result<T>>;

/// Ends `source` as soon as `cancel` fires.
///
/// No element is yielded after cancellation is observed, and the stream
/// ends without an error.
pub fn with_cancellation<S>(source: S, cancel: Cancellation) -> impl Stream<Item = S::Item> + Send
where
    S: Stream + Send,
    S::Item: Send,
{
    stream! {
        let mut source = Box::pin(source);
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    trace!("stream cancelled");
                    None
                }
                item = source.next() => item,
            };
            match next {
                Some(item) => yield item,
                None => break,
            }
        }
    }
}

/// Drains a request stream into memory.
///
/// The first `Err` item fails the whole collection. Cancellation yields
/// [`Outcome::Cancelled`] and discards what was read.
pub async fn collect_requests<S, T>(source: S, cancel: &Cancellation) -> Outcome<Vec<T>>
where
    S: Stream<Item = Result<T>>,
{
    let mut source = std::pin::pin!(source);
    let mut items = Vec::new();
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return Outcome::Cancelled,
            item = source.next() => item,
        };
        match next {
            Some(Ok(item)) => items.push(item),
            Some(Err(err)) => return Outcome::Failed(err),
            None => return Outcome::Completed(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::stream;

    use super::*;
    use crate::error::StreamError;

    #[tokio::test]
    async fn test_with_cancellation_passes_items_through() {
        let items: Vec<_> = with_cancellation(stream::iter(1..=3), Cancellation::new())
            .collect()
            .await;
        assert_eq!(items, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_with_cancellation_stops_without_error() {
        let cancel = Cancellation::new();
        let source = stream::iter(1..).then(|n| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            n
        });
        let mut guarded = Box::pin(with_cancellation(source, cancel.clone()));

        assert_eq!(guarded.next().await, Some(1));
        assert_eq!(guarded.next().await, Some(2));
        cancel.cancel();
        assert_eq!(guarded.next().await, None);
    }

    #[tokio::test]
    async fn test_collect_requests() {
        let ok = stream::iter(vec![Ok(1), Ok(2)]);
        assert_eq!(
            collect_requests(ok, &Cancellation::new()).await,
            Outcome::Completed(vec![1, 2])
        );

        let failing = stream::iter(vec![Ok(1), Err(StreamError::Source("reset".into())), Ok(3)]);
        assert_eq!(
            collect_requests(failing, &Cancellation::new()).await,
            Outcome::Failed(StreamError::Source("reset".into()))
        );
    }

    #[tokio::test]
    async fn test_collect_requests_cancelled() {
        let cancel = Cancellation::new();
        cancel.cancel();
        let pending = stream::pending::<Result<i32>>();
        assert_eq!(collect_requests(pending, &cancel).await, Outcome::Cancelled);
    }
}
