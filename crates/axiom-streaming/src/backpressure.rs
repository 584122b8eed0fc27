//! Bounded buffering between a producer and a slower consumer.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, trace};

use crate::cancel::Cancellation;

/// A stream fed by a background producer through a bounded buffer.
///
/// The producer suspends while the buffer holds `capacity` elements.
/// Dropping this stream, or cancelling the signal it was created with,
/// stops the producer and drops the source.
#[derive(Debug)]
pub struct Backpressure<T> {
    receiver: ReceiverStream<T>,
    cancel: Cancellation,
    stop: Cancellation,
    producer: JoinHandle<()>,
}

/// Decouples `source` from its consumer with a buffer of `capacity` elements.
///
/// Must be called within a Tokio runtime. A `capacity` of zero is treated
/// as one.
pub fn backpressure<S>(source: S, capacity: usize, cancel: Cancellation) -> Backpressure<S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    let stop = Cancellation::new();
    let producer = tokio::spawn(produce(source, tx, cancel.clone(), stop.clone()));
    debug!(capacity, "backpressure producer started");

    Backpressure {
        receiver: ReceiverStream::new(rx),
        cancel,
        stop,
        producer,
    }
}

async fn produce<S>(source: S, tx: mpsc::Sender<S::Item>, cancel: Cancellation, stop: Cancellation)
where
    S: Stream,
{
    let mut source = std::pin::pin!(source);
    let mut sent = 0usize;
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = stop.cancelled() => break,
            () = tx.closed() => break,
            item = source.next() => item,
        };
        let Some(item) = next else {
            break;
        };

        // Suspends while the buffer is full.
        let delivered = tokio::select! {
            biased;
            () = cancel.cancelled() => false,
            () = stop.cancelled() => false,
            result = tx.send(item) => result.is_ok(),
        };
        if !delivered {
            break;
        }
        sent += 1;
    }
    trace!(sent, "backpressure producer finished");
}

impl<T> Backpressure<T> {
    /// Returns the number of elements waiting in the buffer.
    pub fn buffered(&self) -> usize {
        self.receiver.as_ref().len()
    }

    /// Returns whether the producer task has exited.
    pub fn is_producer_finished(&self) -> bool {
        self.producer.is_finished()
    }
}

impl<T> Stream for Backpressure<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        if this.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        Pin::new(&mut this.receiver).poll_next(cx)
    }
}

impl<T> Drop for Backpressure<T> {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}
