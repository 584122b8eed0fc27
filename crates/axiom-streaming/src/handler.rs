//! The four handler contracts and their mode-tagged wrapper.
//!
//! A transport adapter never needs to know which contract a handler
//! implements: [`StreamingEndpoint::invoke`] always takes a request stream
//! and returns a response stream. The adapter only consults
//! [`StreamingEndpoint::mode`] to pick its framing.

use std::future::Future;
use std::sync::Arc;

use async_stream::stream;
use futures::{Stream, StreamExt};
use tracing::debug;

use crate::cancel::Cancellation;
use crate::error::{Outcome, Result, StreamError};
use crate::mode::StreamingMode;
use crate::stream::{with_cancellation, BoxFuture, RequestStream, ResponseStream};

/// One request, one response.
pub trait UnaryHandler<Req, Resp>: Send + Sync {
    /// Handles a single request.
    fn handle(&self, request: Req, cancel: Cancellation) -> BoxFuture<'_, Outcome<Resp>>;
}

/// One request, a lazy sequence of responses.
///
/// An `Err` item ends the sequence. Cancellation ends it without an error.
pub trait ServerStreamHandler<Req, Resp>: Send + Sync {
    /// Starts a fresh response sequence for the request.
    fn stream(&self, request: Req, cancel: Cancellation) -> ResponseStream<Resp>;
}

/// A sequence of requests, one response.
///
/// An inbound `Err` item must surface as [`Outcome::Failed`], never as a
/// partial success.
pub trait ClientStreamHandler<Req, Resp>: Send + Sync {
    /// Consumes the request sequence and produces a single result.
    fn handle(&self, requests: RequestStream<Req>, cancel: Cancellation)
        -> BoxFuture<'_, Outcome<Resp>>;
}

/// Independent request and response sequences.
pub trait BidirectionalHandler<Req, Resp>: Send + Sync {
    /// Maps the request sequence to a response sequence.
    fn stream(&self, requests: RequestStream<Req>, cancel: Cancellation) -> ResponseStream<Resp>;
}

/// Request-level validation run by handlers before doing any work.
///
/// # Example
///
/// ```
/// use axiom_streaming::{validate_request, StreamError, ValidateRequest};
///
/// struct Subscribe {
///     topic: String,
/// }
///
/// impl ValidateRequest for Subscribe {
///     fn validate(&self) -> Result<(), StreamError> {
///         if self.topic.is_empty() {
///             return Err(StreamError::Validation("topic is required".into()));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(validate_request(&Subscribe { topic: "orders".into() }).is_ok());
/// assert!(validate_request(&Subscribe { topic: String::new() }).is_err());
/// ```
pub trait ValidateRequest {
    /// Checks the request, returning [`StreamError::Validation`] on failure.
    fn validate(&self) -> Result<()>;
}

/// Runs a request's validation.
pub fn validate_request<T: ValidateRequest + ?Sized>(request: &T) -> Result<()> {
    request.validate()
}

/// A handler tagged with its interaction mode.
pub enum StreamingEndpoint<Req, Resp> {
    /// One request, one response.
    Unary(Arc<dyn UnaryHandler<Req, Resp>>),
    /// One request, a response stream.
    ServerStream(Arc<dyn ServerStreamHandler<Req, Resp>>),
    /// A request stream, one response.
    ClientStream(Arc<dyn ClientStreamHandler<Req, Resp>>),
    /// A request stream mapped to a response stream.
    Bidirectional(Arc<dyn BidirectionalHandler<Req, Resp>>),
}

impl<Req, Resp> Clone for StreamingEndpoint<Req, Resp> {
    fn clone(&self) -> Self {
        match self {
            Self::Unary(h) => Self::Unary(Arc::clone(h)),
            Self::ServerStream(h) => Self::ServerStream(Arc::clone(h)),
            Self::ClientStream(h) => Self::ClientStream(Arc::clone(h)),
            Self::Bidirectional(h) => Self::Bidirectional(Arc::clone(h)),
        }
    }
}

impl<Req, Resp> std::fmt::Debug for StreamingEndpoint<Req, Resp> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StreamingEndpoint").field(&self.mode()).finish()
    }
}

impl<Req, Resp> StreamingEndpoint<Req, Resp> {
    /// Returns the interaction mode.
    pub fn mode(&self) -> StreamingMode {
        match self {
            Self::Unary(_) => StreamingMode::Unary,
            Self::ServerStream(_) => StreamingMode::ServerStream,
            Self::ClientStream(_) => StreamingMode::ClientStream,
            Self::Bidirectional(_) => StreamingMode::Bidirectional,
        }
    }
}

impl<Req, Resp> StreamingEndpoint<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Wraps an async function as a unary handler.
    pub fn unary<F, Fut>(f: F) -> Self
    where
        F: Fn(Req, Cancellation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<Resp>> + Send + 'static,
    {
        Self::Unary(Arc::new(HandlerFn(f)))
    }

    /// Wraps a stream-returning function as a server-stream handler.
    pub fn server_stream<F, S>(f: F) -> Self
    where
        F: Fn(Req, Cancellation) -> S + Send + Sync + 'static,
        S: Stream<Item = Result<Resp>> + Send + 'static,
    {
        Self::ServerStream(Arc::new(HandlerFn(f)))
    }

    /// Wraps an async function as a client-stream handler.
    pub fn client_stream<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestStream<Req>, Cancellation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<Resp>> + Send + 'static,
    {
        Self::ClientStream(Arc::new(HandlerFn(f)))
    }

    /// Wraps a stream-mapping function as a bidirectional handler.
    pub fn bidirectional<F, S>(f: F) -> Self
    where
        F: Fn(RequestStream<Req>, Cancellation) -> S + Send + Sync + 'static,
        S: Stream<Item = Result<Resp>> + Send + 'static,
    {
        Self::Bidirectional(Arc::new(HandlerFn(f)))
    }

    /// Runs the handler over a uniform request/response stream pair.
    ///
    /// Unary and server-stream handlers read only the first request; an
    /// empty request stream is a validation failure. The response stream
    /// ends after the first `Err` item and ends silently on cancellation.
    pub fn invoke(&self, requests: RequestStream<Req>, cancel: Cancellation) -> ResponseStream<Resp> {
        debug!(mode = %self.mode(), "invoking streaming endpoint");
        match self {
            Self::Unary(handler) => {
                let handler = Arc::clone(handler);
                Box::pin(stream! {
                    match first_request(requests, &cancel).await {
                        Outcome::Completed(request) => {
                            if let Some(result) = handler.handle(request, cancel.clone()).await.into_result() {
                                yield result;
                            }
                        }
                        Outcome::Failed(err) => {
                            yield Err(err);
                        }
                        Outcome::Cancelled => {}
                    }
                })
            }
            Self::ServerStream(handler) => {
                let handler = Arc::clone(handler);
                Box::pin(stream! {
                    match first_request(requests, &cancel).await {
                        Outcome::Completed(request) => {
                            let responses = handler.stream(request, cancel.clone());
                            let mut responses = Box::pin(with_cancellation(responses, cancel.clone()));
                            while let Some(item) = responses.next().await {
                                let failed = item.is_err();
                                yield item;
                                if failed {
                                    break;
                                }
                            }
                        }
                        Outcome::Failed(err) => {
                            yield Err(err);
                        }
                        Outcome::Cancelled => {}
                    }
                })
            }
            Self::ClientStream(handler) => {
                let handler = Arc::clone(handler);
                Box::pin(stream! {
                    if let Some(result) = handler.handle(requests, cancel.clone()).await.into_result() {
                        yield result;
                    }
                })
            }
            Self::Bidirectional(handler) => {
                let responses = handler.stream(requests, cancel.clone());
                Box::pin(terminate_on_error(with_cancellation(responses, cancel)))
            }
        }
    }
}

async fn first_request<Req>(mut requests: RequestStream<Req>, cancel: &Cancellation) -> Outcome<Req> {
    let next = tokio::select! {
        biased;
        () = cancel.cancelled() => return Outcome::Cancelled,
        item = requests.next() => item,
    };
    match next {
        Some(Ok(request)) => Outcome::Completed(request),
        Some(Err(err)) => Outcome::Failed(err),
        None => Outcome::Failed(StreamError::Validation(
            "expected a request message".to_string(),
        )),
    }
}

fn terminate_on_error<S, T>(responses: S) -> impl Stream<Item = Result<T>> + Send
where
    S: Stream<Item = Result<T>> + Send,
    T: Send,
{
    stream! {
        let mut responses = Box::pin(responses);
        while let Some(item) = responses.next().await {
            let failed = item.is_err();
            yield item;
            if failed {
                break;
            }
        }
    }
}

struct HandlerFn<F>(F);

impl<Req, Resp, F, Fut> UnaryHandler<Req, Resp> for HandlerFn<F>
where
    F: Fn(Req, Cancellation) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome<Resp>> + Send + 'static,
{
    fn handle(&self, request: Req, cancel: Cancellation) -> BoxFuture<'_, Outcome<Resp>> {
        Box::pin((self.0)(request, cancel))
    }
}

impl<Req, Resp, F, S> ServerStreamHandler<Req, Resp> for HandlerFn<F>
where
    F: Fn(Req, Cancellation) -> S + Send + Sync,
    S: Stream<Item = Result<Resp>> + Send + 'static,
{
    fn stream(&self, request: Req, cancel: Cancellation) -> ResponseStream<Resp> {
        Box::pin((self.0)(request, cancel))
    }
}

impl<Req, Resp, F, Fut> ClientStreamHandler<Req, Resp> for HandlerFn<F>
where
    F: Fn(RequestStream<Req>, Cancellation) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome<Resp>> + Send + 'static,
{
    fn handle(
        &self,
        requests: RequestStream<Req>,
        cancel: Cancellation,
    ) -> BoxFuture<'_, Outcome<Resp>> {
        Box::pin((self.0)(requests, cancel))
    }
}

impl<Req, Resp, F, S> BidirectionalHandler<Req, Resp> for HandlerFn<F>
where
    F: Fn(RequestStream<Req>, Cancellation) -> S + Send + Sync,
    S: Stream<Item = Result<Resp>> + Send + 'static,
{
    fn stream(&self, requests: RequestStream<Req>, cancel: Cancellation) -> ResponseStream<Resp> {
        Box::pin((self.0)(requests, cancel))
    }
}
