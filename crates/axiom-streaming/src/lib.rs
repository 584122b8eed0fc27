//! # axiom-streaming
//!
//! Protocol-agnostic streaming handlers.
//!
//! A handler is written once against one of four contracts (unary, server
//! stream, client stream, bidirectional) and wrapped in a
//! [`StreamingEndpoint`]. Transport adapters read the endpoint's
//! [`StreamingMode`] to choose their framing (SSE, WebSocket, gRPC) and
//! drive it through [`StreamingEndpoint::invoke`].
//!
//! Cancellation is cooperative: one [`Cancellation`] signal is threaded
//! through every suspension point of a call, and a cancelled call ends
//! without producing a [`StreamError`].
//!
//! ## Example
//!
//! ```
//! use axiom_streaming::{Cancellation, StreamingEndpoint, StreamingMode};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let echo = StreamingEndpoint::<String, String>::bidirectional(|requests, _cancel| {
//!     requests.map(|message| message.map(|text| text.to_uppercase()))
//! });
//! assert_eq!(echo.mode(), StreamingMode::Bidirectional);
//!
//! let inbound = Box::pin(stream::iter(vec![Ok("hi".to_string()), Ok("there".to_string())]));
//! let replies: Vec<_> = echo.invoke(inbound, Cancellation::new()).collect().await;
//! assert_eq!(replies, [Ok("HI".to_string()), Ok("THERE".to_string())]);
//! # }
//! ```

mod backpressure;
mod batch;
mod cancel;
mod error;
mod handler;
mod mode;
mod options;
mod stream;

pub use backpressure::{backpressure, Backpressure};
pub use batch::batch;
pub use cancel::Cancellation;
pub use error::{Outcome, Result, StreamError};
pub use handler::{
    validate_request, BidirectionalHandler, ClientStreamHandler, ServerStreamHandler,
    StreamingEndpoint, UnaryHandler, ValidateRequest,
};
pub use mode::{StreamingMode, Transport};
pub use options::StreamOptions;
pub use stream::{
    collect_requests, with_cancellation, BoxFuture, BoxStream, RequestStream, ResponseStream,
};
