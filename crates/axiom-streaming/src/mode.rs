//! Interaction modes and the transports that can carry them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How requests and responses flow for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamingMode {
    /// One request, one response.
    Unary,
    /// One request, a lazy sequence of responses.
    ServerStream,
    /// A sequence of requests, one response.
    ClientStream,
    /// Independent request and response sequences.
    Bidirectional,
}

impl StreamingMode {
    /// All modes, in increasing order of generality.
    pub const ALL: [Self; 4] = [
        Self::Unary,
        Self::ServerStream,
        Self::ClientStream,
        Self::Bidirectional,
    ];

    /// Returns whether the client sends more than one message.
    pub fn is_client_streaming(self) -> bool {
        matches!(self, Self::ClientStream | Self::Bidirectional)
    }

    /// Returns whether the server sends more than one message.
    pub fn is_server_streaming(self) -> bool {
        matches!(self, Self::ServerStream | Self::Bidirectional)
    }

    /// Returns the transports able to carry this mode.
    pub fn transports(self) -> Vec<Transport> {
        Transport::ALL
            .into_iter()
            .filter(|transport| transport.supports(self))
            .collect()
    }

    /// Returns the mode name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unary => "unary",
            Self::ServerStream => "server_stream",
            Self::ClientStream => "client_stream",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for StreamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wire protocol a transport adapter speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Plain request/response HTTP.
    Http,
    /// Server-sent events: a single request with a pushed response stream.
    ServerSentEvents,
    /// A full-duplex WebSocket connection.
    WebSocket,
    /// gRPC over HTTP/2.
    Grpc,
}

impl Transport {
    /// All transports.
    pub const ALL: [Self; 4] = [Self::Http, Self::ServerSentEvents, Self::WebSocket, Self::Grpc];

    /// Returns whether this transport can carry the given mode.
    pub fn supports(self, mode: StreamingMode) -> bool {
        match self {
            Self::Http => mode == StreamingMode::Unary,
            Self::ServerSentEvents => !mode.is_client_streaming(),
            Self::WebSocket | Self::Grpc => true,
        }
    }

    /// Returns the transport name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::ServerSentEvents => "sse",
            Self::WebSocket => "websocket",
            Self::Grpc => "grpc",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flags() {
        assert!(!StreamingMode::Unary.is_client_streaming());
        assert!(!StreamingMode::Unary.is_server_streaming());
        assert!(StreamingMode::ServerStream.is_server_streaming());
        assert!(StreamingMode::ClientStream.is_client_streaming());
        assert!(StreamingMode::Bidirectional.is_client_streaming());
        assert!(StreamingMode::Bidirectional.is_server_streaming());
    }

    #[test]
    fn test_transport_support() {
        assert_eq!(
            StreamingMode::Unary.transports(),
            Transport::ALL.to_vec()
        );
        assert_eq!(
            StreamingMode::ServerStream.transports(),
            [Transport::ServerSentEvents, Transport::WebSocket, Transport::Grpc]
        );
        assert_eq!(
            StreamingMode::ClientStream.transports(),
            [Transport::WebSocket, Transport::Grpc]
        );
        assert_eq!(
            StreamingMode::Bidirectional.transports(),
            [Transport::WebSocket, Transport::Grpc]
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&StreamingMode::ServerStream).unwrap(),
            "\"server_stream\""
        );
        let transport: Transport = serde_json::from_str("\"web_socket\"").unwrap();
        assert_eq!(transport, Transport::WebSocket);
        assert_eq!(Transport::WebSocket.to_string(), "websocket");
    }
}
