/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Dialing the remote endpoint failed (DNS, TCP, TLS or the
    /// WebSocket upgrade).
    #[error("connect to {url} failed: {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection was closed while an operation was in flight.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// No frame arrived within the configured read timeout.
    #[error("no frame received within {0:?}")]
    TimedOut(std::time::Duration),
}
