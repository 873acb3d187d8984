use chat_core::MessageKind;
use chat_protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the registration; the body says why.
    #[error("registration rejected: {0}")]
    Rejected(String),

    /// The server closed the connection during the handshake.
    #[error("server closed the connection")]
    Closed,

    #[error("unexpected {0:?} during registration")]
    UnexpectedReply(MessageKind),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("actor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
