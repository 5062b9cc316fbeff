use thiserror::Error;

/// [Result] alias for return types of the crate API
pub type Result<T> = std::result::Result<T, Error>;

/// Error enum type
#[derive(Error, Debug)]
pub enum Error {
    /// The drone answered a command with `error` or `unactive`. The string
    /// contains the full answer.
    #[error("command refused by the drone: {0}")]
    CommandFailed(String),
    /// Unexpected answer from the drone. The string contains the reason.
    #[error("protocol error: {0}")]
    ProtocolError(String),
    /// An argument is outside the range accepted by the firmware.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Command requires hardware that is not connected, for example the RMTT
    /// expansion board.
    #[error("not supported: {0}")]
    NotSupported(String),
    /// The drone did not answer within the configured response timeout.
    #[error("no answer from the drone within the response timeout")]
    Timeout,
    /// The [Tello](crate::Tello) object is currently disconnected.
    #[error("disconnected")]
    Disconnected,
    /// Error from the UDP sockets.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<flume::RecvError> for Error {
    fn from(_: flume::RecvError) -> Self {
        Error::Disconnected
    }
}

impl<T> From<flume::SendError<T>> for Error {
    fn from(_: flume::SendError<T>) -> Self {
        Error::Disconnected
    }
}
