use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),
    #[error("stream IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode message: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("frame of {0} bytes exceeds the maximum frame size")]
    FrameTooLarge(usize),
    #[error("registration with peer failed: {0}")]
    Registration(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("peer closed the chaincode stream")]
    StreamClosed,
    #[error("timed out connecting to peer at {0}")]
    ConnectTimeout(String),
}

pub type Result<T> = std::result::Result<T, ShimError>;
