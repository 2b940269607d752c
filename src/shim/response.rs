use serde::{Deserialize, Serialize};

/// Status code of a successful response.
pub const OK: i32 = 200;
/// Status codes at or above this value are errors.
pub const ERROR_THRESHOLD: i32 = 400;
/// Status code of a failed response.
pub const ERROR: i32 = 500;

/// Result of an `init` or `invoke` call, handed back to the peer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub status: i32,
    pub message: String,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status >= ERROR_THRESHOLD
    }
}
