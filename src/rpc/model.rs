use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Register,
    Registered,
    Ready,
    Init,
    Transaction,
    Completed,
    Error,
    Keepalive,
}

/// A single frame on the peer/chaincode stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeMessage {
    pub kind: MessageKind,
    pub txid: String,
    pub channel_id: String,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl ChaincodeMessage {
    pub fn new(kind: MessageKind, txid: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            kind,
            txid: txid.into(),
            channel_id: channel_id.into(),
            payload: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// An ERROR reply to `self`, carrying `reason` as text.
    pub fn error_reply(&self, reason: &str) -> Self {
        Self::new(MessageKind::Error, self.txid.clone(), self.channel_id.clone())
            .with_payload(reason.as_bytes().to_vec())
    }
}

/// REGISTER payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeId {
    pub name: String,
}

/// INIT and TRANSACTION payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ChaincodeInput {
    pub args: Vec<serde_bytes::ByteBuf>,
}

impl ChaincodeInput {
    pub fn from_args<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Vec<u8>>,
    {
        Self {
            args: args
                .into_iter()
                .map(|arg| serde_bytes::ByteBuf::from(arg.into()))
                .collect(),
        }
    }

    pub fn into_args(self) -> Vec<Vec<u8>> {
        self.args.into_iter().map(|arg| arg.into_vec()).collect()
    }
}
