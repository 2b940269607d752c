/// Per-call transaction context supplied by the peer.
#[derive(Debug, Clone, Default)]
pub struct ChaincodeStub {
    tx_id: String,
    channel_id: String,
    args: Vec<Vec<u8>>,
}

impl ChaincodeStub {
    pub fn new(tx_id: impl Into<String>, channel_id: impl Into<String>, args: Vec<Vec<u8>>) -> Self {
        Self {
            tx_id: tx_id.into(),
            channel_id: channel_id.into(),
            args,
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }

    /// Arguments as strings, invalid UTF-8 replaced.
    pub fn string_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect()
    }

    /// Splits the arguments into the function name (first argument) and
    /// its parameters. No arguments gives an empty name.
    pub fn function_and_parameters(&self) -> (String, Vec<String>) {
        let mut args = self.string_args().into_iter();
        let function = args.next().unwrap_or_default();
        (function, args.collect())
    }
}
