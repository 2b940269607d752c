//! Drives one chaincode stream: the registration handshake with the peer,
//! then dispatch of INIT and TRANSACTION requests to the chaincode.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncRead, AsyncWrite, WriteHalf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{Result, ShimError};
use crate::rpc::codec::{self, read_message, write_message};
use crate::rpc::model::{ChaincodeId, ChaincodeInput, ChaincodeMessage, MessageKind};
use crate::shim::{Chaincode, ChaincodeStub, Response, ERROR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Created,
    Established,
    Ready,
}

pub struct Handler {
    chaincode: Arc<dyn Chaincode>,
    state: State,
    outbound: mpsc::UnboundedSender<ChaincodeMessage>,
    in_flight: Arc<Mutex<HashSet<(String, String)>>>,
}

/// Registers `name` over `stream` and serves requests until the stream ends.
pub async fn serve<S>(stream: S, name: &str, chaincode: Arc<dyn Chaincode>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, writer) = tokio::io::split(stream);
    let (outbound, rx) = mpsc::unbounded_channel();
    let mut writer_task = tokio::spawn(write_loop(writer, rx));

    let mut handler = Handler {
        chaincode,
        state: State::Created,
        outbound,
        in_flight: Arc::default(),
    };
    let id = ChaincodeId {
        name: name.to_string(),
    };
    handler.send(ChaincodeMessage::new(MessageKind::Register, "", "").with_payload(codec::encode(&id)?))?;
    debug!("sent REGISTER for {}", name);

    loop {
        tokio::select! {
            written = &mut writer_task => {
                return match written {
                    Ok(Ok(())) => Err(ShimError::StreamClosed),
                    Ok(Err(err)) => Err(err),
                    Err(err) => Err(ShimError::Protocol(err.to_string())),
                };
            }
            msg = read_message(&mut reader) => {
                match msg {
                    Ok(Some(msg)) => {
                        if let Err(err) = handler.handle(msg) {
                            writer_task.abort();
                            return Err(err);
                        }
                    }
                    Ok(None) => {
                        writer_task.abort();
                        return Err(ShimError::StreamClosed);
                    }
                    Err(err) => {
                        writer_task.abort();
                        return Err(err);
                    }
                }
            }
        }
    }
}

async fn write_loop<S>(
    mut writer: WriteHalf<S>,
    mut rx: mpsc::UnboundedReceiver<ChaincodeMessage>,
) -> Result<()>
where
    S: AsyncWrite,
{
    while let Some(msg) = rx.recv().await {
        write_message(&mut writer, &msg).await?;
    }
    Ok(())
}

impl Handler {
    #[cfg(test)]
    fn state(&self) -> State {
        self.state
    }

    fn send(&self, msg: ChaincodeMessage) -> Result<()> {
        self.outbound.send(msg).map_err(|_| ShimError::StreamClosed)
    }

    fn handle(&mut self, msg: ChaincodeMessage) -> Result<()> {
        debug!("[{}] received {:?} in state {:?}", short_txid(&msg.txid), msg.kind, self.state);

        if msg.kind == MessageKind::Keepalive {
            return self.send(msg);
        }

        match (self.state, msg.kind) {
            (State::Created, MessageKind::Registered) => {
                self.state = State::Established;
                Ok(())
            }
            (State::Established, MessageKind::Ready) => {
                self.state = State::Ready;
                info!("chaincode registered and ready");
                Ok(())
            }
            (State::Created | State::Established, MessageKind::Error) => Err(ShimError::Registration(
                String::from_utf8_lossy(&msg.payload).into_owned(),
            )),
            (State::Ready, MessageKind::Init | MessageKind::Transaction) => self.dispatch(msg),
            (State::Ready, MessageKind::Error) => {
                warn!(
                    "[{}] peer reported error: {}",
                    short_txid(&msg.txid),
                    String::from_utf8_lossy(&msg.payload)
                );
                Ok(())
            }
            (state, kind) => {
                let reason = format!("unexpected message {:?} in state {:?}", kind, state);
                warn!("[{}] {}", short_txid(&msg.txid), reason);
                self.send(msg.error_reply(&reason))
            }
        }
    }

    fn dispatch(&self, msg: ChaincodeMessage) -> Result<()> {
        let key = (msg.channel_id.clone(), msg.txid.clone());
        let fresh = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        if !fresh {
            let reason = format!("duplicate transaction {}", msg.txid);
            warn!("[{}] {}", short_txid(&msg.txid), reason);
            return self.send(msg.error_reply(&reason));
        }

        let chaincode = Arc::clone(&self.chaincode);
        let outbound = self.outbound.clone();
        let in_flight = Arc::clone(&self.in_flight);
        tokio::task::spawn_blocking(move || {
            let reply = execute(chaincode.as_ref(), &msg);
            in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
            if outbound.send(reply).is_err() {
                debug!("[{}] stream closed before reply was sent", short_txid(&msg.txid));
            }
        });
        Ok(())
    }
}

/// Runs `init` or `invoke` for `msg` and builds the reply frame.
fn execute(chaincode: &dyn Chaincode, msg: &ChaincodeMessage) -> ChaincodeMessage {
    let input: ChaincodeInput = match codec::decode(&msg.payload) {
        Ok(input) => input,
        Err(err) => return msg.error_reply(&err.to_string()),
    };
    let stub = ChaincodeStub::new(msg.txid.clone(), msg.channel_id.clone(), input.into_args());

    let called = panic::catch_unwind(AssertUnwindSafe(|| match msg.kind {
        MessageKind::Init => chaincode.init(&stub),
        _ => chaincode.invoke(&stub),
    }));
    let response: Response = match called {
        Ok(response) => response,
        Err(_) => {
            error!("[{}] chaincode panicked handling {:?}", short_txid(&msg.txid), msg.kind);
            return msg.error_reply("chaincode panicked");
        }
    };
    if response.status >= ERROR {
        return msg.error_reply(&response.message);
    }

    match codec::encode(&response) {
        Ok(payload) => ChaincodeMessage::new(MessageKind::Completed, msg.txid.clone(), msg.channel_id.clone())
            .with_payload(payload),
        Err(err) => msg.error_reply(&err.to_string()),
    }
}

fn short_txid(txid: &str) -> &str {
    txid.get(..8).unwrap_or(txid)
}
