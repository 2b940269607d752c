use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, ShimError};
use crate::rpc::handler;
use crate::shim::{Chaincode, Runtime};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Runtime that dials the peer's chaincode endpoint over TCP.
#[derive(Debug, Clone)]
pub struct PeerRuntime {
    name: String,
    address: String,
}

impl PeerRuntime {
    pub fn new(config: &Config) -> Self {
        Self {
            name: config.chaincode_id_name.clone(),
            address: config.peer_address.clone(),
        }
    }
}

impl Runtime for PeerRuntime {
    async fn serve(self, chaincode: Arc<dyn Chaincode>) -> Result<()> {
        info!("connecting to peer at {}", self.address);
        let socket = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.address))
            .await
            .map_err(|_| ShimError::ConnectTimeout(self.address.clone()))??;
        socket.set_nodelay(true)?;
        handler::serve(socket, &self.name, chaincode).await
    }
}
