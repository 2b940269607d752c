//! The contract surface a chaincode implements, and the seam through which
//! it is handed to the peer-side runtime.

mod response;
mod stub;

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::error::Result;

pub use response::{Response, ERROR, ERROR_THRESHOLD, OK};
pub use stub::ChaincodeStub;

/// A chaincode answers the two lifecycle callbacks routed to it by the peer.
///
/// Both callbacks are total: failures are expressed as an error `Response`,
/// never as a Rust error or panic.
pub trait Chaincode: Send + Sync + 'static {
    /// Called once when the chaincode is instantiated or upgraded.
    fn init(&self, stub: &ChaincodeStub) -> Response;

    /// Called for every transaction routed to this chaincode.
    fn invoke(&self, stub: &ChaincodeStub) -> Response;
}

/// Host runtime that registers a chaincode and serves requests for it.
///
/// `serve` only returns when the runtime stops, which is always an error.
pub trait Runtime {
    fn serve(self, chaincode: Arc<dyn Chaincode>) -> impl Future<Output = Result<()>> + Send;
}

/// Registers `chaincode` with `runtime` and serves until the runtime fails.
pub async fn start<R, C>(runtime: R, chaincode: C) -> Result<()>
where
    R: Runtime,
    C: Chaincode,
{
    info!("starting chaincode");
    let result = runtime.serve(Arc::new(chaincode)).await;
    if let Err(err) = &result {
        error!("Error starting chaincode: {}", err);
    }
    result
}
