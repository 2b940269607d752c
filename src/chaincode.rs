use tracing::info;

use crate::shim::{Chaincode, ChaincodeStub, Response};

/// Placeholder contract: both callbacks answer with a fixed success
/// response and never touch the ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleChaincode;

impl Chaincode for SimpleChaincode {
    fn init(&self, stub: &ChaincodeStub) -> Response {
        println!("Hello Init");
        info!(txid = stub.tx_id(), "init called");
        Response::success("Init called")
    }

    fn invoke(&self, stub: &ChaincodeStub) -> Response {
        println!("Hello Invoke");
        info!(txid = stub.tx_id(), "invoke called");
        Response::success("Invoke")
    }
}
