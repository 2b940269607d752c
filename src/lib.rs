pub mod chaincode;
pub mod config;
pub mod error;
pub mod rpc;
pub mod shim;

pub use chaincode::SimpleChaincode;
pub use error::{Result, ShimError};
