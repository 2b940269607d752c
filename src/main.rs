use std::process::ExitCode;

use clap::Parser;
use simple_chaincode::config::Config;
use simple_chaincode::rpc::PeerRuntime;
use simple_chaincode::{shim, SimpleChaincode};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Minimal chaincode process")]
struct Args {
    /// Peer chaincode endpoint, overrides CORE_PEER_ADDRESS
    #[arg(long = "peer.address")]
    peer_address: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.chaincode_logging_level.clone().into()))
        .init();
    info!("configuration loaded for chaincode {}", config.chaincode_id_name);

    let mut config = config;
    if let Some(peer_address) = args.peer_address {
        config.peer_address = peer_address;
    }

    match shim::start(PeerRuntime::new(&config), SimpleChaincode).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
