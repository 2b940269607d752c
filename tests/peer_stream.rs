//! End-to-end tests against an in-process mock peer

use std::collections::HashMap;
use std::time::Duration;

use simple_chaincode::config::Config;
use simple_chaincode::rpc::codec::{decode, encode, read_message, write_message};
use simple_chaincode::rpc::model::{ChaincodeId, ChaincodeInput, ChaincodeMessage, MessageKind};
use simple_chaincode::rpc::PeerRuntime;
use simple_chaincode::shim::{self, Response, OK};
use simple_chaincode::{ShimError, SimpleChaincode};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const CHANNEL: &str = "mychannel";

fn config(address: String) -> Config {
    Config {
        chaincode_id_name: "mycc:1.0".to_string(),
        peer_address: address,
        chaincode_logging_level: "debug".to_string(),
    }
}

async fn next(socket: &mut TcpStream) -> ChaincodeMessage {
    tokio::time::timeout(Duration::from_secs(5), read_message(socket))
        .await
        .expect("peer read timed out")
        .expect("read")
        .expect("stream open")
}

async fn send(socket: &mut TcpStream, msg: ChaincodeMessage) {
    write_message(socket, &msg).await.expect("write");
}

fn request(kind: MessageKind, txid: &str, args: &[&str]) -> ChaincodeMessage {
    let input = ChaincodeInput::from_args(args.iter().map(|a| a.as_bytes().to_vec()));
    ChaincodeMessage::new(kind, txid, CHANNEL).with_payload(encode(&input).expect("encode"))
}

/// Binds a mock peer and starts the chaincode against it.
async fn launch() -> (TcpStream, JoinHandle<simple_chaincode::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("addr").to_string();
    let chaincode = tokio::spawn(shim::start(PeerRuntime::new(&config(address)), SimpleChaincode));
    let (socket, _) = listener.accept().await.expect("accept");
    (socket, chaincode)
}

async fn handshake(socket: &mut TcpStream) {
    let register = next(socket).await;
    assert_eq!(register.kind, MessageKind::Register);
    let id: ChaincodeId = decode(&register.payload).expect("chaincode id");
    assert_eq!(id.name, "mycc:1.0");

    send(socket, ChaincodeMessage::new(MessageKind::Registered, "", "")).await;
    send(socket, ChaincodeMessage::new(MessageKind::Ready, "", "")).await;
}

#[tokio::test]
async fn init_and_invoke_complete_with_canned_responses() {
    let (mut socket, chaincode) = launch().await;
    handshake(&mut socket).await;

    let init_tx = uuid::Uuid::new_v4().to_string();
    send(&mut socket, request(MessageKind::Init, &init_tx, &["init", "a", "100"])).await;
    let reply = next(&mut socket).await;
    assert_eq!(reply.kind, MessageKind::Completed);
    assert_eq!(reply.txid, init_tx);
    assert_eq!(reply.channel_id, CHANNEL);
    let res: Response = decode(&reply.payload).expect("response");
    assert_eq!(res.status, OK);
    assert_eq!(res.payload, b"Init called");

    let invoke_tx = uuid::Uuid::new_v4().to_string();
    send(&mut socket, request(MessageKind::Transaction, &invoke_tx, &[])).await;
    let reply = next(&mut socket).await;
    assert_eq!(reply.kind, MessageKind::Completed);
    let res: Response = decode(&reply.payload).expect("response");
    assert_eq!(res, Response::success("Invoke"));

    drop(socket);
    let result = chaincode.await.expect("task");
    assert!(matches!(result, Err(ShimError::StreamClosed)));
}

#[tokio::test]
async fn concurrent_transactions_all_complete() {
    let (mut socket, chaincode) = launch().await;
    handshake(&mut socket).await;

    let txids: Vec<String> = (0..16).map(|_| uuid::Uuid::new_v4().to_string()).collect();
    for (i, txid) in txids.iter().enumerate() {
        let function = format!("fn{}", i);
        send(&mut socket, request(MessageKind::Transaction, txid, &[&function])).await;
    }

    let mut replies = HashMap::new();
    for _ in 0..txids.len() {
        let reply = next(&mut socket).await;
        assert_eq!(reply.kind, MessageKind::Completed);
        replies.insert(reply.txid.clone(), reply.payload);
    }
    let first = replies.values().next().cloned().expect("at least one reply");
    for txid in &txids {
        assert_eq!(replies.get(txid), Some(&first));
    }

    chaincode.abort();
}

#[tokio::test]
async fn keepalive_and_unexpected_messages() {
    let (mut socket, chaincode) = launch().await;
    let register = next(&mut socket).await;
    assert_eq!(register.kind, MessageKind::Register);

    let ping = ChaincodeMessage::new(MessageKind::Keepalive, "", "");
    send(&mut socket, ping.clone()).await;
    assert_eq!(next(&mut socket).await, ping);

    send(&mut socket, request(MessageKind::Transaction, "early", &[])).await;
    let reply = next(&mut socket).await;
    assert_eq!(reply.kind, MessageKind::Error);
    assert_eq!(reply.txid, "early");
    assert!(String::from_utf8_lossy(&reply.payload).contains("unexpected message"));

    chaincode.abort();
}

#[tokio::test]
async fn peer_rejecting_registration_fails_serve() {
    let (mut socket, chaincode) = launch().await;
    let register = next(&mut socket).await;
    assert_eq!(register.kind, MessageKind::Register);

    send(
        &mut socket,
        ChaincodeMessage::new(MessageKind::Error, "", "").with_payload(b"duplicate chaincode name".to_vec()),
    )
    .await;

    let err = chaincode.await.expect("task").expect_err("registration rejected");
    assert!(matches!(err, ShimError::Registration(_)));
    assert!(err.to_string().contains("duplicate chaincode name"));
}

#[tokio::test]
async fn unreachable_peer_is_a_startup_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("addr").to_string();
    drop(listener);

    let err = shim::start(PeerRuntime::new(&config(address)), SimpleChaincode)
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, ShimError::Io(_) | ShimError::ConnectTimeout(_)));
}
