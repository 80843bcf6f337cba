use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use obseris::adapter::server::{run_server, ServerConfig};

async fn start_server(seed: Option<u32>) -> std::net::SocketAddr {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        seed,
    };
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, Some(ready_tx)).await;
    });

    tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped")
}

async fn send(writer: &mut OwnedWriteHalf, line: &str) {
    writer.write_all(line.as_bytes()).await.unwrap();
    writer.write_all(b"\n").await.unwrap();
    writer.flush().await.unwrap();
}

async fn recv(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> serde_json::Value {
    let line = tokio::time::timeout(Duration::from_secs(5), lines.next_line())
        .await
        .expect("timed out waiting for reply")
        .unwrap()
        .expect("connection closed");
    serde_json::from_str(&line).unwrap()
}

#[tokio::test]
async fn adapter_hello_moves_commit_observe() {
    let addr = start_server(None).await;
    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Commands before hello are refused.
    send(&mut write_half, r#"{"type":"moves","seq":1}"#).await;
    let v = recv(&mut lines).await;
    assert_eq!(v["type"], "error");
    assert_eq!(v["code"], "handshake_required");

    send(
        &mut write_half,
        r#"{"type":"hello","seq":2,"client":{"name":"e2e-test","version":"1.0.0"},"seed":42}"#,
    )
    .await;
    let v = recv(&mut lines).await;
    assert_eq!(v["type"], "welcome");
    assert_eq!(v["seq"], 2);
    assert_eq!(v["seed"], 42);

    send(&mut write_half, r#"{"type":"moves","seq":3}"#).await;
    let v = recv(&mut lines).await;
    assert_eq!(v["type"], "moves");
    let generation = v["generation"].as_u64().unwrap();
    let moves = v["moves"].as_array().unwrap();
    assert!(!moves.is_empty());
    assert_eq!(moves[0]["board"].as_array().unwrap().len(), 400);
    assert_eq!(moves[0]["path"].as_array().unwrap().last().unwrap(), "hardDrop");

    let commit = format!(
        r#"{{"type":"commit","seq":4,"index":0,"generation":{}}}"#,
        generation
    );
    send(&mut write_half, &commit).await;
    let v = recv(&mut lines).await;
    assert_eq!(v["type"], "ack");
    assert_eq!(v["seq"], 4);
    assert!(v["generation"].as_u64().unwrap() > generation);

    // Replaying the same commit is stale.
    send(&mut write_half, &commit).await;
    let v = recv(&mut lines).await;
    assert_eq!(v["code"], "stale_outcome");

    send(&mut write_half, "{not json").await;
    let v = recv(&mut lines).await;
    assert_eq!(v["code"], "invalid_json");

    send(&mut write_half, r#"{"type":"observe","seq":7}"#).await;
    let v = recv(&mut lines).await;
    assert_eq!(v["type"], "observation");
    assert_eq!(v["seq"], 7);
    assert_eq!(v["seed"], 42);
    assert_eq!(v["board"]["cells"].as_array().unwrap().len(), 400);
    assert_eq!(v["playable"], true);
}

#[tokio::test]
async fn adapter_sessions_are_independent() {
    let addr = start_server(Some(1000)).await;

    let mut seeds = Vec::new();
    for _ in 0..2 {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        send(
            &mut write_half,
            r#"{"type":"hello","seq":1,"client":{"name":"e2e-test"}}"#,
        )
        .await;
        let v = recv(&mut lines).await;
        assert_eq!(v["type"], "welcome");
        seeds.push(v["seed"].as_u64().unwrap());
    }

    assert_eq!(seeds, vec![1001, 1002]);
}
