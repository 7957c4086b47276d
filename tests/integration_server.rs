//! Drives the TCP server with real sockets and line-delimited JSON.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use typerush::game::GameRules;
use typerush::server::Server;
use typerush::service::GameService;
use typerush::word_source::WordCache;
use typerush::word_store::StaticWords;

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send_raw(&mut self, line: &str) -> Value {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        let reply = self.lines.next_line().await.unwrap().expect("reply line");
        serde_json::from_str(&reply).unwrap()
    }

    async fn send(&mut self, request: Value) -> Value {
        self.send_raw(&request.to_string()).await
    }
}

async fn start_server(words: &[&str]) -> std::net::SocketAddr {
    let cache = WordCache::new(Box::new(StaticWords::new(words.iter().copied())));
    let service = Arc::new(GameService::new(Arc::new(cache), GameRules::default()));
    let server = Server::bind("127.0.0.1:0", service, "default")
        .await
        .expect("bind");
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

#[tokio::test]
async fn game_round_over_tcp() {
    let addr = start_server(&["ev"]).await;
    let mut client = Client::connect(addr).await;

    let state = client
        .send(json!({"action": "new_game", "session_id": "s1"}))
        .await;
    assert_eq!(state["current_word"], "ev");
    assert_eq!(state["lives"], 3);
    assert_eq!(state["time_limit"], 10.0);

    let resp = client
        .send(json!({"action": "keypress", "session_id": "s1", "key": "E"}))
        .await;
    assert_eq!(resp["keypress_result"]["correct"], true);
    assert_eq!(resp["game_state"]["current_index"], 1);
    assert_eq!(resp["game_state"]["typed_letters"], "e");

    let resp = client
        .send(json!({"action": "keypress", "session_id": "s1", "key": "v"}))
        .await;
    assert_eq!(resp["game_state"]["word_completed"], true);
    assert_eq!(resp["game_state"]["score"], 70);

    let state = client
        .send(json!({"action": "next_word", "session_id": "s1"}))
        .await;
    assert_eq!(state["word_count"], 1);
    assert_eq!(state["time_limit"], 9.5);

    let state = client
        .send(json!({"action": "time_up", "session_id": "s1"}))
        .await;
    assert_eq!(state["game_over"], true);
}

#[tokio::test]
async fn unknown_sessions_and_bad_input() {
    let addr = start_server(&["python"]).await;
    let mut client = Client::connect(addr).await;

    let resp = client
        .send(json!({"action": "time_up", "session_id": "nobody"}))
        .await;
    assert_eq!(resp, json!({"error": "session not found"}));

    let resp = client
        .send(json!({"action": "next_word", "session_id": "nobody"}))
        .await;
    assert_eq!(resp, json!({"error": "session not found"}));

    let resp = client.send_raw("this is not json").await;
    assert!(resp["error"].as_str().unwrap().contains("malformed"));

    let resp = client.send(json!({"action": "keypress", "key": ""})).await;
    assert!(resp.get("error").is_some());

    // The connection survives bad lines.
    let state = client.send(json!({"action": "game_state"})).await;
    assert_eq!(state["current_word"], "python");
}

#[tokio::test]
async fn missing_session_id_uses_default() {
    let addr = start_server(&["python"]).await;
    let mut first = Client::connect(addr).await;
    let mut second = Client::connect(addr).await;

    first.send(json!({"action": "keypress", "key": "p"})).await;
    let state = second.send(json!({"action": "game_state"})).await;
    assert_eq!(state["current_index"], 1);
    assert_eq!(state["game_started"], true);
}

#[tokio::test]
async fn word_pool_operations() {
    let addr = start_server(&["a", "b", "c"]).await;
    let mut client = Client::connect(addr).await;

    let resp = client.send(json!({"action": "word_count"})).await;
    assert_eq!(resp, json!({"word_count": 3}));

    let resp = client.send(json!({"action": "refresh_words"})).await;
    assert_eq!(resp, json!({"success": true, "message": "3 words loaded"}));
}
