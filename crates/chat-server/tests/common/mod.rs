// crates/chat-server/tests/common/mod.rs
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chat_core::{Message, MessageKind, UserId};
use chat_protocol::{recv_message, send_message, write_frame};
use chat_server::registry::SessionRegistry;
use chat_server::server;
use chat_server::types::SharedRegistry;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

pub const WAIT: Duration = Duration::from_secs(5);
pub const QUIET: Duration = Duration::from_millis(200);

/// Start a server on an ephemeral loopback port.
pub async fn start_server(capacity: usize) -> (SocketAddr, SharedRegistry) {
    start_server_with_timeout(capacity, None).await
}

pub async fn start_server_with_timeout(capacity: usize, idle: Option<Duration>) -> (SocketAddr, SharedRegistry) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let registry: SharedRegistry = Arc::new(SessionRegistry::new(capacity));

    let shared = registry.clone();
    tokio::spawn(async move {
        server::serve(listener, shared, idle).await;
    });

    (addr, registry)
}

/// Raw protocol client.
pub struct TestClient {
    pub id: UserId,
    stream: TcpStream,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        Self { id: -1, stream }
    }

    pub async fn send(&mut self, msg: &Message) {
        send_message(&mut self.stream, msg).await.expect("send");
    }

    pub async fn send_raw(&mut self, payload: &[u8]) {
        write_frame(&mut self.stream, payload).await.expect("send raw");
    }

    /// Next message, failing the test if none arrives in time.
    pub async fn recv(&mut self) -> Message {
        timeout(WAIT, recv_message(&mut self.stream))
            .await
            .expect("timed out waiting for a message")
            .expect("transport error")
            .expect("connection closed")
    }

    /// Assert nothing arrives for a short while.
    pub async fn expect_silence(&mut self) {
        if let Ok(result) = timeout(QUIET, recv_message(&mut self.stream)).await {
            panic!("expected silence, got {:?}", result);
        }
    }

    /// Assert the server closes the connection.
    pub async fn expect_closed(&mut self) {
        let result = timeout(WAIT, recv_message(&mut self.stream))
            .await
            .expect("timed out waiting for close");
        match result {
            Ok(None) | Err(_) => {}
            Ok(Some(msg)) => panic!("expected close, got {:?}", msg),
        }
    }

    /// Send a `RegisterRequest` and consume the join notice and roster.
    ///
    /// Returns the roster body.
    pub async fn register(&mut self) -> String {
        self.send(&Message::register_request()).await;

        let joined = self.recv().await;
        assert_eq!(joined.kind, MessageKind::Chat, "unexpected reply: {:?}", joined);
        self.id = joined.sender_id;
        assert_eq!(joined.body, format!("User {} joined the group!", self.id));

        let list = self.recv().await;
        assert_eq!(list.kind, MessageKind::ListResponse);
        list.body
    }

    pub fn into_stream(self) -> TcpStream {
        self.stream
    }
}

/// Register `n` clients one after another, draining every join notice so
/// each returned client has an empty inbox.
pub async fn join_group(addr: SocketAddr, n: usize) -> Vec<TestClient> {
    let mut clients: Vec<TestClient> = Vec::with_capacity(n);
    for _ in 0..n {
        let mut newcomer = TestClient::connect(addr).await;
        newcomer.register().await;

        for existing in clients.iter_mut() {
            let notice = existing.recv().await;
            assert_eq!(notice.kind, MessageKind::Chat);
            assert_eq!(notice.sender_id, newcomer.id);
        }
        clients.push(newcomer);
    }
    clients
}
