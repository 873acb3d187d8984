// crates/chat-client/tests/session.rs
//
// End-to-end runs of client sessions against a real server on loopback.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chat_client::console::ConsoleRx;
use chat_client::{session, ClientError, SessionEnd};
use chat_core::{Message, MessageKind};
use chat_protocol::{recv_message, send_message};
use chat_server::registry::SessionRegistry;
use chat_server::server;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn start_server(capacity: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let registry = Arc::new(SessionRegistry::new(capacity));
    tokio::spawn(async move {
        server::serve(listener, registry, None).await;
    });
    addr
}

struct User {
    input: UnboundedSender<String>,
    console: ConsoleRx,
    task: JoinHandle<Result<SessionEnd, ClientError>>,
}

impl User {
    async fn start(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (input, lines) = mpsc::unbounded_channel();
        let (console_tx, console) = mpsc::unbounded_channel();
        let task = tokio::spawn(session::run(stream, lines, console_tx));
        Self { input, console, task }
    }

    fn type_line(&self, line: &str) {
        self.input.send(line.to_string()).unwrap();
    }

    async fn next_line(&mut self) -> String {
        timeout(WAIT, self.console.recv())
            .await
            .expect("timed out waiting for console output")
            .expect("console closed")
    }

    async fn finish(self) -> Result<SessionEnd, ClientError> {
        timeout(WAIT, self.task).await.expect("session did not end").unwrap()
    }
}

#[tokio::test]
async fn two_users_exchange_a_direct_message_and_leave() {
    let addr = start_server(15).await;

    let mut a = User::start(addr).await;
    assert_eq!(a.next_line().await, "User 0 joined the group!");

    let mut b = User::start(addr).await;
    assert_eq!(b.next_line().await, "User 1 joined the group!");

    // First line from user 1 at A: the bare join notice.
    assert_eq!(a.next_line().await, "User 1 joined the group!");

    a.type_line("list users");
    assert_eq!(a.next_line().await, "1");
    b.type_line("list users");
    assert_eq!(b.next_line().await, "0");

    b.type_line(r#"send to 0 "hi""#);

    let at_a = a.next_line().await;
    assert!(at_a.starts_with("P ["), "{:?}", at_a);
    assert!(at_a.ends_with("] 1: hi"), "{:?}", at_a);

    let at_b = b.next_line().await;
    assert!(at_b.starts_with("P ["), "{:?}", at_b);
    assert!(at_b.ends_with("] -> 0: hi"), "{:?}", at_b);

    b.type_line("close connection");
    assert_eq!(b.next_line().await, "Removed Successfully");
    assert_eq!(b.finish().await.unwrap(), SessionEnd::Removed);

    assert_eq!(a.next_line().await, "User 1 left the group!");
    a.type_line("list users");
    assert_eq!(a.next_line().await, "");

    a.type_line("close connection");
    assert_eq!(a.next_line().await, "Removed Successfully");
    assert_eq!(a.finish().await.unwrap(), SessionEnd::Removed);
}

#[tokio::test]
async fn broadcast_is_shown_to_peers_and_echoed_to_author() {
    let addr = start_server(15).await;

    let mut a = User::start(addr).await;
    a.next_line().await;
    let mut b = User::start(addr).await;
    b.next_line().await;
    a.next_line().await;

    a.type_line(r#"send all "good morning""#);

    let echo = a.next_line().await;
    assert!(echo.starts_with('['), "{:?}", echo);
    assert!(echo.ends_with("] -> all good morning"), "{:?}", echo);

    // A was in B's initial roster, so the line is stamped.
    let at_b = b.next_line().await;
    assert!(at_b.ends_with("] 0: good morning"), "{:?}", at_b);
    assert!(!at_b.starts_with("P "));

    b.type_line(r#"send all "hello""#);
    b.next_line().await;
    let at_a = a.next_line().await;
    assert!(at_a.ends_with("] 1: hello"), "{:?}", at_a);
}

#[tokio::test]
async fn first_line_from_an_unannounced_sender_is_bare() {
    let addr = start_server(15).await;

    let mut a = User::start(addr).await;
    a.next_line().await;
    let mut b = User::start(addr).await;
    b.next_line().await;
    a.next_line().await;

    // A leaves and a newcomer reuses slot 0. B cleared slot 0 on the
    // departure, so the newcomer's join notice shows bare.
    a.type_line("close connection");
    a.next_line().await;
    assert_eq!(b.next_line().await, "User 0 left the group!");

    let mut c = User::start(addr).await;
    assert_eq!(c.next_line().await, "User 0 joined the group!");
    assert_eq!(b.next_line().await, "User 0 joined the group!");

    c.type_line(r#"send all "hey""#);
    c.next_line().await;
    let at_b = b.next_line().await;
    assert!(at_b.ends_with("] 0: hey"), "{:?}", at_b);
}

#[tokio::test]
async fn direct_message_to_unknown_user_prints_error_only() {
    let addr = start_server(15).await;

    let mut a = User::start(addr).await;
    a.next_line().await;

    a.type_line(r#"send to 7 "anyone?""#);
    assert_eq!(a.next_line().await, "Receiver not found");

    // Rejected locally, never sent.
    a.type_line(r#"send to -1 "broadcast in disguise""#);
    assert_eq!(a.next_line().await, "Receiver not found");
    a.type_line(r#"send to bob "hi""#);
    assert_eq!(a.next_line().await, "Receiver not found");

    // The sender was not left blocked: it still answers.
    a.type_line("list users");
    assert_eq!(a.next_line().await, "");
}

#[tokio::test]
async fn full_server_rejects_registration() {
    let addr = start_server(1).await;

    let mut a = User::start(addr).await;
    assert_eq!(a.next_line().await, "User 0 joined the group!");

    let mut b = User::start(addr).await;
    assert_eq!(b.next_line().await, "User limit exceeded");
    assert!(matches!(b.finish().await, Err(ClientError::Rejected(reason)) if reason == "User limit exceeded"));
}

#[tokio::test]
async fn end_of_input_leaves_the_group() {
    let addr = start_server(15).await;

    let mut a = User::start(addr).await;
    a.next_line().await;

    let User { input, mut console, task } = a;
    drop(input);

    let line = timeout(WAIT, console.recv()).await.unwrap().unwrap();
    assert_eq!(line, "Removed Successfully");
    assert_eq!(timeout(WAIT, task).await.unwrap().unwrap().unwrap(), SessionEnd::Removed);
}

#[tokio::test]
async fn connection_lost_while_awaiting_a_verdict_ends_the_session() {
    // A server that registers the client, reads one direct message and
    // hangs up without answering it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let hello = recv_message(&mut stream).await.unwrap().unwrap();
        assert_eq!(hello.kind, MessageKind::RegisterRequest);

        send_message(&mut stream, &Message::broadcast(0, "User 0 joined the group!")).await.unwrap();
        send_message(&mut stream, &Message::list_response("")).await.unwrap();

        let direct = recv_message(&mut stream).await.unwrap().unwrap();
        assert_eq!(direct, Message::direct(0, 3, "anyone?"));
    });

    let mut a = User::start(addr).await;
    assert_eq!(a.next_line().await, "User 0 joined the group!");

    a.type_line(r#"send to 3 "anyone?""#);
    timeout(WAIT, server).await.unwrap().unwrap();

    assert_eq!(a.finish().await.unwrap(), SessionEnd::Disconnected);
}
