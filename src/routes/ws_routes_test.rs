use std::net::SocketAddr;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::models::{ChatMessage, ClientMessage};
use crate::routes::router;
use crate::service::delivery;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_app() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let app = router(delivery::Handle::new());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}

async fn connect(addr: SocketAddr, name: &str) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/messages/{name}"))
        .await
        .expect("websocket connect");
    client
}

async fn users(addr: SocketAddr) -> Vec<String> {
    let mut users: Vec<String> = reqwest::get(format!("http://{addr}/users"))
        .await
        .expect("users request")
        .json()
        .await
        .expect("users json");
    users.sort();
    users
}

/// Waits until registration (and socket attachment) has settled on the server.
async fn wait_for_users(addr: SocketAddr, expected: &[&str]) {
    for _ in 0..100 {
        if users(addr).await == expected {
            sleep(Duration::from_millis(50)).await;
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("users never became {expected:?}");
}

async fn next_frame(client: &mut Client) -> ClientMessage {
    loop {
        let frame = timeout(Duration::from_secs(2), client.next())
            .await
            .expect("frame receive timed out")
            .expect("websocket ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("tagged client message");
        }
    }
}

/// Skips directory updates and returns the next chat frame.
async fn next_chat_frame(client: &mut Client) -> ClientMessage {
    loop {
        match next_frame(client).await {
            ClientMessage::AddUser { .. } | ClientMessage::RemoveUser { .. } => continue,
            frame => return frame,
        }
    }
}

async fn send_chat(client: &mut Client, sender: &str, recipient: &str, text: &str) -> ChatMessage {
    // The wire carries milliseconds, so compare against a millisecond timestamp.
    let now = Utc::now().timestamp_millis();
    let message = ChatMessage {
        recipient: recipient.into(),
        sender: sender.into(),
        text: text.into(),
        time_utc: Utc.timestamp_millis_opt(now).unwrap(),
    };
    let json = serde_json::to_string(&message).expect("serialize chat message");
    client.send(Message::Text(json.into())).await.expect("send chat message");
    message
}

#[tokio::test]
async fn users_endpoint_lists_connected_users() {
    let addr = spawn_app().await;
    assert!(users(addr).await.is_empty());

    let _alice = connect(addr, "alice").await;
    let _bob = connect(addr, "bob").await;

    wait_for_users(addr, &["alice", "bob"]).await;
}

#[tokio::test]
async fn joining_and_leaving_is_announced_to_other_users() {
    let addr = spawn_app().await;
    let mut alice = connect(addr, "alice").await;
    wait_for_users(addr, &["alice"]).await;

    let mut bob = connect(addr, "bob").await;
    assert_eq!(next_frame(&mut alice).await, ClientMessage::AddUser { name: "bob".into() });

    bob.close(None).await.expect("close bob");
    assert_eq!(next_frame(&mut alice).await, ClientMessage::RemoveUser { name: "bob".into() });
    wait_for_users(addr, &["alice"]).await;
}

#[tokio::test]
async fn chat_reaches_recipient_and_other_sender_connections() {
    let addr = spawn_app().await;
    let mut alice = connect(addr, "alice").await;
    let mut alice_phone = connect(addr, "alice").await;
    let mut bob = connect(addr, "bob").await;
    wait_for_users(addr, &["alice", "bob"]).await;

    let sent = send_chat(&mut alice, "alice", "bob", "hello bob").await;

    match next_chat_frame(&mut bob).await {
        ClientMessage::ChatMessage { message } => assert_eq!(*message, sent),
        other => panic!("expected ChatMessage, got {other:?}"),
    }
    match next_chat_frame(&mut alice_phone).await {
        ClientMessage::SynchronizeMessage { message } => assert_eq!(*message, sent),
        other => panic!("expected SynchronizeMessage, got {other:?}"),
    }
}

#[tokio::test]
async fn user_name_is_percent_decoded_from_path() {
    let addr = spawn_app().await;
    let _client = connect(addr, "ada%20lovelace").await;

    wait_for_users(addr, &["ada lovelace"]).await;
}

#[tokio::test]
async fn message_with_foreign_sender_is_not_delivered() {
    let addr = spawn_app().await;
    let mut alice = connect(addr, "alice").await;
    let mut bob = connect(addr, "bob").await;
    wait_for_users(addr, &["alice", "bob"]).await;

    send_chat(&mut alice, "mallory", "bob", "trust me").await;
    let genuine = send_chat(&mut alice, "alice", "bob", "it's me").await;

    match next_chat_frame(&mut bob).await {
        ClientMessage::ChatMessage { message } => assert_eq!(*message, genuine),
        other => panic!("expected ChatMessage, got {other:?}"),
    }
}

#[tokio::test]
async fn flooding_connections_do_not_stall_the_relay() {
    let addr = spawn_app().await;
    let alice = connect(addr, "alice").await;
    let alice_phone = connect(addr, "alice").await;
    let mut bob = connect(addr, "bob").await;
    wait_for_users(addr, &["alice", "bob"]).await;

    let flood = |mut client: Client, label: &'static str| async move {
        for i in 0..300 {
            send_chat(&mut client, "alice", "bob", &format!("{label} {i}")).await;
        }
        client
    };
    let (_alice, _alice_phone) = tokio::join!(flood(alice, "laptop"), flood(alice_phone, "phone"));

    // Delivery is best effort under load, but some of it reaches bob.
    assert!(matches!(next_chat_frame(&mut bob).await, ClientMessage::ChatMessage { .. }));

    // And unrelated users can still join and talk afterwards.
    let mut carol = connect(addr, "carol").await;
    let mut dave = connect(addr, "dave").await;
    wait_for_users(addr, &["alice", "bob", "carol", "dave"]).await;

    let sent = send_chat(&mut carol, "carol", "dave", "still up?").await;
    match next_chat_frame(&mut dave).await {
        ClientMessage::ChatMessage { message } => assert_eq!(*message, sent),
        other => panic!("expected ChatMessage, got {other:?}"),
    }
}
