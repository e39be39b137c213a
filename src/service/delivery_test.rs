use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;

use super::*;
use crate::service::socket;

fn names(mut users: Vec<Arc<str>>) -> Vec<String> {
    users.sort();
    users.into_iter().map(|name| name.to_string()).collect()
}

#[tokio::test]
async fn get_or_insert_reuses_the_running_user() {
    let delivery = Handle::new();

    let first = delivery.get_or_insert("alice".into()).await.unwrap();
    let second = delivery.get_or_insert("alice".into()).await.unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(names(delivery.get_users().await.unwrap()), vec!["alice"]);
}

#[tokio::test]
async fn get_users_lists_every_registered_name() {
    let delivery = Handle::new();
    delivery.get_or_insert("bob".into()).await.unwrap();
    delivery.get_or_insert("alice".into()).await.unwrap();

    assert_eq!(names(delivery.get_users().await.unwrap()), vec!["alice", "bob"]);
}

#[tokio::test]
async fn removal_with_a_stale_id_keeps_the_user() {
    let delivery = Handle::new();
    let alice = delivery.get_or_insert("alice".into()).await.unwrap();

    delivery.remove_user("alice".into(), Uuid::new_v4()).await.unwrap();
    assert_eq!(names(delivery.get_users().await.unwrap()), vec!["alice"]);

    delivery.remove_user("alice".into(), alice.id()).await.unwrap();
    assert!(delivery.get_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_recipient_does_not_stop_the_service() {
    let delivery = Handle::new();
    delivery.get_or_insert("alice".into()).await.unwrap();

    delivery
        .send_message(ChatMessage {
            recipient: "nobody".into(),
            sender: "alice".into(),
            text: "anyone there?".into(),
            time_utc: Utc::now(),
        })
        .await
        .unwrap();

    assert_eq!(names(delivery.get_users().await.unwrap()), vec!["alice"]);
}

/// A registry driven directly, without its task, so its map can be inspected.
fn registry() -> (DeliveryService, Handle) {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let service = DeliveryService {
        receiver,
        sender: sender.downgrade(),
        users_by_name: HashMap::new(),
    };
    (service, Handle { sender })
}

#[tokio::test]
async fn stopped_user_is_replaced_without_a_second_announcement() {
    let (mut service, _handle) = registry();
    let bob = service.get_or_insert("bob".into()).unwrap();
    let (bob_socket, mut bob_frames) = socket::Handle::detached();
    bob.add_socket(bob_socket).await.unwrap();

    let stale = user::Handle::stopped();
    service.users_by_name.insert("alice".into(), stale.clone());

    let alice = service.get_or_insert("alice".into()).unwrap();
    assert_ne!(alice.id(), stale.id());
    assert!(!alice.is_stopped());
    assert_eq!(service.users_by_name.len(), 2);

    // Only a genuinely new name is announced, so carol's join is bob's first frame.
    service.get_or_insert("carol".into()).unwrap();
    let frame = timeout(Duration::from_secs(1), bob_frames.recv())
        .await
        .expect("announcement timed out")
        .expect("socket queue closed");
    assert_eq!(
        frame,
        ClientMessage::AddUser {
            name: "carol".into()
        }
    );
    assert!(bob_frames.try_recv().is_err());
}
