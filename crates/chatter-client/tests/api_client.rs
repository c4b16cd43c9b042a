/// Integration test: run the real API on a loopback port and talk to it
/// through `ApiClient`.
use std::net::SocketAddr;

use chatter_api::{AppStateInner, router};
use chatter_client::{ApiClient, ChannelMessage, ClientError, MessageStore};
use chatter_db::Database;
use chatter_presence::{PresenceTracker, default_avatar};

async fn spawn_server() -> ApiClient {
    let dir = std::env::temp_dir().join(format!("chatter_client_test_{}", uuid::Uuid::new_v4()));
    let db = Database::open(&dir).await.unwrap();
    let app = router(AppStateInner::new(db, PresenceTracker::new()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(&format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn post_and_list_messages() {
    let client = spawn_server().await;

    let created = client.post_message("alice", "hi").await.unwrap();
    assert_eq!(created.user, "alice");
    assert_eq!(created.content, "hi");

    let all = client.list_messages().await.unwrap();
    assert_eq!(all.last(), Some(&created));
}

#[tokio::test]
async fn presence_round_trip() {
    let client = spawn_server().await;

    client.go_online("bob", None).await.unwrap();
    client.go_online("bob", None).await.unwrap();

    let online = client.online_users().await.unwrap();
    assert_eq!(online.len(), 1);
    assert_eq!(online[0].avatar, default_avatar("bob"));

    client.set_avatar("bob", "https://img/bob.png").await.unwrap();
    assert_eq!(
        client.online_users().await.unwrap()[0].avatar,
        "https://img/bob.png"
    );

    client.go_offline("bob").await.unwrap();
    assert!(client.online_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_user_avatar_surfaces_api_error() {
    let client = spawn_server().await;

    let err = client.set_avatar("ghost", "x").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "User not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn server_messages_feed_the_channel_cache() {
    let client = spawn_server().await;
    client.post_message("alice", "one").await.unwrap();
    client.post_message("bob", "two").await.unwrap();

    let mut store = MessageStore::new();
    let source = async {
        client.list_messages().await.map(|messages| {
            messages
                .into_iter()
                .map(|m| ChannelMessage::from_server("general", m))
                .collect()
        })
    };
    store.fetch_channel_messages("general", source).await;

    assert!(store.error().is_none());
    let contents: Vec<_> = store
        .channel_messages("general")
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, vec!["one", "two"]);
}

#[test]
fn bad_base_url_is_rejected() {
    assert!(matches!(
        ApiClient::new("not a url"),
        Err(ClientError::InvalidUrl(_))
    ));
}
