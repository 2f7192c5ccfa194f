//! End-to-end tests of the async clients against the live mock server.
//!
//! # Design
//! Each test binds the mock server to a random port on the test's own tokio
//! runtime and talks to it through `ReqwestTransport`, so the real query
//! encoding, JSON bodies and status handling are all on the wire.

use std::time::Duration;

use pocketshelf_core::{
    ApiConfig, ApiError, FormClient, ItemClient, NameFilter, NewForm, NewItem, PocketShelf,
    ReqwestTransport,
};
use serde_json::json;
use tokio::io::AsyncReadExt;

/// Bind an ephemeral port and return the listener plus the API base URL.
async fn bind() -> (tokio::net::TcpListener, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, format!("http://{addr}/api/"))
}

fn record(value: serde_json::Value) -> mock_server::Record {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn list_with_name_returns_matching_record() {
    let db = mock_server::seeded(
        vec![
            record(json!({"id": "1", "name": "rice"})),
            record(json!({"id": "2", "name": "beans"})),
        ],
        Vec::new(),
    );
    let (listener, base_url) = bind().await;
    tokio::spawn(mock_server::serve(listener, mock_server::app_with_db(db)));

    let client = ItemClient::new(&base_url, ReqwestTransport::new());
    let items = client.list(&NameFilter::by_name("rice")).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id(), Some("1"));
    assert_eq!(items[0].name(), Some("rice"));
}

#[tokio::test]
async fn create_resolves_to_server_id() {
    let (listener, base_url) = bind().await;
    tokio::spawn(mock_server::run(listener));

    let client = ItemClient::new(&base_url, ReqwestTransport::new());
    let id = client
        .create(&NewItem::new().with("name", "beans"))
        .await
        .unwrap();
    assert_eq!(id.len(), 32);

    let items = client.list(&NameFilter::default()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id(), Some(id.as_str()));
    assert_eq!(items[0].name(), Some("beans"));
}

#[tokio::test]
async fn server_error_fails_instead_of_returning_empty_list() {
    let (listener, base_url) = bind().await;
    tokio::spawn(mock_server::serve(listener, mock_server::failing_app(500)));

    let client = ItemClient::new(&base_url, ReqwestTransport::new());
    let err = client.list(&NameFilter::default()).await.unwrap_err();
    match err {
        ApiError::HttpError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "mock failure");
        }
        other => panic!("expected HttpError, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and immediately drop to get a port nobody listens on.
    let (listener, base_url) = bind().await;
    drop(listener);

    let client = FormClient::new(&base_url, ReqwestTransport::new());
    let err = client
        .create(&NewForm::new().with("name", "Ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn forms_round_trip_through_facade() {
    let (listener, base_url) = bind().await;
    tokio::spawn(mock_server::run(listener));

    let config = ApiConfig::new(&base_url).unwrap();
    let shelf = PocketShelf::new(&config, ReqwestTransport::new());

    let ada = shelf
        .forms
        .create(
            &NewForm::new()
                .with("name", "Ada Lovelace")
                .with("formType", "donor")
                .with("id", "client-made"),
        )
        .await
        .unwrap();
    assert_ne!(ada, "client-made");
    shelf
        .forms
        .create(&NewForm::new().with("name", "Grace").with("formType", "client"))
        .await
        .unwrap();

    let all = shelf.forms.list(&NameFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let filtered = shelf
        .forms
        .list(&NameFilter::by_name("Ada Lovelace"))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id(), Some(ada.as_str()));
    assert_eq!(filtered[0].field("formType"), Some(&json!("donor")));

    // Forms and items live in separate collections.
    assert!(shelf.items.list(&NameFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn dropping_an_in_flight_list_closes_the_connection() {
    // A server that accepts and reads but never answers.
    let (listener, base_url) = bind().await;
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let mut received = 0;
        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return received,
                Ok(n) => received += n,
            }
        }
    });

    let client = ItemClient::new(&base_url, ReqwestTransport::new());
    let outcome = tokio::time::timeout(
        Duration::from_millis(300),
        client.list(&NameFilter::by_name("rice")),
    )
    .await;
    assert!(outcome.is_err(), "list resolved without a response");

    // The timed-out future was dropped; the socket must now see EOF.
    let received = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("connection still open after the request was dropped")
        .unwrap();
    assert!(received > 0, "request never reached the server");
}
