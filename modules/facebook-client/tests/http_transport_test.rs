//! The reqwest-backed transport against a local HTTP server.
//!
//! The in-memory transport covers request shapes; these tests make sure the
//! same shapes actually reach the wire (bearer header, form body, query
//! string) and that error payloads are mapped after a real round trip.

use std::time::Duration;

use facebook_client::{
    CommentOperations, FacebookClient, FacebookConfig, FacebookError, FeedOperations,
};
use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn config(server: &MockServer) -> FacebookConfig {
    FacebookConfig {
        graph_url: server.uri(),
        timeout: Duration::from_secs(5),
        ..FacebookConfig::default()
    }
}

fn authorized_client(server: &MockServer) -> FacebookClient {
    FacebookClient::new(&config(server).with_access_token("test-token")).unwrap()
}

#[tokio::test]
async fn token_travels_as_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/feed"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "100_1", "type": "status", "message": "Hello world"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = authorized_client(&server)
        .feed_operations()
        .get_feed()
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id(), "100_1");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query_pairs().all(|(k, _)| k != "access_token"));
}

#[tokio::test]
async fn update_status_posts_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/feed"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("message=hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "100_9"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = authorized_client(&server)
        .feed_operations()
        .update_status("hello")
        .await
        .unwrap();
    assert_eq!(id, "100_9");
}

#[tokio::test]
async fn public_search_sends_query_and_type_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "test"))
        .and(query_param("type", "post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1", "type": "status", "message": "a test"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = FacebookClient::new(&config(&server)).unwrap();
    let posts = client
        .feed_operations()
        .search_public_feed("test")
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn extended_permission_payload_maps_to_insufficient_permission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/feed"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "message": "(#200) Requires extended permission: publish_stream",
                "type": "OAuthException",
                "code": 200
            }
        })))
        .mount(&server)
        .await;

    let err = authorized_client(&server)
        .feed_operations()
        .update_status("hello")
        .await
        .unwrap_err();
    match err {
        FacebookError::InsufficientPermission { scope } => assert_eq!(scope, "publish_stream"),
        other => panic!("expected insufficient permission, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_failure_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/100_1/comments"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = authorized_client(&server)
        .comment_operations()
        .get_comments("100_1")
        .await
        .unwrap_err();
    match err {
        FacebookError::Api { status, message, .. } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_comment_uses_http_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/100_1_1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;

    authorized_client(&server)
        .comment_operations()
        .delete_comment("100_1_1")
        .await
        .unwrap();
}
