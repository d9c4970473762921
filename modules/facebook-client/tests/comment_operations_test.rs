//! Comment and like operations.

use std::sync::Arc;

use facebook_client::testing::{CommentBoard, MockTransport};
use facebook_client::{
    CommentOperations, Credentials, FacebookClient, FacebookError, Method, Scope,
};
use serde_json::json;

fn authorized() -> Credentials {
    Credentials::token("test-token")
}

#[tokio::test]
async fn get_comments_fills_parent_id() {
    let transport = Arc::new(MockTransport::new().on_get(
        "100_1/comments",
        json!({
            "data": [
                {
                    "id": "100_1_1",
                    "from": {"id": "200", "name": "Sam"},
                    "message": "First!",
                    "created_time": "2011-03-17T15:10:00+0000",
                    "likes": 2
                },
                {
                    "id": "100_1_2",
                    "message": "Reply",
                    "parent": {"id": "100_1_1"}
                }
            ]
        }),
    ));
    let client = FacebookClient::with_transport(transport.clone(), Credentials::anonymous());

    let comments = client
        .comment_operations()
        .get_comments("100_1")
        .await
        .unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].parent_id.as_deref(), Some("100_1"));
    assert_eq!(comments[0].like_count, Some(2));
    assert_eq!(comments[0].from.as_ref().unwrap().name.as_deref(), Some("Sam"));
    assert_eq!(comments[1].parent_id.as_deref(), Some("100_1_1"));
}

#[tokio::test]
async fn get_comment_by_id() {
    let transport = Arc::new(MockTransport::new().on_get(
        "100_1_1",
        json!({"id": "100_1_1", "message": "First!"}),
    ));
    let client = FacebookClient::with_transport(transport, authorized());

    let comment = client
        .comment_operations()
        .get_comment("100_1_1")
        .await
        .unwrap();
    assert_eq!(comment.message, "First!");
}

#[tokio::test]
async fn add_then_delete_comment_removes_it_from_listing() {
    let board = Arc::new(CommentBoard::new());
    let client = FacebookClient::with_transport(
        board.clone(),
        authorized().with_scopes([Scope::ReadStream, Scope::PublishStream]),
    );
    let comments = client.comment_operations();

    let keep = comments.add_comment("100_1", "staying").await.unwrap();
    let id = comments.add_comment("100_1", "going").await.unwrap();
    assert_ne!(keep, id);

    let listed: Vec<String> = comments
        .get_comments("100_1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert!(listed.contains(&id));

    comments.delete_comment(&id).await.unwrap();

    let listed: Vec<String> = comments
        .get_comments("100_1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert!(!listed.contains(&id));
    assert!(listed.contains(&keep));
    assert_eq!(board.comment_count("100_1"), 1);
}

#[tokio::test]
async fn deleting_unknown_comment_is_api_error() {
    let board = Arc::new(CommentBoard::new());
    let client = FacebookClient::with_transport(board, authorized());

    let err = client
        .comment_operations()
        .delete_comment("missing")
        .await
        .unwrap_err();
    assert!(matches!(err, FacebookError::Api { status: 400, .. }));
}

#[tokio::test]
async fn comment_writes_check_credentials_first() {
    let transport = Arc::new(MockTransport::new());

    let anonymous = FacebookClient::with_transport(transport.clone(), Credentials::anonymous());
    let err = anonymous
        .comment_operations()
        .add_comment("100_1", "hi")
        .await
        .unwrap_err();
    assert!(err.is_missing_credentials());

    let read_only = FacebookClient::with_transport(
        transport.clone(),
        authorized().with_scopes([Scope::ReadStream]),
    );
    let err = read_only
        .comment_operations()
        .delete_comment("100_1_1")
        .await
        .unwrap_err();
    assert!(err.is_insufficient_permission());

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn add_comment_without_token_reports_missing_credentials_for_empty_message() {
    let transport = Arc::new(MockTransport::new());
    let client = FacebookClient::with_transport(transport.clone(), Credentials::anonymous());

    let err = client
        .comment_operations()
        .add_comment("1", "")
        .await
        .unwrap_err();
    assert!(err.is_missing_credentials(), "unexpected error: {err:?}");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn comment_ids_with_path_characters_are_rejected() {
    let transport = Arc::new(MockTransport::new());
    let client = FacebookClient::with_transport(transport.clone(), authorized());
    let comments = client.comment_operations();

    let err = comments.delete_comment("1_2/likes").await.unwrap_err();
    assert!(matches!(err, FacebookError::InvalidArgument(_)));
    let err = comments.get_comments("1?fields=x").await.unwrap_err();
    assert!(matches!(err, FacebookError::InvalidArgument(_)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn remote_extended_permission_error_names_scope() {
    let transport = Arc::new(MockTransport::new().on_error(
        Method::Post,
        "100_1/comments",
        403,
        200,
        "(#200) Requires extended permission: publish_stream",
    ));
    let client = FacebookClient::with_transport(transport, authorized());

    let err = client
        .comment_operations()
        .add_comment("100_1", "hi")
        .await
        .unwrap_err();
    match err {
        FacebookError::InsufficientPermission { scope } => assert_eq!(scope, "publish_stream"),
        other => panic!("expected insufficient permission, got {other:?}"),
    }
}

#[tokio::test]
async fn get_likes_returns_references() {
    let transport = Arc::new(MockTransport::new().on_get(
        "100_1/likes",
        json!({
            "data": [
                {"id": "200", "name": "Sam"},
                {"id": "300", "name": "Alex"}
            ]
        }),
    ));
    let client = FacebookClient::with_transport(transport.clone(), Credentials::anonymous());

    let likes = client.comment_operations().get_likes("100_1").await.unwrap();
    let ids: Vec<&str> = likes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["200", "300"]);
    assert!(transport.last_request().unwrap().access_token.is_none());
}
