use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::auth::{Access, Scope};
use crate::error::Result;
use crate::graph::{require_non_empty, GraphApi};
use crate::types::{Comment, Reference};

/// Comments and likes on any Graph object (post, photo, note, ...).
#[async_trait]
pub trait CommentOperations: Send + Sync {
    async fn get_comments(&self, object_id: &str) -> Result<Vec<Comment>>;

    async fn get_comment(&self, comment_id: &str) -> Result<Comment>;

    /// Comment as the authenticated user; returns the new comment's ID.
    /// Requires `publish_stream`.
    async fn add_comment(&self, object_id: &str, message: &str) -> Result<String>;

    /// Requires `publish_stream`.
    async fn delete_comment(&self, comment_id: &str) -> Result<()>;

    /// Who liked the object, as references rather than full profiles.
    async fn get_likes(&self, object_id: &str) -> Result<Vec<Reference>>;
}

#[derive(Clone)]
pub struct CommentTemplate {
    api: Arc<GraphApi>,
}

impl CommentTemplate {
    pub fn new(api: Arc<GraphApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommentOperations for CommentTemplate {
    async fn get_comments(&self, object_id: &str) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .api
            .fetch_connections("get_comments", Access::Public, object_id, "comments", &[])
            .await?;
        for comment in &mut comments {
            if comment.parent_id.is_none() {
                comment.parent_id = Some(object_id.to_string());
            }
        }
        Ok(comments)
    }

    async fn get_comment(&self, comment_id: &str) -> Result<Comment> {
        self.api
            .fetch_object("get_comment", Access::Public, comment_id)
            .await
    }

    async fn add_comment(&self, object_id: &str, message: &str) -> Result<String> {
        let access = Access::Scoped(Scope::PublishStream);
        self.api.authorize("add_comment", &access)?;
        require_non_empty("message", message)?;
        let form = vec![("message".to_string(), message.to_string())];
        let id = self
            .api
            .publish("add_comment", access, object_id, "comments", form)
            .await?;
        info!(object_id, id = %id, "Added comment");
        Ok(id)
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        self.api
            .delete("delete_comment", Access::Scoped(Scope::PublishStream), comment_id)
            .await?;
        info!(comment_id, "Deleted comment");
        Ok(())
    }

    async fn get_likes(&self, object_id: &str) -> Result<Vec<Reference>> {
        self.api
            .fetch_connections("get_likes", Access::Public, object_id, "likes", &[])
            .await
    }
}
