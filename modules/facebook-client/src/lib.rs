pub mod auth;
pub mod comment;
pub mod config;
pub mod error;
pub mod feed;
pub mod graph;
pub mod paging;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use auth::{Access, Credentials, Scope};
pub use comment::{CommentOperations, CommentTemplate};
pub use config::FacebookConfig;
pub use error::{ErrorKind, FacebookError, Result};
pub use feed::{FeedOperations, FeedTemplate};
pub use graph::GraphApi;
pub use paging::{PagedList, PagingParameters};
pub use transport::{GraphRequest, GraphResponse, GraphTransport, HttpTransport, Method};
pub use types::{
    Comment, FacebookLink, GenericPost, LinkPost, NotePost, Post, PostCore, PostKind, Reference,
    StatusPost,
};

use std::sync::Arc;

/// Entry point: one Graph connection shared by the feed and comment groups.
#[derive(Clone)]
pub struct FacebookClient {
    feed: FeedTemplate,
    comments: CommentTemplate,
    api: Arc<GraphApi>,
}

impl FacebookClient {
    /// Build a client that talks HTTP to the configured Graph URL.
    pub fn new(config: &FacebookConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.graph_url, config.timeout)?;
        Ok(Self::with_transport(Arc::new(transport), config.credentials()))
    }

    pub fn with_transport(transport: Arc<dyn GraphTransport>, credentials: Credentials) -> Self {
        let api = Arc::new(GraphApi::new(transport, credentials));
        Self {
            feed: FeedTemplate::new(api.clone()),
            comments: CommentTemplate::new(api.clone()),
            api,
        }
    }

    pub fn feed_operations(&self) -> &FeedTemplate {
        &self.feed
    }

    pub fn comment_operations(&self) -> &CommentTemplate {
        &self.comments
    }

    pub fn is_authorized(&self) -> bool {
        self.api.credentials().is_authorized()
    }
}
