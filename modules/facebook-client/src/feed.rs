use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::auth::{Access, Scope};
use crate::error::Result;
use crate::graph::{require_non_empty, GraphApi};
use crate::paging::{PagedList, PagingParameters};
use crate::types::{FacebookLink, LinkPost, NotePost, Post, StatusPost};

const ME: &str = "me";

/// Operations on a feed: the authenticated user's (`me`) or any named
/// owner's (user, page, group, event).
///
/// List reads return the service's default window, up to 50 entries or
/// 30 days, whichever is greater. Use the `*_page` variants to walk further.
#[async_trait]
pub trait FeedOperations: Send + Sync {
    /// Recent entries of the authenticated user's feed.
    async fn get_feed(&self) -> Result<Vec<Post>>;

    /// Recent entries of `owner_id`'s feed. Non-public posts need `read_stream`.
    async fn get_feed_for(&self, owner_id: &str) -> Result<Vec<Post>>;

    /// One page of `owner_id`'s feed, with cursors to the neighbouring pages.
    async fn get_feed_page(
        &self,
        owner_id: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<Post>>;

    /// The authenticated user's home feed, including friends' entries.
    /// Requires `read_stream`.
    async fn get_home_feed(&self) -> Result<Vec<Post>>;

    async fn get_feed_entry(&self, entry_id: &str) -> Result<Post>;

    async fn get_statuses(&self) -> Result<Vec<StatusPost>>;

    /// Requires `read_stream`.
    async fn get_statuses_for(&self, user_id: &str) -> Result<Vec<StatusPost>>;

    /// Requires `read_stream`.
    async fn get_links(&self) -> Result<Vec<LinkPost>>;

    /// Requires `read_stream`.
    async fn get_links_for(&self, owner_id: &str) -> Result<Vec<LinkPost>>;

    /// Requires `read_stream`.
    async fn get_notes(&self) -> Result<Vec<NotePost>>;

    /// Requires `read_stream`.
    async fn get_notes_for(&self, owner_id: &str) -> Result<Vec<NotePost>>;

    /// Entries authored by the feed owner. Requires `read_stream`.
    async fn get_posts(&self) -> Result<Vec<Post>>;

    /// Requires `read_stream`.
    async fn get_posts_for(&self, owner_id: &str) -> Result<Vec<Post>>;

    /// Post a status update; returns the new entry's ID. Requires `publish_stream`.
    async fn update_status(&self, message: &str) -> Result<String>;

    /// Post a message to `owner_id`'s feed. Requires `publish_stream`.
    async fn post(&self, owner_id: &str, message: &str) -> Result<String>;

    /// Requires `publish_stream`.
    async fn post_link(&self, message: &str, link: &FacebookLink) -> Result<String>;

    /// Requires `publish_stream`.
    async fn post_link_for(
        &self,
        owner_id: &str,
        message: &str,
        link: &FacebookLink,
    ) -> Result<String>;

    /// Requires `publish_stream`.
    async fn delete_feed_entry(&self, id: &str) -> Result<()>;

    /// Search all public posts. Works without credentials.
    async fn search_public_feed(&self, query: &str) -> Result<Vec<Post>>;

    async fn search_public_feed_page(
        &self,
        query: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<Post>>;

    async fn search_home_feed(&self, query: &str) -> Result<Vec<Post>>;

    async fn search_user_feed(&self, query: &str) -> Result<Vec<Post>>;

    async fn search_user_feed_for(&self, user_id: &str, query: &str) -> Result<Vec<Post>>;
}

/// Graph-backed `FeedOperations`.
#[derive(Clone)]
pub struct FeedTemplate {
    api: Arc<GraphApi>,
}

impl FeedTemplate {
    pub fn new(api: Arc<GraphApi>) -> Self {
        Self { api }
    }

    async fn publish_message(
        &self,
        operation: &str,
        owner_id: &str,
        message: &str,
        link: Option<&FacebookLink>,
    ) -> Result<String> {
        let access = Access::Scoped(Scope::PublishStream);
        self.api.authorize(operation, &access)?;
        require_non_empty("message", message)?;
        let mut form = vec![("message".to_string(), message.to_string())];
        if let Some(link) = link {
            require_non_empty("link", &link.link)?;
            form.extend(link.form_fields());
        }

        let id = self
            .api
            .publish(operation, access, owner_id, "feed", form)
            .await?;
        info!(operation, owner_id, id = %id, "Published feed entry");
        Ok(id)
    }

    async fn search_feed(
        &self,
        operation: &str,
        access: Access,
        owner_id: &str,
        connection: &str,
        query: &str,
    ) -> Result<Vec<Post>> {
        self.api.authorize(operation, &access)?;
        require_non_empty("query", query)?;
        self.api
            .fetch_connections(operation, access, owner_id, connection, &[("q", query)])
            .await
    }
}

fn read_stream() -> Access {
    Access::Scoped(Scope::ReadStream)
}

#[async_trait]
impl FeedOperations for FeedTemplate {
    async fn get_feed(&self) -> Result<Vec<Post>> {
        self.api
            .fetch_connections("get_feed", Access::Authenticated, ME, "feed", &[])
            .await
    }

    async fn get_feed_for(&self, owner_id: &str) -> Result<Vec<Post>> {
        self.api
            .fetch_connections("get_feed_for", Access::Authenticated, owner_id, "feed", &[])
            .await
    }

    async fn get_feed_page(
        &self,
        owner_id: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<Post>> {
        self.api
            .fetch_page("get_feed_page", Access::Authenticated, owner_id, "feed", &[], paging)
            .await
    }

    async fn get_home_feed(&self) -> Result<Vec<Post>> {
        self.api
            .fetch_connections("get_home_feed", read_stream(), ME, "home", &[])
            .await
    }

    async fn get_feed_entry(&self, entry_id: &str) -> Result<Post> {
        self.api
            .fetch_object("get_feed_entry", Access::Public, entry_id)
            .await
    }

    async fn get_statuses(&self) -> Result<Vec<StatusPost>> {
        self.api
            .fetch_connections("get_statuses", Access::Authenticated, ME, "statuses", &[])
            .await
    }

    async fn get_statuses_for(&self, user_id: &str) -> Result<Vec<StatusPost>> {
        self.api
            .fetch_connections("get_statuses_for", read_stream(), user_id, "statuses", &[])
            .await
    }

    async fn get_links(&self) -> Result<Vec<LinkPost>> {
        self.api
            .fetch_connections("get_links", read_stream(), ME, "links", &[])
            .await
    }

    async fn get_links_for(&self, owner_id: &str) -> Result<Vec<LinkPost>> {
        self.api
            .fetch_connections("get_links_for", read_stream(), owner_id, "links", &[])
            .await
    }

    async fn get_notes(&self) -> Result<Vec<NotePost>> {
        self.api
            .fetch_connections("get_notes", read_stream(), ME, "notes", &[])
            .await
    }

    async fn get_notes_for(&self, owner_id: &str) -> Result<Vec<NotePost>> {
        self.api
            .fetch_connections("get_notes_for", read_stream(), owner_id, "notes", &[])
            .await
    }

    async fn get_posts(&self) -> Result<Vec<Post>> {
        self.api
            .fetch_connections("get_posts", read_stream(), ME, "posts", &[])
            .await
    }

    async fn get_posts_for(&self, owner_id: &str) -> Result<Vec<Post>> {
        self.api
            .fetch_connections("get_posts_for", read_stream(), owner_id, "posts", &[])
            .await
    }

    async fn update_status(&self, message: &str) -> Result<String> {
        self.publish_message("update_status", ME, message, None).await
    }

    async fn post(&self, owner_id: &str, message: &str) -> Result<String> {
        self.publish_message("post", owner_id, message, None).await
    }

    async fn post_link(&self, message: &str, link: &FacebookLink) -> Result<String> {
        self.publish_message("post_link", ME, message, Some(link))
            .await
    }

    async fn post_link_for(
        &self,
        owner_id: &str,
        message: &str,
        link: &FacebookLink,
    ) -> Result<String> {
        self.publish_message("post_link_for", owner_id, message, Some(link))
            .await
    }

    async fn delete_feed_entry(&self, id: &str) -> Result<()> {
        self.api
            .delete("delete_feed_entry", Access::Scoped(Scope::PublishStream), id)
            .await?;
        info!(id, "Deleted feed entry");
        Ok(())
    }

    async fn search_public_feed(&self, query: &str) -> Result<Vec<Post>> {
        let page = self
            .search_public_feed_page(query, &PagingParameters::default())
            .await?;
        Ok(page.items)
    }

    async fn search_public_feed_page(
        &self,
        query: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<Post>> {
        self.api.authorize("search_public_feed", &Access::Public)?;
        require_non_empty("query", query)?;
        self.api
            .fetch_page(
                "search_public_feed",
                Access::Public,
                "search",
                "",
                &[("q", query), ("type", "post")],
                paging,
            )
            .await
    }

    async fn search_home_feed(&self, query: &str) -> Result<Vec<Post>> {
        self.search_feed("search_home_feed", Access::Authenticated, ME, "home", query)
            .await
    }

    async fn search_user_feed(&self, query: &str) -> Result<Vec<Post>> {
        self.search_feed("search_user_feed", Access::Authenticated, ME, "feed", query)
            .await
    }

    async fn search_user_feed_for(&self, user_id: &str, query: &str) -> Result<Vec<Post>> {
        self.search_feed(
            "search_user_feed_for",
            Access::Authenticated,
            user_id,
            "feed",
            query,
        )
        .await
    }
}
