use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use facebook_client::{
    CommentOperations, FacebookClient, FacebookConfig, FacebookLink, FeedOperations,
    PagingParameters,
};

#[derive(Parser)]
#[command(name = "fbgraph", about = "Read and write Facebook feeds and comments")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recent feed entries (own feed unless --owner is given)
    Feed {
        #[arg(long)]
        owner: Option<String>,
        /// Fetch a single page of this size instead of the default window
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Home feed, including friends' entries
    Home,
    /// A single feed entry
    Entry { id: String },
    Statuses {
        #[arg(long)]
        owner: Option<String>,
    },
    Links {
        #[arg(long)]
        owner: Option<String>,
    },
    Notes {
        #[arg(long)]
        owner: Option<String>,
    },
    Posts {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Post a status update to your own feed
    Status { message: String },
    /// Post a message to someone else's feed
    Post { owner: String, message: String },
    /// Share a link
    Link {
        url: String,
        message: String,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a feed entry
    Delete { id: String },
    SearchPublic { query: String },
    SearchHome { query: String },
    SearchUser {
        query: String,
        #[arg(long)]
        user: Option<String>,
    },
    Comments { object_id: String },
    Comment { id: String },
    AddComment { object_id: String, message: String },
    DeleteComment { id: String },
    Likes { object_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("facebook_client=info,fbgraph=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = FacebookConfig::from_env().context("Failed to load Facebook config")?;
    let client = FacebookClient::new(&config)?;
    tracing::info!(authorized = client.is_authorized(), "Facebook client ready");

    run(&client, cli.command).await
}

async fn run(client: &FacebookClient, command: Command) -> Result<()> {
    let feed = client.feed_operations();
    let comments = client.comment_operations();

    match command {
        Command::Feed { owner, limit } => {
            let owner = owner.as_deref().unwrap_or("me");
            match limit {
                Some(limit) => print(&feed.get_feed_page(owner, &PagingParameters::limit(limit)).await?),
                None if owner == "me" => print(&feed.get_feed().await?),
                None => print(&feed.get_feed_for(owner).await?),
            }
        }
        Command::Home => print(&feed.get_home_feed().await?),
        Command::Entry { id } => print(&feed.get_feed_entry(&id).await?),
        Command::Statuses { owner } => match owner {
            Some(owner) => print(&feed.get_statuses_for(&owner).await?),
            None => print(&feed.get_statuses().await?),
        },
        Command::Links { owner } => match owner {
            Some(owner) => print(&feed.get_links_for(&owner).await?),
            None => print(&feed.get_links().await?),
        },
        Command::Notes { owner } => match owner {
            Some(owner) => print(&feed.get_notes_for(&owner).await?),
            None => print(&feed.get_notes().await?),
        },
        Command::Posts { owner } => match owner {
            Some(owner) => print(&feed.get_posts_for(&owner).await?),
            None => print(&feed.get_posts().await?),
        },
        Command::Status { message } => print_id(feed.update_status(&message).await?),
        Command::Post { owner, message } => print_id(feed.post(&owner, &message).await?),
        Command::Link {
            url,
            message,
            owner,
            name,
            caption,
            description,
        } => {
            let mut link = FacebookLink::new(url);
            link.name = name;
            link.caption = caption;
            link.description = description;
            let id = match owner {
                Some(owner) => feed.post_link_for(&owner, &message, &link).await?,
                None => feed.post_link(&message, &link).await?,
            };
            print_id(id)
        }
        Command::Delete { id } => {
            feed.delete_feed_entry(&id).await?;
            print(&serde_json::json!({ "deleted": id }))
        }
        Command::SearchPublic { query } => print(&feed.search_public_feed(&query).await?),
        Command::SearchHome { query } => print(&feed.search_home_feed(&query).await?),
        Command::SearchUser { query, user } => match user {
            Some(user) => print(&feed.search_user_feed_for(&user, &query).await?),
            None => print(&feed.search_user_feed(&query).await?),
        },
        Command::Comments { object_id } => print(&comments.get_comments(&object_id).await?),
        Command::Comment { id } => print(&comments.get_comment(&id).await?),
        Command::AddComment { object_id, message } => {
            print_id(comments.add_comment(&object_id, &message).await?)
        }
        Command::DeleteComment { id } => {
            comments.delete_comment(&id).await?;
            print(&serde_json::json!({ "deleted": id }))
        }
        Command::Likes { object_id } => print(&comments.get_likes(&object_id).await?),
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_id(id: String) -> Result<()> {
    print(&serde_json::json!({ "id": id }))
}
