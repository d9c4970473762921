use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- References ---

/// Minimal pointer to another Graph object (author, addressee, liker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

// --- Feed entries ---

/// Fields shared by every feed entry, whatever its type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCore {
    pub id: String,
    #[serde(default)]
    pub from: Option<Reference>,
    #[serde(default, deserialize_with = "data_envelope")]
    pub to: Vec<Reference>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(rename = "type", default)]
    pub post_type: Option<String>,
    #[serde(default, with = "graph_time")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, with = "graph_time")]
    pub updated_time: Option<DateTime<Utc>>,
    #[serde(
        rename(deserialize = "likes"),
        alias = "like_count",
        default,
        deserialize_with = "like_count"
    )]
    pub like_count: Option<i64>,
    #[serde(default, deserialize_with = "data_envelope")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPost {
    #[serde(flatten)]
    pub core: PostCore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPost {
    #[serde(flatten)]
    pub core: PostCore,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePost {
    #[serde(flatten)]
    pub core: PostCore,
    #[serde(default)]
    pub subject: Option<String>,
}

impl NotePost {
    /// Graph returns the note body in `message`.
    pub fn body(&self) -> Option<&str> {
        self.core.message.as_deref()
    }
}

/// Entry types this client has no dedicated record for (photo, video, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericPost {
    #[serde(flatten)]
    pub core: PostCore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Status,
    Link,
    Note,
    Other,
}

impl PostKind {
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "status" => PostKind::Status,
            "link" => PostKind::Link,
            "note" => PostKind::Note,
            _ => PostKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Status => "status",
            PostKind::Link => "link",
            PostKind::Note => "note",
            PostKind::Other => "other",
        }
    }
}

/// A feed entry, discriminated by the Graph `type` field.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Post {
    Status(StatusPost),
    Link(LinkPost),
    Note(NotePost),
    Other(GenericPost),
}

impl Post {
    pub fn kind(&self) -> PostKind {
        match self {
            Post::Status(_) => PostKind::Status,
            Post::Link(_) => PostKind::Link,
            Post::Note(_) => PostKind::Note,
            Post::Other(_) => PostKind::Other,
        }
    }

    pub fn core(&self) -> &PostCore {
        match self {
            Post::Status(p) => &p.core,
            Post::Link(p) => &p.core,
            Post::Note(p) => &p.core,
            Post::Other(p) => &p.core,
        }
    }

    pub fn id(&self) -> &str {
        &self.core().id
    }

    pub fn message(&self) -> Option<&str> {
        self.core().message.as_deref()
    }
}

impl<'de> Deserialize<'de> for Post {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(PostKind::from_type)
            .unwrap_or(PostKind::Other);

        let post = match kind {
            PostKind::Status => serde_json::from_value(value).map(Post::Status),
            PostKind::Link => serde_json::from_value(value).map(Post::Link),
            PostKind::Note => serde_json::from_value(value).map(Post::Note),
            PostKind::Other => serde_json::from_value(value).map(Post::Other),
        };
        post.map_err(de::Error::custom)
    }
}

// --- Comments ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub from: Option<Reference>,
    #[serde(default)]
    pub message: String,
    #[serde(default, with = "graph_time")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(
        rename(deserialize = "likes"),
        alias = "like_count",
        default,
        deserialize_with = "like_count"
    )]
    pub like_count: Option<i64>,
    /// Object the comment is attached to.
    #[serde(
        rename(deserialize = "parent"),
        alias = "parent_id",
        default,
        deserialize_with = "reference_id"
    )]
    pub parent_id: Option<String>,
}

// --- Submissions ---

/// A link to share on a feed. Never returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacebookLink {
    pub link: String,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
}

impl FacebookLink {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            name: None,
            caption: None,
            description: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("link".to_string(), self.link.clone())];
        let optional = [
            ("name", &self.name),
            ("caption", &self.caption),
            ("description", &self.description),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                fields.push((key.to_string(), value.clone()));
            }
        }
        fields
    }
}

/// Response body of a create call.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedObject {
    pub id: String,
}

// --- Serde helpers ---

/// Graph wraps nested lists as `{ "data": [...] }`; our own serialized
/// output writes them as bare arrays. Both are accepted.
fn data_envelope<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Listing<T> {
        Bare(Vec<T>),
        Envelope {
            #[serde(default = "Vec::new")]
            data: Vec<T>,
        },
    }

    let listing: Option<Listing<T>> = Option::deserialize(deserializer)?;
    Ok(match listing {
        Some(Listing::Bare(items)) | Some(Listing::Envelope { data: items }) => items,
        None => Vec::new(),
    })
}

/// Likes arrive either as a bare count or as `{ "count": n, "data": [...] }`.
fn like_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::Object(map)) => map
            .get("count")
            .and_then(Value::as_i64)
            .or_else(|| map.get("data").and_then(Value::as_array).map(|d| d.len() as i64)),
        _ => None,
    })
}

fn reference_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) => Some(id),
        Some(Value::Object(map)) => map.get("id").and_then(Value::as_str).map(String::from),
        _ => None,
    })
}

/// Graph timestamps look like `2011-03-17T15:05:41+0000`; RFC 3339 is accepted too.
pub(crate) mod graph_time {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}
