use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Window and cursor parameters accepted by Graph list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PagingParameters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    /// Opaque cursor pairs (`after`, `before`, `__paging_token`, ...) copied
    /// verbatim from a `paging` URL and sent back unchanged.
    pub cursors: Vec<(String, String)>,
}

impl PagingParameters {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(since) = self.since {
            pairs.push(("since".to_string(), since.timestamp().to_string()));
        }
        if let Some(until) = self.until {
            pairs.push(("until".to_string(), until.timestamp().to_string()));
        }
        pairs.extend(self.cursors.iter().cloned());
        pairs
    }

    /// Rebuild parameters from a `paging.next` / `paging.previous` URL.
    /// Returns `None` when the URL carries none of the recognised parameters.
    pub(crate) fn from_url(raw: &str) -> Option<Self> {
        let url = reqwest::Url::parse(raw).ok()?;
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "limit" => params.limit = value.parse().ok(),
                "offset" => params.offset = value.parse().ok(),
                "since" => params.since = parse_epoch(&value),
                "until" => params.until = parse_epoch(&value),
                key if is_cursor_key(key) => {
                    params.cursors.push((key.to_string(), value.into_owned()))
                }
                _ => {}
            }
        }
        (!params.is_empty()).then_some(params)
    }
}

/// Request-owned keys (`q`, `type`, `access_token`) are not cursors and are
/// never copied.
fn is_cursor_key(key: &str) -> bool {
    matches!(key, "after" | "before") || key.starts_with("__")
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = raw.parse().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

/// One page of a list endpoint plus cursors to its neighbours.
#[derive(Debug, Clone, Serialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub previous: Option<PagingParameters>,
    pub next: Option<PagingParameters>,
}

impl<T> PagedList<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Raw list envelope: `{ "data": [...], "paging": { "previous", "next" } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Paging {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> From<GraphList<T>> for PagedList<T> {
    fn from(list: GraphList<T>) -> Self {
        let paging = list.paging.unwrap_or_default();
        PagedList {
            items: list.data,
            previous: paging.previous.as_deref().and_then(PagingParameters::from_url),
            next: paging.next.as_deref().and_then(PagingParameters::from_url),
        }
    }
}
