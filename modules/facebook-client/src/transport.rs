use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FacebookError, Result};

pub const GRAPH_API_URL: &str = "https://graph.facebook.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// A single Graph call, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub access_token: Option<String>,
}

impl GraphRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
            access_token: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn form(mut self, key: &str, value: impl Into<String>) -> Self {
        self.form.push((key.to_string(), value.into()));
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }

    pub fn form_param(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphResponse {
    pub status: u16,
    pub body: String,
}

impl GraphResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes Graph requests. `HttpTransport` talks to the real service;
/// tests plug in an in-memory implementation.
#[async_trait]
pub trait GraphTransport: Send + Sync {
    async fn execute(&self, request: GraphRequest) -> Result<GraphResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FacebookError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl GraphTransport for HttpTransport {
    async fn execute(&self, request: GraphRequest) -> Result<GraphResponse> {
        let url = self.url(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        if let Some(ref token) = request.access_token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(GraphResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let transport =
            HttpTransport::new("https://graph.facebook.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.url("/me/feed"), "https://graph.facebook.com/me/feed");
        assert_eq!(transport.url("123"), "https://graph.facebook.com/123");
    }

    #[test]
    fn request_builder_collects_params() {
        let req = GraphRequest::new(Method::Post, "me/feed")
            .form("message", "hello")
            .query("fields", "id");
        assert_eq!(req.form_param("message"), Some("hello"));
        assert_eq!(req.query_param("fields"), Some("id"));
        assert_eq!(req.query_param("message"), None);
    }

    #[test]
    fn success_range() {
        assert!(GraphResponse::ok("{}").is_success());
        assert!(!GraphResponse::new(400, "{}").is_success());
    }
}
