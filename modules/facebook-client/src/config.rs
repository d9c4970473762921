use std::env;
use std::time::Duration;

use tracing::info;

use crate::auth::{Credentials, Scope};
use crate::error::{FacebookError, Result};
use crate::transport::GRAPH_API_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
/// Token acquisition happens elsewhere; this only carries the result.
#[derive(Clone)]
pub struct FacebookConfig {
    pub access_token: Option<String>,
    /// `None` when the token's grants are unknown.
    pub granted_scopes: Option<Vec<Scope>>,
    pub graph_url: String,
    pub timeout: Duration,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            granted_scopes: None,
            graph_url: GRAPH_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FacebookConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let timeout = parse_timeout(env::var("FACEBOOK_TIMEOUT_SECS").ok().as_deref())?;

        let config = Self {
            access_token: env::var("FACEBOOK_ACCESS_TOKEN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            granted_scopes: env::var("FACEBOOK_GRANTED_SCOPES")
                .ok()
                .map(|raw| parse_scopes(&raw)),
            graph_url: env::var("FACEBOOK_GRAPH_URL").unwrap_or_else(|_| GRAPH_API_URL.to_string()),
            timeout,
        };

        config.log_keys();
        Ok(config)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn credentials(&self) -> Credentials {
        let credentials = match &self.access_token {
            Some(token) => Credentials::token(token.clone()),
            None => Credentials::anonymous(),
        };
        match &self.granted_scopes {
            Some(scopes) => credentials.with_scopes(scopes.iter().cloned()),
            None => credentials,
        }
    }

    fn log_keys(&self) {
        info!(
            graph_url = %self.graph_url,
            access_token = %self.access_token.as_deref().map(preview).unwrap_or_else(|| "(none)".to_string()),
            scopes = ?self.granted_scopes,
            timeout_secs = self.timeout.as_secs(),
            "Facebook client config loaded"
        );
    }
}

/// First five characters of a secret, for logs.
fn preview(val: &str) -> String {
    let head: String = val.chars().take(5).collect();
    format!("{head}...")
}

fn parse_timeout(raw: Option<&str>) -> Result<Duration> {
    let secs = match raw {
        Some(raw) => raw.trim().parse().map_err(|_| {
            FacebookError::Config(format!("FACEBOOK_TIMEOUT_SECS must be a number, got {raw:?}"))
        })?,
        None => DEFAULT_TIMEOUT_SECS,
    };
    Ok(Duration::from_secs(secs))
}

fn parse_scopes(raw: &str) -> Vec<Scope> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Scope::parse)
        .collect()
}

impl std::fmt::Debug for FacebookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacebookConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("granted_scopes", &self.granted_scopes)
            .field("graph_url", &self.graph_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_parse_from_comma_list() {
        assert_eq!(
            parse_scopes("read_stream, publish_stream,,email"),
            vec![
                Scope::ReadStream,
                Scope::PublishStream,
                Scope::Other("email".to_string())
            ]
        );
    }

    #[test]
    fn credentials_carry_known_scopes() {
        let config = FacebookConfig {
            granted_scopes: Some(vec![Scope::ReadStream]),
            ..FacebookConfig::default()
        }
        .with_access_token("abc");
        let creds = config.credentials();
        assert_eq!(creds.access_token(), Some("abc"));
        assert!(creds.granted_scopes().unwrap().contains(&Scope::ReadStream));
    }

    #[test]
    fn default_config_is_anonymous() {
        let config = FacebookConfig::default();
        assert!(!config.credentials().is_authorized());
        assert_eq!(config.graph_url, GRAPH_API_URL);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("abcdé-token"), "abcdé...");
        assert_eq!(preview("ab"), "ab...");
        assert_eq!(preview("日本語のトークン"), "日本語のト...");
    }

    #[test]
    fn timeout_defaults_and_parses() {
        assert_eq!(parse_timeout(None).unwrap(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(parse_timeout(Some(" 12 ")).unwrap(), Duration::from_secs(12));
    }

    #[test]
    fn non_numeric_timeout_is_config_error() {
        let err = parse_timeout(Some("soon")).unwrap_err();
        assert!(matches!(err, FacebookError::Config(ref msg) if msg.contains("soon")));
    }

    // Only test in this binary that touches FACEBOOK_TIMEOUT_SECS.
    #[test]
    fn from_env_rejects_bad_timeout() {
        env::set_var("FACEBOOK_TIMEOUT_SECS", "thirty");
        let result = FacebookConfig::from_env();
        env::remove_var("FACEBOOK_TIMEOUT_SECS");
        assert!(matches!(result, Err(FacebookError::Config(_))));
    }

    #[test]
    fn debug_redacts_token() {
        let config = FacebookConfig::default().with_access_token("very-secret");
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
