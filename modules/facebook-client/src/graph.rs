use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::{Access, Credentials};
use crate::error::{FacebookError, Result};
use crate::paging::{GraphList, PagedList, PagingParameters};
use crate::transport::{GraphRequest, GraphResponse, GraphTransport, Method};
use crate::types::CreatedObject;

/// Shared request execution for every operation group: credential checks,
/// token attachment, remote error mapping and response decoding.
#[derive(Clone)]
pub struct GraphApi {
    transport: Arc<dyn GraphTransport>,
    credentials: Credentials,
}

impl GraphApi {
    pub fn new(transport: Arc<dyn GraphTransport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Credential/scope check for `operation`. Runs before any argument
    /// validation so a missing token is always reported as such.
    pub fn authorize(&self, operation: &str, access: &Access) -> Result<()> {
        self.credentials.check(operation, access)
    }

    pub async fn fetch_object<T: DeserializeOwned>(
        &self,
        operation: &str,
        access: Access,
        object_id: &str,
    ) -> Result<T> {
        self.authorize(operation, &access)?;
        require_object_id(object_id)?;
        let request = GraphRequest::new(Method::Get, object_id);
        let body = self.execute(operation, &access, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_connections<T: DeserializeOwned>(
        &self,
        operation: &str,
        access: Access,
        object_id: &str,
        connection: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let page = self
            .fetch_page(
                operation,
                access,
                object_id,
                connection,
                query,
                &PagingParameters::default(),
            )
            .await?;
        Ok(page.items)
    }

    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        operation: &str,
        access: Access,
        object_id: &str,
        connection: &str,
        query: &[(&str, &str)],
        paging: &PagingParameters,
    ) -> Result<PagedList<T>> {
        self.authorize(operation, &access)?;
        require_object_id(object_id)?;
        let mut request = GraphRequest::new(Method::Get, connection_path(object_id, connection));
        for (key, value) in query {
            request = request.query(key, *value);
        }
        request.query.extend(paging.query_pairs());

        let body = self.execute(operation, &access, request).await?;
        let list: GraphList<T> = serde_json::from_str(&body)?;
        Ok(list.into())
    }

    /// POST to a connection; returns the ID the service assigned.
    pub async fn publish(
        &self,
        operation: &str,
        access: Access,
        object_id: &str,
        connection: &str,
        form: Vec<(String, String)>,
    ) -> Result<String> {
        self.authorize(operation, &access)?;
        require_object_id(object_id)?;
        let mut request = GraphRequest::new(Method::Post, connection_path(object_id, connection));
        request.form = form;

        let body = self.execute(operation, &access, request).await?;
        let created: CreatedObject = serde_json::from_str(&body)?;
        if created.id.is_empty() {
            return Err(FacebookError::Parse(format!(
                "{operation}: service returned an empty id"
            )));
        }
        Ok(created.id)
    }

    pub async fn delete(&self, operation: &str, access: Access, object_id: &str) -> Result<()> {
        self.authorize(operation, &access)?;
        require_object_id(object_id)?;
        let request = GraphRequest::new(Method::Delete, object_id);
        self.execute(operation, &access, request).await?;
        Ok(())
    }

    async fn execute(
        &self,
        operation: &str,
        access: &Access,
        mut request: GraphRequest,
    ) -> Result<String> {
        request.access_token = self.credentials.access_token().map(String::from);

        debug!(operation, method = %request.method, path = %request.path, "Graph request");

        let response = self.transport.execute(request).await?;
        check_response(operation, access, response)
    }
}

/// `{object}/{connection}`, or just `{object}` for root endpoints like `search`.
fn connection_path(object_id: &str, connection: &str) -> String {
    if connection.is_empty() {
        object_id.to_string()
    } else {
        format!("{object_id}/{connection}")
    }
}

pub(crate) fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FacebookError::InvalidArgument(format!("{what} must not be empty")));
    }
    Ok(())
}

/// IDs become a single path segment; anything that would change the
/// endpoint (`/`, `?`, `#`) is rejected.
pub(crate) fn require_object_id(object_id: &str) -> Result<()> {
    require_non_empty("object id", object_id)?;
    if object_id.contains(&['/', '?', '#'][..]) {
        return Err(FacebookError::InvalidArgument(format!(
            "object id {object_id:?} must not contain '/', '?' or '#'"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

fn check_response(operation: &str, access: &Access, response: GraphResponse) -> Result<String> {
    let envelope = serde_json::from_str::<ErrorEnvelope>(&response.body).ok();

    match envelope {
        Some(envelope) => Err(map_error(operation, access, response.status, envelope.error)),
        None if response.is_success() => Ok(response.body),
        None => Err(FacebookError::Api {
            status: response.status,
            code: None,
            error_type: None,
            message: response.body,
        }),
    }
}

const PERMISSION_MARKERS: &[&str] = &[
    "requires extended permission",
    "hasn't authorized the application",
];
const MISSING_TOKEN_MARKER: &str = "An active access token must be used";

fn map_error(operation: &str, access: &Access, status: u16, error: GraphErrorBody) -> FacebookError {
    let lowered = error.message.to_lowercase();
    let permission_code = matches!(error.code, Some(10) | Some(200..=299));
    let permission_text = PERMISSION_MARKERS.iter().any(|m| lowered.contains(m));

    let mapped = if permission_code || permission_text {
        let scope = scope_from_message(&error.message)
            .or_else(|| access.required_scope().map(|s| s.to_string()))
            .unwrap_or_else(|| "unknown".to_string());
        FacebookError::InsufficientPermission { scope }
    } else if error.message.contains(MISSING_TOKEN_MARKER) {
        FacebookError::MissingCredentials {
            operation: operation.to_string(),
        }
    } else {
        FacebookError::Api {
            status,
            code: error.code,
            error_type: error.error_type,
            message: error.message,
        }
    };

    warn!(operation, status, error = %mapped, "Graph request failed");
    mapped
}

fn scope_from_message(message: &str) -> Option<String> {
    const MARKER: &str = "extended permission:";
    let start = message.to_ascii_lowercase().find(MARKER)? + MARKER.len();
    let scope: String = message[start..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!scope.is_empty()).then_some(scope)
}
