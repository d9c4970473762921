// Test transports for the Graph client.
//
// - MockTransport: HashMap-based (method, path) -> canned response, records
//   every request it sees so tests can assert on what was (or wasn't) sent.
// - CommentBoard: stateful in-memory comment store for create/list/delete flows.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{FacebookError, Result};
use crate::transport::{GraphRequest, GraphResponse, GraphTransport, Method};

// ---------------------------------------------------------------------------
// MockTransport
// ---------------------------------------------------------------------------

/// Returns `Err` for unregistered routes.
/// Builder pattern: `.on_get()`, `.on_post()`, `.on_delete()`, `.on_error()`.
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<(Method, String), GraphResponse>,
    requests: Mutex<Vec<GraphRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, path: &str, body: Value) -> Self {
        self.respond(Method::Get, path, GraphResponse::ok(body.to_string()))
    }

    pub fn on_post(self, path: &str, body: Value) -> Self {
        self.respond(Method::Post, path, GraphResponse::ok(body.to_string()))
    }

    pub fn on_delete(self, path: &str) -> Self {
        self.respond(Method::Delete, path, GraphResponse::ok("true"))
    }

    /// Respond with a Graph error payload.
    pub fn on_error(self, method: Method, path: &str, status: u16, code: i64, message: &str) -> Self {
        let body = json!({
            "error": {
                "message": message,
                "type": "OAuthException",
                "code": code
            }
        });
        self.respond(method, path, GraphResponse::new(status, body.to_string()))
    }

    pub fn respond(mut self, method: Method, path: &str, response: GraphResponse) -> Self {
        self.routes.insert((method, path.to_string()), response);
        self
    }

    pub fn requests(&self) -> Vec<GraphRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<GraphRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GraphTransport for MockTransport {
    async fn execute(&self, request: GraphRequest) -> Result<GraphResponse> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);
        self.routes.get(&key).cloned().ok_or_else(|| {
            FacebookError::Network(format!(
                "MockTransport: no response registered for {} {}",
                key.0, key.1
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// CommentBoard
// ---------------------------------------------------------------------------

/// Stateful comment store speaking the Graph wire format for
/// `GET {object}/comments`, `POST {object}/comments` and `DELETE {comment}`.
#[derive(Default)]
pub struct CommentBoard {
    state: Mutex<BoardState>,
}

#[derive(Default)]
struct BoardState {
    next_id: u64,
    // object id -> (comment id, message)
    comments: HashMap<String, Vec<(String, String)>>,
}

impl CommentBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment_count(&self, object_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .comments
            .get(object_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl GraphTransport for CommentBoard {
    async fn execute(&self, request: GraphRequest) -> Result<GraphResponse> {
        let mut state = self.state.lock().unwrap();
        let object_id = request.path.strip_suffix("/comments");

        match (request.method, object_id) {
            (Method::Get, Some(object_id)) => {
                let data: Vec<Value> = state
                    .comments
                    .get(object_id)
                    .into_iter()
                    .flatten()
                    .map(|(id, message)| json!({"id": id, "message": message}))
                    .collect();
                Ok(GraphResponse::ok(json!({ "data": data }).to_string()))
            }
            (Method::Post, Some(object_id)) => {
                state.next_id += 1;
                let id = format!("{object_id}_{}", state.next_id);
                let message = request.form_param("message").unwrap_or_default().to_string();
                state
                    .comments
                    .entry(object_id.to_string())
                    .or_default()
                    .push((id.clone(), message));
                Ok(GraphResponse::ok(json!({ "id": id }).to_string()))
            }
            (Method::Delete, None) => {
                let mut found = false;
                for list in state.comments.values_mut() {
                    let before = list.len();
                    list.retain(|(id, _)| *id != request.path);
                    found |= list.len() != before;
                }
                if found {
                    Ok(GraphResponse::ok("true"))
                } else {
                    let body = json!({"error": {"message": "Unsupported delete request", "code": 100}});
                    Ok(GraphResponse::new(400, body.to_string()))
                }
            }
            _ => Err(FacebookError::Network(format!(
                "CommentBoard: unsupported {} {}",
                request.method, request.path
            ))),
        }
    }
}
