//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Caching and invalidation live one layer up, in `TodoApi`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_add_todo(&self, todo: &NewTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/todos", self.base_url), todo)
    }

    /// PATCH, not PUT: the body may carry only the fields being changed.
    pub fn build_update_todo(&self, patch: &TodoPatch) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Patch,
            format!("{}/todos/{}", self.base_url, patch.id),
            patch,
        )
    }

    pub fn build_delete_todo(&self, id: TodoId) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Delete, format!("{}/todos/{id}", self.base_url), &id)
    }

    /// Parse the list and order it newest first (descending id).
    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        let mut todos: Vec<Todo> = parse_json(response)?;
        todos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(todos)
    }

    pub fn parse_add_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    /// The body of a successful delete is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: String,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3500")
    }

    fn todo_json(id: TodoId) -> String {
        format!(r#"{{"id":{id},"title":"todo {id}","completed":false}}"#)
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3500/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_add_todo_posts_body_without_id() {
        let req = client().build_add_todo(&NewTodo::new("Buy milk")).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3500/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk", "completed": false}));
    }

    #[test]
    fn build_update_todo_patches_by_id() {
        let req = client()
            .build_update_todo(&TodoPatch::new(7).title("Updated"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://localhost:3500/todos/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["title"], "Updated");
        assert!(body.get("completed").is_none());
    }

    #[test]
    fn build_delete_todo_addresses_by_id_and_sends_id() {
        let req = client().build_delete_todo(5).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3500/todos/5");
        assert_eq!(req.body.as_deref(), Some("5"));
    }

    #[test]
    fn parse_list_todos_sorts_descending() {
        let body = format!("[{},{},{}]", todo_json(3), todo_json(1), todo_json(2));
        let todos = client().parse_list_todos(HttpResponse::new(200, body)).unwrap();
        let ids: Vec<TodoId> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn parse_list_todos_empty() {
        let todos = client().parse_list_todos(HttpResponse::new(200, "[]")).unwrap();
        assert!(todos.is_empty());
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_add_todo_accepts_201() {
        let todo = client().parse_add_todo(HttpResponse::new(201, todo_json(9))).unwrap();
        assert_eq!(todo.id, 9);
    }

    #[test]
    fn parse_add_todo_server_error() {
        let err = client()
            .parse_add_todo(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 500,
                body: "internal error".to_string()
            }
        );
    }

    #[test]
    fn parse_update_todo_not_found() {
        let err = client()
            .parse_update_todo(HttpResponse::new(404, "{}"))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_todo_ignores_body() {
        assert!(client().parse_delete_todo(HttpResponse::new(200, "{}")).is_ok());
        assert!(client().parse_delete_todo(HttpResponse::new(204, "")).is_ok());
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let err = client()
            .parse_delete_todo(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    fn arb_todo() -> impl Strategy<Value = Todo> {
        // Narrow id range so duplicates show up often.
        (0u64..16, ".{0,12}", any::<bool>()).prop_map(|(id, title, completed)| Todo {
            id,
            title,
            completed,
        })
    }

    fn canonical(mut todos: Vec<Todo>) -> Vec<Todo> {
        todos.sort_by(|a, b| {
            (a.id, &a.title, a.completed).cmp(&(b.id, &b.title, b.completed))
        });
        todos
    }

    proptest! {
        #[test]
        fn prop_list_is_descending_permutation(todos in prop::collection::vec(arb_todo(), 0..32)) {
            let body = serde_json::to_string(&todos).unwrap();
            let parsed = client().parse_list_todos(HttpResponse::new(200, body)).unwrap();

            prop_assert!(parsed.windows(2).all(|w| w[0].id >= w[1].id));
            prop_assert_eq!(canonical(parsed), canonical(todos));
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3500/");
        assert_eq!(client.build_list_todos().url, "http://localhost:3500/todos");
    }
}
