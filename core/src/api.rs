//! Hook-style access layer: the todo endpoints wired to the query cache.
//!
//! # Design
//! `TodoApi` owns a `TodoClient`, a `Transport` and a `QueryCache`. Reads go
//! through the cache; a successful write invalidates the tags its endpoint
//! declares, so the next read refetches. Each call makes exactly one attempt
//! and reports its outcome as a status-flagged result.
//!
//! Hosts that run I/O themselves can split the list query with
//! `begin_get_todos` / `complete_get_todos`; `todos_state` reports
//! `Pending` in between.

use std::time::Instant;

use log::{debug, warn};

use crate::cache::{CacheKey, QueryCache, QueryStatus};
use crate::client::TodoClient;
use crate::config::ApiConfig;
use crate::endpoints::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

/// Executes one HTTP round-trip. Network failures map to
/// `ApiError::Transport`; non-2xx statuses must come back as responses.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// State of a query as seen by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult<V> {
    pub status: QueryStatus,
    /// Last successfully fetched data, kept across refetches and errors.
    pub data: Option<V>,
    /// Data held by the cache entry for this query, if any.
    pub current_data: Option<V>,
    pub error: Option<ApiError>,
}

impl<V> QueryResult<V> {
    pub fn is_uninitialized(&self) -> bool {
        self.status == QueryStatus::Uninitialized
    }

    /// First load: in flight with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending && self.data.is_none()
    }

    pub fn is_fetching(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Fulfilled
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Rejected
    }
}

/// Settled outcome of a single mutation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult<V> {
    pub status: QueryStatus,
    pub result: Result<V, ApiError>,
}

impl<V> MutationResult<V> {
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Fulfilled
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Rejected
    }

    pub fn data(&self) -> Option<&V> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.result.as_ref().err()
    }

    pub fn into_result(self) -> Result<V, ApiError> {
        self.result
    }
}

impl<V> From<Result<V, ApiError>> for MutationResult<V> {
    fn from(result: Result<V, ApiError>) -> Self {
        let status = match result {
            Ok(_) => QueryStatus::Fulfilled,
            Err(_) => QueryStatus::Rejected,
        };
        Self { status, result }
    }
}

/// First half of a split query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStart<V> {
    /// Served from the cache; nothing to execute.
    Cached(QueryResult<V>),
    /// Execute this request, then hand the outcome to the matching `complete_*`.
    Fetch(HttpRequest),
}

fn todos_key() -> CacheKey {
    CacheKey::no_args(Endpoint::GetTodos)
}

pub struct TodoApi<T> {
    client: TodoClient,
    transport: T,
    cache: QueryCache<Vec<Todo>>,
    last_todos: Option<Vec<Todo>>,
}

impl<T> TodoApi<T> {
    pub fn new(config: &ApiConfig, transport: T) -> Self {
        Self {
            client: TodoClient::new(&config.base_url),
            transport,
            cache: QueryCache::new(config.keep_unused_for),
            last_todos: None,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &QueryCache<Vec<Todo>> {
        &self.cache
    }

    /// Current state of the list query, without fetching.
    pub fn todos_state(&self) -> QueryResult<Vec<Todo>> {
        let key = todos_key();
        match self.cache.entry(&key) {
            Some(entry) => QueryResult {
                status: entry.status,
                data: self.last_todos.clone(),
                current_data: entry.data.clone(),
                error: entry.error.clone(),
            },
            None => QueryResult {
                status: QueryStatus::Uninitialized,
                data: self.last_todos.clone(),
                current_data: None,
                error: None,
            },
        }
    }

    /// Serve the list from the cache when fresh (unless `force`), otherwise
    /// mark it pending and return the request to execute.
    pub fn begin_get_todos(&mut self, force: bool) -> QueryStart<Vec<Todo>> {
        let key = todos_key();
        if !force {
            if let Some(todos) = self.cache.fresh_data(&key, Instant::now()) {
                debug!("cache hit for {key}");
                return QueryStart::Cached(QueryResult {
                    status: QueryStatus::Fulfilled,
                    data: Some(todos.clone()),
                    current_data: Some(todos.clone()),
                    error: None,
                });
            }
        }
        debug!("fetching {key}");
        self.cache.mark_pending(key, Endpoint::GetTodos.provides_tags());
        QueryStart::Fetch(self.client.build_list_todos())
    }

    pub fn complete_get_todos(
        &mut self,
        outcome: Result<HttpResponse, ApiError>,
    ) -> QueryResult<Vec<Todo>> {
        let key = todos_key();
        match outcome.and_then(|response| self.client.parse_list_todos(response)) {
            Ok(todos) => {
                debug!("{key} fulfilled with {} todos", todos.len());
                self.cache.fulfill(key, todos.clone(), Instant::now());
                self.last_todos = Some(todos);
            }
            Err(err) => {
                warn!("{key} failed: {err}");
                self.cache.reject(key, err);
            }
        }
        self.todos_state()
    }

    /// Drop fulfilled entries older than `keep_unused_for`.
    pub fn prune_expired(&mut self) -> usize {
        self.cache.remove_expired(Instant::now())
    }
}

impl<T: Transport> TodoApi<T> {
    /// List todos, newest first. Served from the cache while it is fresh.
    pub fn get_todos(&mut self) -> QueryResult<Vec<Todo>> {
        self.run_query(false)
    }

    /// List todos, always hitting the network.
    pub fn refetch_todos(&mut self) -> QueryResult<Vec<Todo>> {
        self.run_query(true)
    }

    pub fn add_todo(&mut self, todo: &NewTodo) -> MutationResult<Todo> {
        let request = self.client.build_add_todo(todo);
        self.run_mutation(Endpoint::AddTodo, request, TodoClient::parse_add_todo)
    }

    pub fn update_todo(&mut self, patch: &TodoPatch) -> MutationResult<Todo> {
        let request = self.client.build_update_todo(patch);
        self.run_mutation(Endpoint::UpdateTodo, request, TodoClient::parse_update_todo)
    }

    pub fn delete_todo(&mut self, id: TodoId) -> MutationResult<()> {
        let request = self.client.build_delete_todo(id);
        self.run_mutation(Endpoint::DeleteTodo, request, TodoClient::parse_delete_todo)
    }

    fn run_query(&mut self, force: bool) -> QueryResult<Vec<Todo>> {
        match self.begin_get_todos(force) {
            QueryStart::Cached(result) => result,
            QueryStart::Fetch(request) => {
                let outcome = self.dispatch(request);
                self.complete_get_todos(outcome)
            }
        }
    }

    fn run_mutation<V>(
        &mut self,
        endpoint: Endpoint,
        request: Result<HttpRequest, ApiError>,
        parse: fn(&TodoClient, HttpResponse) -> Result<V, ApiError>,
    ) -> MutationResult<V> {
        let result = request
            .and_then(|request| self.dispatch(request))
            .and_then(|response| parse(&self.client, response));
        match &result {
            Ok(_) => {
                let dropped = self.cache.invalidate_tags(endpoint.invalidates_tags());
                debug!("{endpoint} fulfilled, invalidated {dropped} cached queries");
            }
            Err(err) => warn!("{endpoint} failed: {err}"),
        }
        MutationResult::from(result)
    }

    fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", request.method, request.url);
        self.transport.execute(request)
    }
}
