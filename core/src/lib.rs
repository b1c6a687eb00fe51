//! API access layer for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and layers a tag-invalidated
//! query cache on top so reads are served from memory until a write lands.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url` and maps each CRUD
//!   operation to a `build_*` / `parse_*` pair.
//! - `Endpoint` and `Tag` declare which reads provide which tags and which
//!   writes invalidate them.
//! - `TodoApi` owns the cache and a `Transport`, and exposes the hook-style
//!   methods (`get_todos`, `add_todo`, ...) that views call.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod types;

pub use api::{MutationResult, QueryResult, QueryStart, TodoApi, Transport};
pub use cache::{CacheEntry, CacheKey, QueryCache, QueryStatus};
pub use client::TodoClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_KEEP_UNUSED_FOR};
pub use endpoints::{Endpoint, EndpointKind, Tag};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{NewTodo, Todo, TodoId, TodoPatch};
