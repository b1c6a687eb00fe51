//! Bootstrap and view layer for the todo client.
//!
//! `ApiProvider` owns the single `TodoApi` (and with it the query cache),
//! `Root` is the mount point the view tree is rendered into, and `App` is
//! the view tree itself.

pub mod error;
pub mod provider;
pub mod root;
pub mod transport;
pub mod view;

pub use error::{AppError, EventError};
pub use provider::ApiProvider;
pub use root::Root;
pub use transport::HttpTransport;
pub use view::{App, Event, Flow, TodoList, View, USAGE};
