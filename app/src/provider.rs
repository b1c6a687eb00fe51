use todo_core::{ApiConfig, TodoApi};

/// Process-wide context holding the access layer and its response cache.
pub struct ApiProvider<T> {
    api: TodoApi<T>,
}

impl<T> ApiProvider<T> {
    pub fn new(config: &ApiConfig, transport: T) -> Self {
        Self {
            api: TodoApi::new(config, transport),
        }
    }

    pub fn api(&self) -> &TodoApi<T> {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut TodoApi<T> {
        &mut self.api
    }
}
