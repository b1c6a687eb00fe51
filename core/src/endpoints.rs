//! Declarative endpoint table: which reads provide which cache tags and
//! which writes invalidate them.

use std::fmt;

/// Label grouping cached reads so a write can invalidate all of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Todos,
}

impl Tag {
    pub const ALL: [Tag; 1] = [Tag::Todos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Todos => "Todos",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetTodos,
    AddTodo,
    UpdateTodo,
    DeleteTodo,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::GetTodos,
        Endpoint::AddTodo,
        Endpoint::UpdateTodo,
        Endpoint::DeleteTodo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::GetTodos => "getTodos",
            Endpoint::AddTodo => "addTodo",
            Endpoint::UpdateTodo => "updateTodo",
            Endpoint::DeleteTodo => "deleteTodo",
        }
    }

    pub fn kind(&self) -> EndpointKind {
        match self {
            Endpoint::GetTodos => EndpointKind::Query,
            Endpoint::AddTodo | Endpoint::UpdateTodo | Endpoint::DeleteTodo => {
                EndpointKind::Mutation
            }
        }
    }

    pub fn provides_tags(&self) -> &'static [Tag] {
        match self {
            Endpoint::GetTodos => &[Tag::Todos],
            _ => &[],
        }
    }

    pub fn invalidates_tags(&self) -> &'static [Tag] {
        match self {
            Endpoint::GetTodos => &[],
            Endpoint::AddTodo | Endpoint::UpdateTodo | Endpoint::DeleteTodo => &[Tag::Todos],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
