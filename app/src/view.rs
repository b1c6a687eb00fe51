//! The view tree: `App` wraps a header around `TodoList`.
//!
//! Views read through the `TodoApi` hooks on every draw and never hold todo
//! data of their own; after a write the hook refetches because the list tag
//! was invalidated.

use std::io::{self, Write};

use log::debug;
use todo_core::{ApiError, NewTodo, Todo, TodoApi, TodoId, TodoPatch, Transport};

use crate::error::EventError;

pub const USAGE: &str = "commands: add <title> | toggle <id> | delete <id> | refresh | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Add(String),
    Toggle(TodoId),
    Delete(TodoId),
    Refresh,
    Quit,
}

impl Event {
    pub fn parse(line: &str) -> Result<Self, EventError> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match command {
            "add" if rest.is_empty() => Err(EventError::MissingTitle),
            "add" => Ok(Event::Add(rest.to_string())),
            "toggle" => parse_id(rest).map(Event::Toggle),
            "delete" => parse_id(rest).map(Event::Delete),
            "refresh" => Ok(Event::Refresh),
            "quit" | "exit" => Ok(Event::Quit),
            other => Err(EventError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_id(s: &str) -> Result<TodoId, EventError> {
    s.parse().map_err(|_| EventError::InvalidId(s.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait View<T> {
    fn render(&mut self, api: &mut TodoApi<T>, out: &mut dyn Write) -> io::Result<()>;

    fn handle(&mut self, event: Event, api: &mut TodoApi<T>) -> Flow;
}

/// Lists todos newest first and turns events into mutations.
#[derive(Debug, Default)]
pub struct TodoList {
    last_error: Option<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    fn record<V>(&mut self, action: &str, result: Result<V, ApiError>) {
        self.last_error = result.err().map(|err| format!("{action} failed: {err}"));
    }
}

fn render_todo(todo: &Todo, out: &mut dyn Write) -> io::Result<()> {
    let mark = if todo.completed { 'x' } else { ' ' };
    writeln!(out, "[{mark}] #{} {}", todo.id, todo.title)
}

impl<T: Transport> View<T> for TodoList {
    fn render(&mut self, api: &mut TodoApi<T>, out: &mut dyn Write) -> io::Result<()> {
        let state = api.get_todos();
        if state.is_loading() {
            writeln!(out, "Loading...")?;
        } else if let Some(todos) = &state.data {
            if todos.is_empty() {
                writeln!(out, "No todos yet.")?;
            }
            for todo in todos {
                render_todo(todo, out)?;
            }
        }
        if let Some(err) = &state.error {
            writeln!(out, "Error: {err}")?;
        }
        if let Some(msg) = &self.last_error {
            writeln!(out, "! {msg}")?;
        }
        Ok(())
    }

    fn handle(&mut self, event: Event, api: &mut TodoApi<T>) -> Flow {
        debug!("handling {event:?}");
        match event {
            Event::Add(title) => {
                let result = api.add_todo(&NewTodo::new(title)).into_result();
                self.record("add", result);
            }
            Event::Toggle(id) => {
                let current = api
                    .todos_state()
                    .data
                    .and_then(|todos| todos.into_iter().find(|t| t.id == id));
                match current {
                    Some(todo) => {
                        let patch = TodoPatch::from(Todo {
                            completed: !todo.completed,
                            ..todo
                        });
                        let result = api.update_todo(&patch).into_result();
                        self.record("toggle", result);
                    }
                    None => self.last_error = Some(format!("no todo #{id}")),
                }
            }
            Event::Delete(id) => {
                let result = api.delete_todo(id).into_result();
                self.record("delete", result);
            }
            Event::Refresh => {
                let state = api.refetch_todos();
                self.last_error = None;
                debug!("refetched list: {:?}", state.status);
            }
            Event::Quit => return Flow::Exit,
        }
        Flow::Continue
    }
}

/// Root of the view tree.
#[derive(Debug, Default)]
pub struct App {
    list: TodoList,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Transport> View<T> for App {
    fn render(&mut self, api: &mut TodoApi<T>, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Todo List")?;
        writeln!(out, "=========")?;
        self.list.render(api, out)?;
        writeln!(out)?;
        writeln!(out, "{USAGE}")
    }

    fn handle(&mut self, event: Event, api: &mut TodoApi<T>) -> Flow {
        self.list.handle(event, api)
    }
}
