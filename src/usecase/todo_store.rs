use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::domain::todo::{Todo, TodoId};
use crate::repo::KeyValueStore;

pub const TODOS_KEY: &str = "todos";

/// What a listener is told after a mutation has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Hydrated,
    Added(TodoId),
    Toggled(TodoId),
    Removed(TodoId),
}

type Listener = Box<dyn FnMut(&Change, &[Todo])>;

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Hands out wall-clock ids that never repeat.
///
/// An id is the current time in milliseconds, bumped to `last + 1` whenever
/// the clock has not moved past the previous id (same tick, or a clock that
/// stepped backwards).
pub struct IdGenerator {
    clock: Box<dyn Fn() -> u64>,
    last: u64,
}

impl IdGenerator {
    pub fn system() -> Self {
        Self::with_clock(now_millis)
    }

    pub fn with_clock(clock: impl Fn() -> u64 + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last: 0,
        }
    }

    /// Make sure future ids land after `id`.
    pub fn observe(&mut self, id: TodoId) {
        self.last = self.last.max(id.0);
    }

    pub fn next_id(&mut self) -> TodoId {
        let id = (self.clock)().max(self.last.saturating_add(1));
        self.last = id;
        TodoId(id)
    }
}

/// The task list together with its persisted mirror under [`TODOS_KEY`].
///
/// Every mutation encodes the whole candidate list and writes it before
/// swapping it in, so memory and storage agree after each call returns,
/// including when the write fails.
pub struct TodoStore<S: KeyValueStore> {
    kv: S,
    todos: Vec<Todo>,
    ids: IdGenerator,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> TodoStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_id_generator(kv, IdGenerator::system())
    }

    pub fn with_id_generator(kv: S, ids: IdGenerator) -> Self {
        Self {
            kv,
            todos: Vec::new(),
            ids,
            listeners: Vec::new(),
        }
    }

    /// Load the persisted list, falling back to empty on any problem.
    pub fn hydrate(&mut self) {
        let todos = match self.read() {
            Ok(todos) => todos,
            Err(err) => {
                let msg = format!("{err:#}");
                tracing::warn!(error = %msg, "starting with empty todos");
                Vec::new()
            }
        };
        self.replace(todos);
    }

    /// Re-read the persisted list while running.
    ///
    /// Unlike [`hydrate`](Self::hydrate), a failed read or an undecodable
    /// value is returned as an error and the current list is kept, so the
    /// next write cannot clobber storage with an empty list.
    pub fn reload(&mut self) -> Result<()> {
        let todos = self.read()?;
        self.replace(todos);
        Ok(())
    }

    fn read(&self) -> Result<Vec<Todo>> {
        let raw = self.kv.get(TODOS_KEY).context("failed to read todos")?;
        match raw {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn replace(&mut self, todos: Vec<Todo>) {
        for todo in &todos {
            self.ids.observe(todo.id);
        }
        tracing::debug!(count = todos.len(), "hydrated todos");
        self.todos = todos;
        self.notify(Change::Hydrated);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Change, &[Todo]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// `(open, total)`
    pub fn counts(&self) -> (usize, usize) {
        let done = self.todos.iter().filter(|t| t.completed).count();
        (self.todos.len() - done, self.todos.len())
    }

    /// Prepend a new task. Blank input is ignored and yields `Ok(None)`.
    pub fn add(&mut self, raw: &str) -> Result<Option<TodoId>> {
        let id = self.ids.next_id();
        let Some(todo) = Todo::new(id, raw) else {
            return Ok(None);
        };
        let mut next = Vec::with_capacity(self.todos.len() + 1);
        next.push(todo);
        next.extend(self.todos.iter().cloned());
        self.commit(next, Change::Added(id))?;
        Ok(Some(id))
    }

    /// Flip completion. Returns `false` when no task has `id`.
    pub fn toggle(&mut self, id: TodoId) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.todos.clone();
        next[pos].completed = !next[pos].completed;
        self.commit(next, Change::Toggled(id))?;
        Ok(true)
    }

    /// Remove a task. Returns `false` when no task has `id`.
    pub fn remove(&mut self, id: TodoId) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.todos.clone();
        next.remove(pos);
        self.commit(next, Change::Removed(id))?;
        Ok(true)
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    fn commit(&mut self, next: Vec<Todo>, change: Change) -> Result<()> {
        let json = serde_json::to_string(&next).context("failed to encode todos")?;
        self.kv
            .set(TODOS_KEY, &json)
            .context("failed to persist todos")?;
        tracing::debug!(?change, count = next.len(), "persisted todos");
        self.todos = next;
        self.notify(change);
        Ok(())
    }

    fn notify(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(&change, &self.todos);
        }
    }
}

/// Parse the stored array, skipping elements that are not valid todos.
fn decode(raw: &str) -> Result<Vec<Todo>> {
    let parsed: Vec<serde_json::Value> = serde_json::from_str::<Option<Vec<_>>>(raw)
        .context("malformed todos")?
        .unwrap_or_default();

    let total = parsed.len();
    let mut seen = HashSet::with_capacity(total);
    let todos: Vec<Todo> = parsed
        .into_iter()
        .filter_map(|value| serde_json::from_value::<Todo>(value).ok())
        .filter(|t| !t.text.trim().is_empty() && seen.insert(t.id))
        .collect();
    if todos.len() != total {
        tracing::warn!(dropped = total - todos.len(), "dropped invalid, blank or duplicate todos");
    }
    Ok(todos)
}
