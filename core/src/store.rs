//! The todo store.
//!
//! [`TodoStore`] is the capability handlers depend on; [`InMemoryTodoStore`]
//! is the only implementation. The store owns every record and hands out
//! clones, so callers never hold references into the collection.

use crate::environment::{Clock, IdGenerator, SequentialIdGenerator, SystemClock};
use crate::error::TodoError;
use crate::filter::TodoFilter;
use crate::todo::{Todo, TodoId, TodoUpdate};
use crate::TodoResult;
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Create/read/update/delete/filter operations over todo records.
///
/// All operations are synchronous and must be safe to call from concurrently
/// running requests.
pub trait TodoStore: Send + Sync {
    /// Create a todo from `text` (trimmed).
    ///
    /// # Errors
    ///
    /// [`TodoError::Validation`] if the trimmed text is empty,
    /// [`TodoError::IdsExhausted`] if no identifier can be assigned.
    fn create(&self, text: &str) -> TodoResult<Todo>;

    /// Look up a live todo.
    ///
    /// # Errors
    ///
    /// [`TodoError::NotFound`] if no live todo has this id.
    fn get_by_id(&self, id: TodoId) -> TodoResult<Todo>;

    /// All live todos passing `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// [`TodoError::Unavailable`] if the store cannot be read.
    fn find(&self, filter: &TodoFilter) -> TodoResult<Vec<Todo>>;

    /// Number of todos [`find`](Self::find) would return.
    ///
    /// # Errors
    ///
    /// [`TodoError::Unavailable`] if the store cannot be read.
    fn count(&self, filter: &TodoFilter) -> TodoResult<usize> {
        self.find(filter).map(|todos| todos.len())
    }

    /// Apply the fields present in `update` to a live todo.
    ///
    /// # Errors
    ///
    /// [`TodoError::NotFound`] if no live todo has this id,
    /// [`TodoError::Validation`] if the new text is empty.
    fn update(&self, id: TodoId, update: TodoUpdate) -> TodoResult<Todo>;

    /// Soft-delete a live todo.
    ///
    /// # Errors
    ///
    /// [`TodoError::NotFound`] if no live todo has this id (including one
    /// that is already deleted).
    fn delete(&self, id: TodoId) -> TodoResult<()>;

    /// Soft-delete every live todo whose id is in `ids`.
    ///
    /// Matching todos are deleted even when the call fails.
    ///
    /// # Errors
    ///
    /// [`TodoError::PartialFailure`] if fewer live todos matched than
    /// distinct ids were requested.
    fn delete_many(&self, ids: &[TodoId]) -> TodoResult<()>;
}

/// Todo store keeping every record in memory, guarded by a lock.
pub struct InMemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryTodoStore {
    /// Create an empty store using the system clock and ids starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_environment(Arc::new(SystemClock), Arc::new(SequentialIdGenerator::new()))
    }

    /// Create an empty store with injected time and id sources.
    #[must_use]
    pub fn with_environment(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            todos: RwLock::new(Vec::new()),
            clock,
            ids,
        }
    }

    /// Total number of stored records, deleted ones included.
    ///
    /// # Errors
    ///
    /// [`TodoError::Unavailable`] if the store cannot be read.
    pub fn stored_len(&self) -> TodoResult<usize> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> TodoResult<RwLockReadGuard<'_, Vec<Todo>>> {
        self.todos.read().map_err(|_| {
            tracing::error!("Todo store lock poisoned");
            TodoError::Unavailable
        })
    }

    fn write(&self) -> TodoResult<RwLockWriteGuard<'_, Vec<Todo>>> {
        self.todos.write().map_err(|_| {
            tracing::error!("Todo store lock poisoned");
            TodoError::Unavailable
        })
    }

    fn validate_text(text: &str) -> TodoResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::validation("todo text is required"));
        }
        Ok(text.to_string())
    }
}

impl Default for InMemoryTodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTodoStore")
            .field("todos", &self.todos)
            .finish_non_exhaustive()
    }
}

fn live_mut(todos: &mut [Todo], id: TodoId) -> TodoResult<&mut Todo> {
    todos
        .iter_mut()
        .find(|t| t.id == id && t.is_live())
        .ok_or(TodoError::NotFound(id))
}

impl TodoStore for InMemoryTodoStore {
    fn create(&self, text: &str) -> TodoResult<Todo> {
        let text = Self::validate_text(text)?;
        let mut todos = self.write()?;

        let id = self.ids.next_id().ok_or(TodoError::IdsExhausted)?;
        let todo = Todo::new(id, text, self.clock.now());
        todos.push(todo.clone());

        tracing::debug!(id = %todo.id, "Todo created");
        Ok(todo)
    }

    fn get_by_id(&self, id: TodoId) -> TodoResult<Todo> {
        self.read()?
            .iter()
            .find(|t| t.id == id && t.is_live())
            .cloned()
            .ok_or(TodoError::NotFound(id))
    }

    fn find(&self, filter: &TodoFilter) -> TodoResult<Vec<Todo>> {
        Ok(self
            .read()?
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    fn count(&self, filter: &TodoFilter) -> TodoResult<usize> {
        Ok(self.read()?.iter().filter(|t| filter.matches(t)).count())
    }

    fn update(&self, id: TodoId, update: TodoUpdate) -> TodoResult<Todo> {
        if update.is_empty() {
            return self.get_by_id(id);
        }
        let text = update.text.as_deref().map(Self::validate_text).transpose()?;
        let mut todos = self.write()?;
        let todo = live_mut(&mut todos, id)?;

        if let Some(text) = text {
            todo.text = text;
        }
        if let Some(done) = update.done {
            todo.set_done(done, self.clock.now());
        }

        tracing::debug!(id = %id, done = todo.done, "Todo updated");
        Ok(todo.clone())
    }

    fn delete(&self, id: TodoId) -> TodoResult<()> {
        let mut todos = self.write()?;
        live_mut(&mut todos, id)?.soft_delete(self.clock.now());

        tracing::debug!(id = %id, "Todo deleted");
        Ok(())
    }

    fn delete_many(&self, ids: &[TodoId]) -> TodoResult<()> {
        let requested: HashSet<TodoId> = ids.iter().copied().collect();
        let now = self.clock.now();
        let mut todos = self.write()?;

        let mut deleted = 0;
        for todo in todos
            .iter_mut()
            .filter(|t| t.is_live() && requested.contains(&t.id))
        {
            todo.soft_delete(now);
            deleted += 1;
        }

        tracing::debug!(deleted, requested = requested.len(), "Todos deleted");
        if deleted != requested.len() {
            return Err(TodoError::PartialFailure {
                deleted,
                requested: requested.len(),
            });
        }
        Ok(())
    }
}
