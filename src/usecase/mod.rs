pub mod theme;
pub mod todo_store;
