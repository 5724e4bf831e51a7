pub mod theme;
pub mod todo;
