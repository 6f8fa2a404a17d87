//! To-do list management
//!
//! Items carry due dates, priorities, categories, and reminders, and are
//! persisted as a single JSON document.

pub mod item;
pub mod store;

pub use item::{Priority, TodoItem};
pub use store::TodoStore;
