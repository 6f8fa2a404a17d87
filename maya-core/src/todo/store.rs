//! To-do persistence and queries

use super::item::TodoItem;
use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const DEFAULT_CATEGORIES: [&str; 4] = ["General", "Work", "Personal", "Shopping"];

/// On-disk shape of the to-do file
#[derive(Debug, Serialize, Deserialize)]
struct TodoFile {
    todos: Vec<TodoItem>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    saved_at: Option<String>,
}

/// A collection of to-do items with JSON persistence
#[derive(Debug)]
pub struct TodoStore {
    path: PathBuf,
    todos: Vec<TodoItem>,
    categories: BTreeSet<String>,
}

impl TodoStore {
    /// Open a store backed by the given file, loading it if present
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut store = Self {
            path,
            todos: Vec::new(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        };

        if store.path.exists() {
            let content = std::fs::read_to_string(&store.path)?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| Error::Serialization(format!("invalid to-do file: {}", e)))?;

            if value.is_array() {
                // Legacy format: a bare array of items
                store.todos = serde_json::from_value(value)?;
            } else {
                let file: TodoFile = serde_json::from_value(value)?;
                store.todos = file.todos;
                store.categories.extend(file.categories);
            }
            store
                .categories
                .extend(store.todos.iter().map(|t| t.category.clone()));
        }

        Ok(store)
    }

    /// Persist the store to its backing file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = TodoFile {
            todos: self.todos.clone(),
            categories: self.categories.iter().cloned().collect(),
            saved_at: Some(Utc::now().to_rfc3339()),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Add an item and persist
    pub fn add(&mut self, item: TodoItem) -> Result<()> {
        if !item.category.is_empty() {
            self.categories.insert(item.category.clone());
        }
        self.todos.push(item);
        self.save()
    }

    /// Replace the item at `index` and persist
    pub fn update(&mut self, index: usize, mut item: TodoItem) -> Result<()> {
        let slot = self
            .todos
            .get_mut(index)
            .ok_or_else(|| Error::NotFound(format!("to-do #{}", index)))?;
        if !item.category.is_empty() {
            self.categories.insert(item.category.clone());
        }
        item.updated_at = Utc::now();
        *slot = item;
        self.save()
    }

    /// Delete the item at `index` and persist
    pub fn delete(&mut self, index: usize) -> Result<TodoItem> {
        if index >= self.todos.len() {
            return Err(Error::NotFound(format!("to-do #{}", index)));
        }
        let removed = self.todos.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Toggle completion of the item at `index` and persist
    pub fn toggle_complete(&mut self, index: usize) -> Result<bool> {
        let item = self
            .todos
            .get_mut(index)
            .ok_or_else(|| Error::NotFound(format!("to-do #{}", index)))?;
        item.completed = !item.completed;
        item.updated_at = Utc::now();
        let now_completed = item.completed;
        self.save()?;
        Ok(now_completed)
    }

    /// All items, insertion order
    pub fn all(&self) -> &[TodoItem] {
        &self.todos
    }

    /// Items in a category, or all items when `category` is None
    pub fn by_category(&self, category: Option<&str>) -> Vec<&TodoItem> {
        match category {
            None => self.todos.iter().collect(),
            Some(cat) => self.todos.iter().filter(|t| t.category == cat).collect(),
        }
    }

    /// Items past their due date
    pub fn overdue(&self) -> Vec<&TodoItem> {
        self.todos.iter().filter(|t| t.is_overdue()).collect()
    }

    /// Uncompleted items due today
    pub fn due_today(&self) -> Vec<&TodoItem> {
        self.todos.iter().filter(|t| t.is_due_today()).collect()
    }

    /// Uncompleted items whose reminder time has passed
    pub fn pending_reminders(&self) -> Vec<&TodoItem> {
        self.todos.iter().filter(|t| t.needs_reminder()).collect()
    }

    /// Sorted category names
    pub fn categories(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::item::Priority;
    use chrono::{Duration, Local};
    use tempfile::TempDir;

    fn item(title: &str) -> TodoItem {
        TodoItem::new(title)
    }

    #[test]
    fn test_add_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");

        let mut store = TodoStore::open(&path).unwrap();
        let mut task = item("buy milk");
        task.priority = Priority::High;
        task.category = "Shopping".to_string();
        store.add(task).unwrap();

        let reloaded = TodoStore::open(&path).unwrap();
        assert_eq!(reloaded.all().len(), 1);
        assert_eq!(reloaded.all()[0].title, "buy milk");
        assert_eq!(reloaded.all()[0].priority, Priority::High);
    }

    #[test]
    fn test_toggle_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");

        let mut store = TodoStore::open(&path).unwrap();
        store.add(item("one")).unwrap();
        store.add(item("two")).unwrap();

        assert!(store.toggle_complete(0).unwrap());
        assert!(!store.toggle_complete(0).unwrap());

        let removed = store.delete(0).unwrap();
        assert_eq!(removed.title, "one");
        assert_eq!(store.all().len(), 1);

        assert!(matches!(store.delete(5), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_category_tracking() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");

        let mut store = TodoStore::open(&path).unwrap();
        let mut task = item("file taxes");
        task.category = "Finance".to_string();
        store.add(task).unwrap();

        let categories = store.categories();
        assert!(categories.contains(&"Finance".to_string()));
        assert!(categories.contains(&"General".to_string()));
        assert_eq!(store.by_category(Some("Finance")).len(), 1);
        assert_eq!(store.by_category(Some("Work")).len(), 0);
    }

    #[test]
    fn test_overdue_and_due_today() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");

        let mut store = TodoStore::open(&path).unwrap();
        let today = Local::now().date_naive();

        let mut late = item("late");
        late.due_date = Some(today - Duration::days(2));
        store.add(late).unwrap();

        let mut today_task = item("today");
        today_task.due_date = Some(today);
        store.add(today_task).unwrap();

        assert_eq!(store.overdue().len(), 1);
        assert_eq!(store.due_today().len(), 1);
        assert_eq!(store.due_today()[0].title, "today");
    }

    #[test]
    fn test_loads_legacy_array_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");
        std::fs::write(
            &path,
            r#"[{"title":"legacy","priority":1,"category":"Work"}]"#,
        )
        .unwrap();

        let store = TodoStore::open(&path).unwrap();
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].priority, Priority::High);
        assert!(store.categories().contains(&"Work".to_string()));
    }

    #[test]
    fn test_malformed_file_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");
        std::fs::write(&path, "{{not json").unwrap();

        let err = TodoStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
