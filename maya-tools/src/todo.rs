//! To-do tool backed by the shared task store

use crate::base::{Result, Tool, ToolError};
use async_trait::async_trait;
use chrono::NaiveDate;
use maya_core::todo::{Priority, TodoItem, TodoStore};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Tool exposing the task list: add, list, complete, remove.
///
/// The store is opened lazily on first use so the tool can be registered
/// before the data directory exists.
pub struct TodoTool {
    path: PathBuf,
    store: Mutex<Option<TodoStore>>,
}

impl TodoTool {
    /// Create a to-do tool persisting at the given file path
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            store: Mutex::new(None),
        }
    }

    fn format_item(index: usize, item: &TodoItem) -> String {
        let mark = if item.completed { "x" } else { " " };
        let mut line = format!(
            "{}. [{}] {} ({}, {})",
            index + 1,
            mark,
            item.title,
            item.priority.name(),
            item.category
        );
        if let Some(due) = item.due_date {
            line.push_str(&format!(", due {}", due));
        }
        if item.is_overdue() {
            line.push_str(" OVERDUE");
        }
        line
    }
}

fn parse_action(params: &Value) -> Result<&str> {
    params
        .get("action")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParams("Missing 'action' parameter".to_string()))
}

fn parse_index(params: &Value, len: usize) -> Result<usize> {
    let number = params
        .get("number")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| ToolError::InvalidParams("Missing 'number' parameter".to_string()))?;
    if number == 0 || number as usize > len {
        return Err(ToolError::InvalidParams(format!(
            "Task number {} is out of range (1-{})",
            number, len
        )));
    }
    Ok(number as usize - 1)
}

#[async_trait]
impl Tool for TodoTool {
    fn name(&self) -> &str {
        "todo"
    }

    fn description(&self) -> &str {
        "Manage the task list. Actions: add, list, complete, remove."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["add", "list", "complete", "remove"],
                    "description": "Operation to perform"
                },
                "title": {
                    "type": "string",
                    "description": "Task title (for add)"
                },
                "due_date": {
                    "type": "string",
                    "description": "Due date YYYY-MM-DD (for add)"
                },
                "priority": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 3,
                    "description": "1 high, 2 medium, 3 low (for add)"
                },
                "category": {
                    "type": "string",
                    "description": "Task category (for add and list)"
                },
                "number": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Task number (for complete and remove)"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let mut guard = self.store.lock().await;
        if guard.is_none() {
            let store = TodoStore::open(&self.path)
                .map_err(|e| ToolError::ExecutionFailed(format!("Failed to open tasks: {}", e)))?;
            *guard = Some(store);
        }
        let store = guard.as_mut().unwrap();

        match parse_action(&params)? {
            "add" => {
                let title = params
                    .get("title")
                    .and_then(|v| v.as_str())
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| {
                        ToolError::InvalidParams("Missing 'title' parameter".to_string())
                    })?;

                let mut item = TodoItem::new(title.trim());
                if let Some(due) = params.get("due_date").and_then(|v| v.as_str()) {
                    item.due_date = Some(due.parse::<NaiveDate>().map_err(|e| {
                        ToolError::InvalidParams(format!("Invalid due date '{}': {}", due, e))
                    })?);
                }
                if let Some(code) = params.get("priority").and_then(|v| v.as_u64()) {
                    item.priority = Priority::try_from(code as u8)
                        .map_err(ToolError::InvalidParams)?;
                }
                if let Some(category) = params.get("category").and_then(|v| v.as_str()) {
                    if !category.trim().is_empty() {
                        item.category = category.trim().to_string();
                    }
                }

                let title = item.title.clone();
                store
                    .add(item)
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                Ok(format!("Added task: {}", title))
            }
            "list" => {
                let category = params.get("category").and_then(|v| v.as_str());
                let items = store.by_category(category);
                if items.is_empty() {
                    return Ok(match category {
                        Some(c) => format!("No tasks in category {}", c),
                        None => "No tasks yet".to_string(),
                    });
                }

                // Numbers must match positions in the full list so that
                // complete/remove accept them unchanged.
                let lines: Vec<String> = store
                    .all()
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| {
                        category.map_or(true, |c| item.category == c)
                    })
                    .map(|(i, item)| Self::format_item(i, item))
                    .collect();
                Ok(lines.join("\n"))
            }
            "complete" => {
                let index = parse_index(&params, store.all().len())?;
                let title = store.all()[index].title.clone();
                let completed = store
                    .toggle_complete(index)
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                if completed {
                    Ok(format!("Completed task: {}", title))
                } else {
                    Ok(format!("Reopened task: {}", title))
                }
            }
            "remove" => {
                let index = parse_index(&params, store.all().len())?;
                let removed = store
                    .delete(index)
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                Ok(format!("Removed task: {}", removed.title))
            }
            other => Err(ToolError::InvalidParams(format!(
                "Unknown action: {}",
                other
            ))),
        }
    }
}
