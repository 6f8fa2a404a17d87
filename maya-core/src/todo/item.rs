//! To-do item data structures

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task priority, stored as the numeric codes 1 (high) to 3 (low)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Display name of the priority level
    pub fn name(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            other => Err(format!("invalid priority code: {}", other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        match priority {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    /// Task title
    pub title: String,
    /// Optional detailed description
    #[serde(default)]
    pub description: String,
    /// Due date
    #[serde(default, deserialize_with = "de_opt_date")]
    pub due_date: Option<NaiveDate>,
    /// Priority level
    #[serde(default)]
    pub priority: Priority,
    /// Completion state
    #[serde(default)]
    pub completed: bool,
    /// Category, e.g. Work, Personal, Shopping
    #[serde(default = "default_category")]
    pub category: String,
    /// Reminder timestamp (local time)
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub reminder: Option<NaiveDateTime>,
    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    "General".to_string()
}

// Older to-do files store absent dates as empty strings.
fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

// Accepts both minute-precision ("2025-06-25T10:00") and full timestamps.
fn de_opt_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
            .or_else(|_| s.parse())
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl TodoItem {
    /// Create a new item with default priority and category
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            completed: false,
            category: default_category(),
            reminder: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the task's due date has passed
    pub fn is_overdue(&self) -> bool {
        if self.completed {
            return false;
        }
        match self.due_date {
            Some(due) => due < Local::now().date_naive(),
            None => false,
        }
    }

    /// Whether the task is due today
    pub fn is_due_today(&self) -> bool {
        if self.completed {
            return false;
        }
        self.due_date == Some(Local::now().date_naive())
    }

    /// Whether a reminder should fire for this task
    pub fn needs_reminder(&self) -> bool {
        if self.completed {
            return false;
        }
        match self.reminder {
            Some(reminder) => reminder <= Local::now().naive_local(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_priority_codes_round_trip() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "1");
        let back: Priority = serde_json::from_str("3").unwrap();
        assert_eq!(back, Priority::Low);
        assert!(serde_json::from_str::<Priority>("7").is_err());
    }

    #[test]
    fn test_overdue() {
        let mut item = TodoItem::new("pay rent");
        assert!(!item.is_overdue());

        item.due_date = Some(Local::now().date_naive() - Duration::days(1));
        assert!(item.is_overdue());

        item.completed = true;
        assert!(!item.is_overdue());
    }

    #[test]
    fn test_due_today() {
        let mut item = TodoItem::new("water plants");
        item.due_date = Some(Local::now().date_naive());
        assert!(item.is_due_today());
        assert!(!item.is_overdue());
    }

    #[test]
    fn test_needs_reminder() {
        let mut item = TodoItem::new("standup");
        item.reminder = Some(Local::now().naive_local() - Duration::minutes(5));
        assert!(item.needs_reminder());

        item.reminder = Some(Local::now().naive_local() + Duration::hours(1));
        assert!(!item.needs_reminder());
    }

    #[test]
    fn test_deserializes_legacy_empty_dates() {
        let json = r#"{
            "title": "old task",
            "due_date": "",
            "priority": 2,
            "reminder": "2025-06-25T10:00"
        }"#;
        let item: TodoItem = serde_json::from_str(json).unwrap();
        assert!(item.due_date.is_none());
        assert_eq!(item.priority, Priority::Medium);
        assert!(item.reminder.is_some());
        assert_eq!(item.category, "General");
    }
}
