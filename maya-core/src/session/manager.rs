//! Named transcript storage

use super::store::ConversationSession;
use crate::error::{Error, Result};
use crate::utils::safe_filename;
use std::path::{Path, PathBuf};

/// Manages named transcripts in a directory
#[derive(Debug)]
pub struct TranscriptManager {
    transcripts_dir: PathBuf,
}

impl TranscriptManager {
    /// Create a manager rooted at `<data_dir>/transcripts`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            transcripts_dir: data_dir.as_ref().join("transcripts"),
        }
    }

    /// Save a session under a name, creating the directory if needed
    pub fn save(&self, name: &str, session: &ConversationSession) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.transcripts_dir)?;
        let path = self.transcript_path(name);
        session.save(&path)?;
        Ok(path)
    }

    /// Load a named transcript into a session
    pub fn load(&self, name: &str, session: &mut ConversationSession) -> Result<()> {
        let path = self.transcript_path(name);
        if !path.exists() {
            return Err(Error::NotFound(format!("transcript '{}'", name)));
        }
        session.load(&path)
    }

    /// Delete a named transcript. Returns false if it did not exist.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.transcript_path(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// List saved transcripts, most recently updated first
    pub fn list(&self) -> Vec<TranscriptInfo> {
        let mut transcripts = Vec::new();

        let Ok(entries) = std::fs::read_dir(&self.transcripts_dir) else {
            return transcripts;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".jsonl"))
            else {
                continue;
            };

            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            let Some(first_line) = content.lines().next() else {
                continue;
            };
            let Ok(value) = serde_json::from_str::<serde_json::Value>(first_line) else {
                continue;
            };
            if value.get("_type").and_then(|v| v.as_str()) != Some("transcript") {
                continue;
            }

            transcripts.push(TranscriptInfo {
                name: name.to_string(),
                updated_at: value
                    .get("updated_at")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                model: value
                    .get("model")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                path,
            });
        }

        transcripts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        transcripts
    }

    fn transcript_path(&self, name: &str) -> PathBuf {
        self.transcripts_dir
            .join(format!("{}.jsonl", safe_filename(name)))
    }
}

/// Metadata about a saved transcript
#[derive(Debug, Clone)]
pub struct TranscriptInfo {
    /// Transcript name
    pub name: String,
    /// Last update time (RFC 3339)
    pub updated_at: Option<String>,
    /// Model recorded at save time
    pub model: Option<String>,
    /// File path
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{Role, SessionConfig};
    use tempfile::TempDir;

    fn session() -> ConversationSession {
        ConversationSession::new(SessionConfig {
            system_prompt: Some("You are MAYA.".to_string()),
            ..SessionConfig::default()
        })
    }

    #[test]
    fn test_empty_manager_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let manager = TranscriptManager::new(temp_dir.path());
        assert!(manager.list().is_empty());
    }

    #[test]
    fn test_save_list_load_delete() {
        let temp_dir = TempDir::new().unwrap();
        let manager = TranscriptManager::new(temp_dir.path());

        let mut original = session();
        original.append(Role::User, "remember this");
        manager.save("monday chat", &original).unwrap();

        let listed = manager.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "monday_chat");

        let mut restored = session();
        manager.load("monday chat", &mut restored).unwrap();
        assert_eq!(restored.messages()[0].content, "remember this");

        assert!(manager.delete("monday chat").unwrap());
        assert!(!manager.delete("monday chat").unwrap());
    }

    #[test]
    fn test_load_missing_transcript() {
        let temp_dir = TempDir::new().unwrap();
        let manager = TranscriptManager::new(temp_dir.path());

        let mut target = session();
        let err = manager.load("nope", &mut target).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
