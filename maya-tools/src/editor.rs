//! Editor bridge for opening files and folders in a code editor

use crate::base::{Result, Tool, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Well-known install locations checked after PATH lookup fails
const FALLBACK_PATHS: &[&str] = &[
    "/usr/bin/code",
    "/usr/local/bin/code",
    "/Applications/Visual Studio Code.app/Contents/Resources/app/bin/code",
];

/// Bridge to a `code`-compatible editor CLI.
///
/// Discovery order: the configured command, then `code` on PATH, then
/// well-known install locations. All launch methods degrade gracefully
/// when no editor is found.
#[derive(Debug, Clone)]
pub struct EditorBridge {
    command: Option<PathBuf>,
}

impl EditorBridge {
    /// Discover the editor CLI, preferring the configured command
    pub fn discover(configured: Option<&str>) -> Self {
        let command = Self::locate(configured);
        match &command {
            Some(path) => debug!(editor = %path.display(), "editor CLI found"),
            None => warn!("no editor CLI found, open commands will be unavailable"),
        }
        Self { command }
    }

    fn locate(configured: Option<&str>) -> Option<PathBuf> {
        if let Some(cmd) = configured.filter(|c| !c.trim().is_empty()) {
            if let Ok(path) = which::which(cmd) {
                return Some(path);
            }
            let path = PathBuf::from(cmd);
            if path.is_file() {
                return Some(path);
            }
            warn!(command = cmd, "configured editor command not found");
        }

        if let Ok(path) = which::which("code") {
            return Some(path);
        }

        FALLBACK_PATHS
            .iter()
            .copied()
            .map(PathBuf::from)
            .find(|p| p.is_file())
    }

    /// Whether an editor CLI was found
    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }

    /// The discovered editor path, if any
    pub fn command(&self) -> Option<&Path> {
        self.command.as_deref()
    }

    fn require_command(&self) -> Result<&Path> {
        self.command
            .as_deref()
            .ok_or_else(|| ToolError::ExecutionFailed("No editor CLI available".to_string()))
    }

    async fn launch(&self, args: &[String]) -> Result<()> {
        let command = self.require_command()?;
        Command::new(command)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to launch editor: {}", e)))?;
        Ok(())
    }

    /// Open a file, optionally jumping to a line and column (1-based)
    pub async fn open_file(
        &self,
        path: &Path,
        line: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        let resolved = path
            .canonicalize()
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to resolve path: {}", e)))?;

        let args = match line {
            Some(line) => {
                let target = match column {
                    Some(col) => format!("{}:{}:{}", resolved.display(), line, col),
                    None => format!("{}:{}", resolved.display(), line),
                };
                vec!["--goto".to_string(), target]
            }
            None => vec![resolved.display().to_string()],
        };

        self.launch(&args).await
    }

    /// Open a folder in a new editor window
    pub async fn open_folder(&self, path: &Path) -> Result<()> {
        let resolved = path
            .canonicalize()
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to resolve path: {}", e)))?;
        if !resolved.is_dir() {
            return Err(ToolError::InvalidParams(format!(
                "Not a directory: {}",
                path.display()
            )));
        }

        self.launch(&[
            "--new-window".to_string(),
            resolved.display().to_string(),
        ])
        .await
    }

    /// Open a side-by-side diff of two files
    pub async fn diff(&self, left: &Path, right: &Path) -> Result<()> {
        self.launch(&[
            "--diff".to_string(),
            left.display().to_string(),
            right.display().to_string(),
        ])
        .await
    }
}

/// Tool wrapper so the editor can be invoked from the tool registry
pub struct OpenInEditorTool {
    bridge: EditorBridge,
}

impl OpenInEditorTool {
    /// Create a new open-in-editor tool
    pub fn new(bridge: EditorBridge) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for OpenInEditorTool {
    fn name(&self) -> &str {
        "open_in_editor"
    }

    fn description(&self) -> &str {
        "Open a file or folder in the configured code editor, optionally at a line."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File or folder path to open"
                },
                "line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Line number to jump to (files only)"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let path = params
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams("Missing 'path' parameter".to_string()))?;
        let line = params.get("line").and_then(|v| v.as_u64()).map(|l| l as u32);

        let target = PathBuf::from(path);
        if target.is_dir() {
            self.bridge.open_folder(&target).await?;
            Ok(format!("Opened folder {} in editor", path))
        } else {
            self.bridge.open_file(&target, line, None).await?;
            match line {
                Some(l) => Ok(format!("Opened {} at line {} in editor", path, l)),
                None => Ok(format!("Opened {} in editor", path)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable_bridge() -> EditorBridge {
        EditorBridge { command: None }
    }

    #[test]
    fn test_locate_rejects_missing_configured_command() {
        let bridge = EditorBridge::discover(Some("definitely-not-an-editor-9f2a"));
        // Falls back to PATH/well-known lookup, never errors
        let _ = bridge.is_available();
    }

    #[tokio::test]
    async fn test_open_file_without_editor() {
        let bridge = unavailable_bridge();
        let err = bridge
            .open_file(Path::new("/tmp/whatever.txt"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }

    #[tokio::test]
    async fn test_diff_without_editor() {
        let bridge = unavailable_bridge();
        let err = bridge
            .diff(Path::new("/tmp/a.txt"), Path::new("/tmp/b.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }

    #[tokio::test]
    async fn test_diff_launches_discovered_command() {
        // A harmless binary stands in for the editor CLI
        let command = match which::which("true") {
            Ok(path) => path,
            Err(_) => return,
        };
        let bridge = EditorBridge {
            command: Some(command),
        };
        bridge
            .diff(Path::new("/tmp/a.txt"), Path::new("/tmp/b.txt"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_tool_reports_missing_editor() {
        let tool = OpenInEditorTool::new(unavailable_bridge());
        let err = tool
            .execute(json!({ "path": "/tmp/whatever.txt" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }
}
