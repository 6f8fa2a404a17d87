//! Filesystem tools: read, write, append, file info, list directory

use crate::base::{Result, Tool, ToolError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Resolve a path and optionally enforce a directory restriction
fn resolve_existing(path: &str, allowed_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let resolved = PathBuf::from(path)
        .canonicalize()
        .map_err(|e| ToolError::ExecutionFailed(format!("Failed to resolve {}: {}", path, e)))?;

    check_allowed(&resolved, path, allowed_dir)?;
    Ok(resolved)
}

/// Resolve a path that may not exist yet by canonicalizing its parent
fn resolve_for_write(path: &str, allowed_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let target = PathBuf::from(path);
    if target.exists() {
        return resolve_existing(path, allowed_dir);
    }

    let parent = target.parent().unwrap_or(Path::new("."));
    let parent_abs = if parent.as_os_str().is_empty() {
        std::env::current_dir().map_err(ToolError::Io)?
    } else if parent.exists() {
        parent
            .canonicalize()
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to resolve {}: {}", path, e)))?
    } else if parent.is_absolute() {
        parent.to_path_buf()
    } else {
        std::env::current_dir().map_err(ToolError::Io)?.join(parent)
    };

    let file_name = target
        .file_name()
        .ok_or_else(|| ToolError::InvalidParams(format!("Not a file path: {}", path)))?;
    let resolved = parent_abs.join(file_name);

    check_allowed(&resolved, path, allowed_dir)?;
    Ok(resolved)
}

fn check_allowed(resolved: &Path, original: &str, allowed_dir: Option<&PathBuf>) -> Result<()> {
    if let Some(allowed) = allowed_dir {
        let allowed_canonical = allowed.canonicalize().map_err(|e| {
            ToolError::ExecutionFailed(format!("Failed to resolve allowed directory: {}", e))
        })?;
        if !resolved.starts_with(&allowed_canonical) {
            return Err(ToolError::InvalidParams(format!(
                "Path {} is outside the allowed directory {}",
                original,
                allowed.display()
            )));
        }
    }
    Ok(())
}

fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParams(format!("Missing '{}' parameter", key)))
}

/// Read file tool
pub struct ReadFileTool {
    allowed_dir: Option<PathBuf>,
}

impl ReadFileTool {
    /// Create a new read file tool
    pub fn new(allowed_dir: Option<PathBuf>) -> Self {
        Self { allowed_dir }
    }
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a text file at the given path."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to read"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let path = require_str(&params, "path")?;
        let file_path = resolve_existing(path, self.allowed_dir.as_ref())?;

        if !file_path.is_file() {
            return Err(ToolError::ExecutionFailed(format!("Not a file: {}", path)));
        }

        Ok(std::fs::read_to_string(&file_path)?)
    }
}

/// Write file tool
pub struct WriteFileTool {
    allowed_dir: Option<PathBuf>,
}

impl WriteFileTool {
    /// Create a new write file tool
    pub fn new(allowed_dir: Option<PathBuf>) -> Self {
        Self { allowed_dir }
    }
}

impl Default for WriteFileTool {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file, creating parent directories if needed. Overwrites existing content."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to write to"
                },
                "content": {
                    "type": "string",
                    "description": "The content to write"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let path = require_str(&params, "path")?;
        let content = require_str(&params, "content")?;

        let file_path = resolve_for_write(path, self.allowed_dir.as_ref())?;
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;

        Ok(format!("Wrote {} bytes to {}", content.len(), path))
    }
}

/// Append file tool
pub struct AppendFileTool {
    allowed_dir: Option<PathBuf>,
}

impl AppendFileTool {
    /// Create a new append file tool
    pub fn new(allowed_dir: Option<PathBuf>) -> Self {
        Self { allowed_dir }
    }
}

impl Default for AppendFileTool {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Tool for AppendFileTool {
    fn name(&self) -> &str {
        "append_file"
    }

    fn description(&self) -> &str {
        "Append content to the end of a file, creating it if it does not exist."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to append to"
                },
                "content": {
                    "type": "string",
                    "description": "The content to append"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        use std::io::Write;

        let path = require_str(&params, "path")?;
        let content = require_str(&params, "content")?;

        let file_path = resolve_for_write(path, self.allowed_dir.as_ref())?;
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;
        file.write_all(content.as_bytes())?;

        Ok(format!("Appended {} bytes to {}", content.len(), path))
    }
}

/// File info tool
pub struct FileInfoTool {
    allowed_dir: Option<PathBuf>,
}

impl FileInfoTool {
    /// Create a new file info tool
    pub fn new(allowed_dir: Option<PathBuf>) -> Self {
        Self { allowed_dir }
    }
}

impl Default for FileInfoTool {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Tool for FileInfoTool {
    fn name(&self) -> &str {
        "file_info"
    }

    fn description(&self) -> &str {
        "Report size, kind, and modification time for a path."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to inspect"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let path = require_str(&params, "path")?;
        let target = resolve_existing(path, self.allowed_dir.as_ref())?;

        let meta = std::fs::metadata(&target)?;
        let kind = if meta.is_dir() { "directory" } else { "file" };
        let modified = meta
            .modified()
            .ok()
            .map(|t| {
                let dt: DateTime<Utc> = t.into();
                dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(format!(
            "{}\n  kind: {}\n  size: {} bytes\n  modified: {}",
            target.display(),
            kind,
            meta.len(),
            modified
        ))
    }
}

/// List directory tool
pub struct ListDirTool {
    allowed_dir: Option<PathBuf>,
}

impl ListDirTool {
    /// Create a new list dir tool
    pub fn new(allowed_dir: Option<PathBuf>) -> Self {
        Self { allowed_dir }
    }
}

impl Default for ListDirTool {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Tool for ListDirTool {
    fn name(&self) -> &str {
        "list_dir"
    }

    fn description(&self) -> &str {
        "List the entries of a directory, directories first."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory path to list"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let path = require_str(&params, "path")?;
        let dir_path = resolve_existing(path, self.allowed_dir.as_ref())?;

        if !dir_path.is_dir() {
            return Err(ToolError::ExecutionFailed(format!(
                "Not a directory: {}",
                path
            )));
        }

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir_path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                dirs.push(format!("{}/", name));
            } else {
                files.push(name);
            }
        }

        if dirs.is_empty() && files.is_empty() {
            return Ok(format!("Directory {} is empty", path));
        }

        dirs.sort();
        files.sort();
        dirs.extend(files);
        Ok(dirs.join("\n"))
    }
}
