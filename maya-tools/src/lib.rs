//! Built-in tools for MAYA
//!
//! This crate provides the tool registry and built-in tool implementations:
//! web search/fetch, file operations, the external editor bridge, and
//! to-do management.

pub mod base;
pub mod editor;
pub mod filesystem;
pub mod registry;
pub mod todo;
pub mod web;

pub use base::{Tool, ToolError};
pub use editor::{EditorBridge, OpenInEditorTool};
pub use filesystem::{AppendFileTool, FileInfoTool, ListDirTool, ReadFileTool, WriteFileTool};
pub use registry::ToolRegistry;
pub use todo::TodoTool;
pub use web::{WebFetchTool, WebSearchTool};
