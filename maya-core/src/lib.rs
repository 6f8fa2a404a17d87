//! Core types for the MAYA assistant
//!
//! This crate provides the conversation session, configuration,
//! to-do store, and utilities used by the other MAYA components.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod todo;
pub mod utils;

pub use error::{Error, Result};
