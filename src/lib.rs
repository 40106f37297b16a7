//! SCOPEVIEW - terminal tree-view front-end for source-level debuggers
//!
//! This library provides the building blocks of the scopeview front-end:
//! the variable-tree core (qualified-name parsing, tree resolution, scope
//! partitioning, node updating), the debugger-engine boundary, and the
//! panels wired together by the TUI application. It is usable both as the
//! standalone application and as a library for testing and integration.

pub mod config;
pub mod engine;
pub mod tui;
pub mod vartree;

/// Re-export key types for easier access in tests
pub use engine::interface::{DebuggerEngine, EngineError, EngineEvent, EngineRequest};
pub use engine::scripted::ScriptedEngine;
pub use engine::variable::{Variable, VariableKind};
pub use tui::app::{App, Command as AppCommand, View};
pub use vartree::store::{NodeId, TreeStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize the logging system
pub fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .filter_module("scopeview", level)
        .format_timestamp_secs()
        .init();
}

/// Parse a command string (wrapper around the TUI command parser)
pub fn parse_command(cmd_str: &str) -> Result<AppCommand, String> {
    tui::app::parse_command(cmd_str)
}
