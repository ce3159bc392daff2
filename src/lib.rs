// typesforge - editor core for DayZ types.xml loot tables
//
// This is the library crate containing the record stores, the XML codec and
// the editing session. The binary crate (main.rs) provides the CLI entry point.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::{Result, TypesError};
pub use models::{EditorConfig, EditorState, Flags, PresetSet, RecordId, RecordStore, TypeRecord};
pub use services::MergeReport;
pub use state::{EditorSession, SessionChange};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
