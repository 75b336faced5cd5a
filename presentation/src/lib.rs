//! Presentation layer for council
//!
//! CLI argument definitions, report formatters (console and JSON), and the
//! progress reporters that implement the application's notifier port.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Commands, ReviewArgs};
pub use output::{console::ConsoleFormatter, formatter::ReportFormatter};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
