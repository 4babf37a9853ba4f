//! GUI module for the coding helper.
//!
//! Provides a graphical user interface using Iced.

pub mod app;
pub mod logger;
mod selector;

pub use crate::settings::AppSettings;
pub use app::CodingHelperApp;
pub use logger::{LogEntry, LogLevel, Logger};
