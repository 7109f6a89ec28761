pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::{HttpConfig, HttpFetcher};
pub use adapters::terminal::{JsonDashboard, TerminalDashboard};
pub use config::{open_fetcher, BoardConfig};
pub use core::{fetcher::StatusFetcher, watch::WatchEngine};
pub use domain::model::{CourseStatus, Enrollment, Query, TableLayout, Term, TrackedCourse, TransportKind};
pub use utils::error::{Result, WatchError};
