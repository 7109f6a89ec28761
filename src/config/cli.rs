use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::adapters::DEFAULT_ENDPOINT;
use crate::config::{MAX_INTERVAL_SECONDS, MAX_TIMEOUT_SECONDS, MIN_INTERVAL_SECONDS, MIN_TIMEOUT_SECONDS};
use crate::domain::model::{Query, TableLayout, Term, TrackedCourse, TransportKind};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "course-watch")]
#[command(about = "Live enrollment monitor for one course section")]
pub struct CliConfig {
    /// Subject (course) code
    #[arg(long, default_value = "445.206")]
    pub subject: String,

    /// Section code
    #[arg(long, default_value = "002")]
    pub section: String,

    #[arg(long, default_value = "2025")]
    pub year: u16,

    /// spring, summer, fall, winter or 1-4
    #[arg(long, default_value = "fall")]
    pub term: Term,

    /// Seconds between polls
    #[arg(long, default_value = "2")]
    pub interval: u64,

    /// Seconds to wait for the result page
    #[arg(long, default_value = "12")]
    pub timeout: u64,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// http or browser
    #[arg(long, default_value = "http")]
    pub transport: TransportKind,

    /// Browser executable for the browser transport
    #[arg(long)]
    pub browser_path: Option<String>,

    #[arg(long, default_value = "30")]
    pub bar_width: usize,

    /// Print frames as JSON lines instead of bars
    #[arg(long)]
    pub json: bool,

    /// Report which browser the browser transport would launch, then exit
    #[cfg(feature = "browser")]
    #[arg(long)]
    pub diagnose: bool,

    /// Poll once and exit
    #[arg(long)]
    pub once: bool,

    /// Stop after this many polls
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_polls: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn query(&self) -> Query {
        Query::new(self.year, self.term, &self.subject, &self.section)
    }

    pub fn poll_limit(&self) -> Option<u64> {
        if self.once {
            Some(1)
        } else {
            self.max_polls
        }
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport(&self) -> TransportKind {
        self.transport
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    fn user_agent(&self) -> &str {
        DEFAULT_USER_AGENT
    }

    fn browser_path(&self) -> Option<&str> {
        self.browser_path.as_deref()
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    fn bar_width(&self) -> usize {
        self.bar_width
    }

    fn layout(&self) -> TableLayout {
        TableLayout::default()
    }

    fn courses(&self) -> Vec<TrackedCourse> {
        vec![self.query().into()]
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("subject", &self.subject)?;
        validation::validate_non_empty_string("section", &self.section)?;
        validation::validate_year("year", self.year)?;
        validation::validate_range("interval", self.interval, MIN_INTERVAL_SECONDS, MAX_INTERVAL_SECONDS)?;
        validation::validate_range("timeout", self.timeout, MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS)?;
        validation::validate_url("endpoint", &self.endpoint)?;
        Ok(())
    }
}
