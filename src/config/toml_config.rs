use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::adapters::DEFAULT_ENDPOINT;
use crate::config::{
    DEFAULT_BAR_WIDTH, DEFAULT_INTERVAL_SECONDS, DEFAULT_TIMEOUT_SECONDS, MAX_INTERVAL_SECONDS,
    MAX_TIMEOUT_SECONDS, MIN_INTERVAL_SECONDS, MIN_TIMEOUT_SECONDS,
};
use crate::domain::model::{Query, TableLayout, Term, TrackedCourse, TransportKind};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, WatchError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Multi-course board configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub layout: TableLayout,
    #[serde(default)]
    pub courses: Vec<CourseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub transport: TransportKind,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub browser_path: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            transport: TransportKind::default(),
            timeout_seconds: None,
            user_agent: None,
            browser_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    pub interval_seconds: Option<u64>,
    pub bar_width: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEntry {
    pub year: u16,
    pub term: Term,
    pub subject: String,
    pub section: String,
    pub label: Option<String>,
}

impl BoardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| WatchError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${SUBJECT_CODE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| WatchError::config(format!("env pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn interval_seconds(&self) -> u64 {
        self.watch.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        validation::validate_range(
            "watch.interval_seconds",
            self.interval_seconds(),
            MIN_INTERVAL_SECONDS,
            MAX_INTERVAL_SECONDS,
        )?;
        validation::validate_range(
            "source.timeout_seconds",
            self.timeout_seconds(),
            MIN_TIMEOUT_SECONDS,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_non_empty_string("layout.row_selector", &self.layout.row_selector)?;

        if self.courses.is_empty() {
            return Err(WatchError::MissingConfigError {
                field: "courses".to_string(),
            });
        }

        for (i, course) in self.courses.iter().enumerate() {
            validation::validate_year(&format!("courses[{}].year", i), course.year)?;
            validation::validate_non_empty_string(&format!("courses[{}].subject", i), &course.subject)?;
            validation::validate_non_empty_string(&format!("courses[{}].section", i), &course.section)?;
        }

        Ok(())
    }
}

impl ConfigProvider for BoardConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn transport(&self) -> TransportKind {
        self.source.transport
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn user_agent(&self) -> &str {
        self.source.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn browser_path(&self) -> Option<&str> {
        self.source.browser_path.as_deref()
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds())
    }

    fn bar_width(&self) -> usize {
        self.watch.bar_width.unwrap_or(DEFAULT_BAR_WIDTH)
    }

    fn layout(&self) -> TableLayout {
        self.layout.clone()
    }

    fn courses(&self) -> Vec<TrackedCourse> {
        self.courses
            .iter()
            .map(|c| TrackedCourse {
                query: Query::new(c.year, c.term, &c.subject, &c.section),
                label: c.label.clone(),
            })
            .collect()
    }
}

impl Validate for BoardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
