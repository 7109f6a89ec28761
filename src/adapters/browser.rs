//! Headless Chromium transport using chromiumoxide.
//!
//! Drives the real search page: fills the form elements and calls the page's
//! own `fnInquiry()` routine, then reads the rendered result table. The
//! browser process belongs to one `BrowserFetcher`; `close` shuts it down and
//! dropping the fetcher kills it.

use crate::adapters::{form_bindings, YEAR_FIELD};
use crate::core::table::parse_rows;
use crate::domain::model::{Query, RowTable, TableLayout};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

const POLL_STEP: Duration = Duration::from_millis(250);
const VERSION_CHECK_BOUND: Duration = Duration::from_secs(5);
const SYSTEM_CHROMIUM: &str = "/usr/bin/chromium";

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub endpoint: String,
    pub timeout: Duration,
    pub executable: Option<PathBuf>,
}

fn is_driver(path: &Path) -> bool {
    path.to_string_lossy().to_ascii_lowercase().contains("chromedriver")
}

/// Locate a Chromium-family executable.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(p);
        if path.exists() {
            return Some(path);
        }
    }

    let fixed = PathBuf::from(SYSTEM_CHROMIUM);
    if fixed.exists() {
        return Some(fixed);
    }

    ["chromium", "chromium-browser", "google-chrome", "google-chrome-stable"]
        .into_iter()
        .filter_map(|name| which::which(name).ok())
        .find(|path| !is_driver(path))
}

/// What the browser transport would launch on this machine.
#[derive(Debug, Clone)]
pub struct BrowserReport {
    pub chromium_path_env: Option<String>,
    pub system_chromium: bool,
    pub executable: Option<PathBuf>,
    pub is_driver: bool,
    pub version: std::result::Result<String, String>,
}

impl BrowserReport {
    pub fn is_ready(&self) -> bool {
        self.executable.is_some() && !self.is_driver && self.version.is_ok()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.chromium_path_env {
            Some(p) => lines.push(format!("[OK] CHROMIUM_PATH = {}", p)),
            None => lines.push("[--] CHROMIUM_PATH is not set".to_string()),
        }
        if self.system_chromium {
            lines.push(format!("[OK] {} exists", SYSTEM_CHROMIUM));
        } else {
            lines.push(format!("[--] {} does not exist", SYSTEM_CHROMIUM));
        }
        match &self.executable {
            Some(path) if self.is_driver => {
                lines.push(format!("[!!] {} is chromedriver, not a browser", path.display()))
            }
            Some(path) => lines.push(format!("[OK] Browser: {}", path.display())),
            None => lines.push("[!!] Browser NOT found; set CHROMIUM_PATH or --browser-path".to_string()),
        }
        match &self.version {
            Ok(v) => lines.push(format!("[OK] Version: {}", v)),
            Err(e) => lines.push(format!("[!!] Version check failed: {}", e)),
        }
        lines.push(format!("Status: {}", if self.is_ready() { "READY" } else { "NOT READY" }));
        lines
    }
}

/// Resolve the browser executable the same way `launch` does and ask it for
/// its version.
pub async fn diagnose(explicit: Option<PathBuf>) -> BrowserReport {
    let executable = explicit.or_else(find_chromium);
    let driver = executable.as_deref().is_some_and(is_driver);

    let version = match &executable {
        None => Err("no executable to check".to_string()),
        Some(_) if driver => Err("refusing to run chromedriver".to_string()),
        Some(path) => browser_version(path).await,
    };

    BrowserReport {
        chromium_path_env: std::env::var("CHROMIUM_PATH").ok(),
        system_chromium: Path::new(SYSTEM_CHROMIUM).exists(),
        executable,
        is_driver: driver,
        version,
    }
}

async fn browser_version(path: &Path) -> std::result::Result<String, String> {
    let output = tokio::process::Command::new(path)
        .arg("--version")
        .kill_on_drop(true)
        .output();
    let output = tokio::time::timeout(VERSION_CHECK_BOUND, output)
        .await
        .map_err(|_| format!("no answer within {}s", VERSION_CHECK_BOUND.as_secs()))?
        .map_err(|e| e.to_string())?;

    if !output.status.success() {
        return Err(format!("exited with {}", output.status));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub struct BrowserFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    endpoint: String,
    timeout: Duration,
}

impl BrowserFetcher {
    /// Launch a dedicated headless browser.
    pub async fn launch(options: BrowserOptions) -> Result<Self> {
        crate::utils::validation::validate_url("source.endpoint", &options.endpoint)?;

        let executable = options
            .executable
            .or_else(find_chromium)
            .ok_or_else(|| WatchError::transport("Chromium executable not found; set CHROMIUM_PATH"))?;
        if is_driver(&executable) {
            return Err(WatchError::InvalidConfigValueError {
                field: "browser executable".to_string(),
                value: executable.display().to_string(),
                reason: "points at chromedriver, not a browser".to_string(),
            });
        }
        tracing::info!("Launching headless browser {}", executable.display());

        let config = BrowserConfig::builder()
            .chrome_executable(executable)
            .arg("--headless=new")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--lang=ko-KR")
            .window_size(1600, 1000)
            .build()
            .map_err(|e| WatchError::transport(format!("failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| WatchError::transport(format!("failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            page: None,
            endpoint: options.endpoint,
            timeout: options.timeout,
        })
    }

    async fn page(&mut self) -> Result<Page> {
        if let Some(page) = &self.page {
            return Ok(page.clone());
        }
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| WatchError::transport(format!("failed to open tab: {}", e)))?;
        self.page = Some(page.clone());
        Ok(page)
    }
}

/// Poll until `css` matches something on the page or the bound expires.
async fn wait_for(page: &Page, css: &str, stage: &str, bound: Duration) -> Result<()> {
    let ready = async {
        loop {
            if page.find_element(css).await.is_ok() {
                return;
            }
            tokio::time::sleep(POLL_STEP).await;
        }
    };
    tokio::time::timeout(bound, ready)
        .await
        .map_err(|_| WatchError::timeout(stage, bound.as_secs()))
}

/// Script that binds the query into the form and starts the site's search.
pub fn inquiry_script(query: &Query) -> Result<String> {
    let mut script = String::from("(() => {\n");
    for (id, value) in form_bindings(query) {
        script.push_str(&format!(
            "  document.getElementById({}).value = {};\n",
            serde_json::to_string(id).map_err(|e| WatchError::parse(e.to_string()))?,
            serde_json::to_string(&value).map_err(|e| WatchError::parse(e.to_string()))?
        ));
    }
    script.push_str("  fnInquiry();\n  return true;\n})()");
    Ok(script)
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn search(&mut self, query: &Query, layout: &TableLayout) -> Result<RowTable> {
        let page = self.page().await?;

        tracing::debug!("Opening {}", self.endpoint);
        tokio::time::timeout(self.timeout, page.goto(self.endpoint.as_str()))
            .await
            .map_err(|_| WatchError::timeout("search page", self.timeout.as_secs()))?
            .map_err(|e| WatchError::transport(format!("navigation failed: {}", e)))?;

        wait_for(&page, &format!("#{}", YEAR_FIELD), "search form", self.timeout).await?;

        page.evaluate(inquiry_script(query)?)
            .await
            .map_err(|e| WatchError::transport(format!("search script failed: {}", e)))?;

        wait_for(&page, &layout.row_selector, "result table", self.timeout).await?;

        let html = page
            .content()
            .await
            .map_err(|e| WatchError::transport(format!("failed to read page: {}", e)))?;
        parse_rows(&html, &layout.row_selector)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        tracing::info!("Closing headless browser");
        if let Some(page) = this.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!("Tab close failed: {}", e);
            }
        }
        this.browser
            .close()
            .await
            .map_err(|e| WatchError::transport(format!("failed to close browser: {}", e)))?;
        this.browser.wait().await?;
        this.handler.abort();
        Ok(())
    }
}
