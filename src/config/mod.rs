#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::BoardConfig;

use crate::adapters::http::{HttpConfig, HttpFetcher};
use crate::domain::model::TransportKind;
use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::Result;

pub const MIN_INTERVAL_SECONDS: u64 = 1;
pub const MAX_INTERVAL_SECONDS: u64 = 30;
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_TIMEOUT_SECONDS: u64 = 120;
pub const DEFAULT_INTERVAL_SECONDS: u64 = 2;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 12;
pub const DEFAULT_BAR_WIDTH: usize = 30;

/// 依設定建立對應的傳輸層
pub async fn open_fetcher<C: ConfigProvider>(config: &C) -> Result<Box<dyn PageFetcher>> {
    match config.transport() {
        TransportKind::Http => {
            let fetcher = HttpFetcher::new(HttpConfig {
                endpoint: config.endpoint().to_string(),
                timeout: config.timeout(),
                user_agent: config.user_agent().to_string(),
            })?;
            Ok(Box::new(fetcher))
        }
        TransportKind::Browser => open_browser(config).await,
    }
}

#[cfg(feature = "browser")]
async fn open_browser<C: ConfigProvider>(config: &C) -> Result<Box<dyn PageFetcher>> {
    use crate::adapters::browser::{BrowserFetcher, BrowserOptions};

    let fetcher = BrowserFetcher::launch(BrowserOptions {
        endpoint: config.endpoint().to_string(),
        timeout: config.timeout(),
        executable: config.browser_path().map(std::path::PathBuf::from),
    })
    .await?;
    Ok(Box::new(fetcher))
}

#[cfg(not(feature = "browser"))]
async fn open_browser<C: ConfigProvider>(_config: &C) -> Result<Box<dyn PageFetcher>> {
    Err(crate::utils::error::WatchError::config(
        "browser transport requires building with the `browser` feature",
    ))
}
