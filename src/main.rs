use clap::Parser;
use course_watch::adapters::terminal::stdout_dashboard;
use course_watch::core::ConfigProvider;
use course_watch::utils::error::ErrorSeverity;
use course_watch::utils::{logger, validation::Validate};
use course_watch::{open_fetcher, CliConfig, WatchEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init(config.verbose, config.log_json);

    tracing::info!("Starting course-watch");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Some(code) = diagnose(&config).await {
        std::process::exit(code);
    }

    let fetcher = match open_fetcher(&config).await {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("❌ Failed to open {:?} transport: {}", config.transport(), e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    let mut engine = WatchEngine::new(
        fetcher,
        config.layout(),
        stdout_dashboard(config.json, config.bar_width()),
        config.courses(),
        config.interval(),
    );

    let polls = engine.run(config.poll_limit()).await?;
    engine.shutdown().await?;

    tracing::info!("✅ Stopped after {} poll(s)", polls);
    Ok(())
}

/// `--diagnose`: print the browser check and return the exit code.
#[cfg(feature = "browser")]
async fn diagnose(config: &CliConfig) -> Option<i32> {
    if !config.diagnose {
        return None;
    }
    let explicit = config.browser_path.as_deref().map(std::path::PathBuf::from);
    let report = course_watch::adapters::browser::diagnose(explicit).await;

    println!("course-watch browser check");
    println!("==========================");
    for line in report.lines() {
        println!("{}", line);
    }
    tracing::info!("Browser check finished, ready: {}", report.is_ready());
    Some(if report.is_ready() { 0 } else { 1 })
}

#[cfg(not(feature = "browser"))]
async fn diagnose(_config: &CliConfig) -> Option<i32> {
    None
}
