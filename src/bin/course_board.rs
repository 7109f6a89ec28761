use clap::Parser;
use course_watch::adapters::terminal::stdout_dashboard;
use course_watch::core::watch::BoardMode;
use course_watch::core::ConfigProvider;
use course_watch::utils::{logger, validation::Validate};
use course_watch::{open_fetcher, BoardConfig, WatchEngine};

#[derive(Parser)]
#[command(name = "course-board")]
#[command(about = "Ranked enrollment board for several course sections")]
struct Args {
    /// Path to TOML board configuration
    #[arg(short, long, default_value = "course-board.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Poll once and exit
    #[arg(long)]
    once: bool,

    /// Stop after this many polls
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_polls: Option<u64>,

    /// Print frames as JSON lines instead of bars
    #[arg(long)]
    json: bool,

    /// Show the parsed board without polling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(args.verbose, args.log_json);

    tracing::info!("🚀 Starting course board");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match BoardConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no requests will be sent");
        return Ok(());
    }

    let fetcher = match open_fetcher(&config).await {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    };

    let mut engine = WatchEngine::new(
        fetcher,
        config.layout(),
        stdout_dashboard(args.json, config.bar_width()),
        config.courses(),
        config.interval(),
    )
    .with_mode(BoardMode::Ranked);

    let limit = if args.once { Some(1) } else { args.max_polls };
    let polls = engine.run(limit).await?;
    engine.shutdown().await?;

    tracing::info!("✅ Stopped after {} poll(s)", polls);
    Ok(())
}

fn display_config_summary(config: &BoardConfig) {
    tracing::info!("📋 Board Summary:");
    tracing::info!("  🌐 Endpoint: {}", config.endpoint());
    tracing::info!("  🚚 Transport: {:?}", config.transport());
    tracing::info!("  ⏱️  Interval: {:?}, timeout: {:?}", config.interval(), config.timeout());
    for course in config.courses() {
        match &course.label {
            Some(label) => tracing::info!("  📚 {} as '{}'", course.query, label),
            None => tracing::info!("  📚 {}", course.query),
        }
    }
}
