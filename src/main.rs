use streaming_news::utils::logger;
use streaming_news::{CliConfig, Credentials};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse_args();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting streaming-news");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let run_date = chrono::Local::now().date_naive();
    let result = match config.into_settings(Credentials::from_env(), run_date) {
        Ok(settings) => {
            tracing::debug!("Resolved settings: {:?}", settings);
            streaming_news::app::run(settings).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                "✅ {} of {} releases emitted to {}",
                summary.records_emitted,
                summary.releases_fetched,
                summary.destination
            );
            println!("✅ {} titles → {}", summary.records_emitted, summary.destination);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
