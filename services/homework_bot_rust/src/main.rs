use anyhow::Result;
use chrono::Utc;
use dotenv::dotenv;
use homework_bot_rust::config::{self, Config};
use homework_bot_rust::logging::init_file_logger;
use homework_bot_rust::{HomeworkPoller, TelegramClient};
use homework_core::PracticumClient;
use log::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let log_file = config::log_file_from_env();
    init_file_logger(&log_file)?;

    info!("Starting homework status bot...");

    // Nothing touches the network until every credential is present
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("CRITICAL: {}", e);
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    info!(
        "Config: endpoint={} retry_period={}s http_timeout={}s chat_id={} log_file={}",
        cfg.practicum_endpoint,
        cfg.retry_period.as_secs(),
        cfg.http_timeout.as_secs(),
        cfg.telegram_chat_id,
        log_file,
    );

    let source = PracticumClient::new(
        cfg.practicum_endpoint.clone(),
        cfg.practicum_token.clone(),
        cfg.http_timeout,
    )?;
    let notifier = TelegramClient::new(
        cfg.telegram_api_base_url.clone(),
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id.clone(),
        cfg.http_timeout,
    )?;

    let mut poller = HomeworkPoller::new(source, notifier, cfg.retry_period, Utc::now().timestamp());
    poller.run().await;

    Ok(())
}
