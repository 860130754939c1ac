use anyhow::Context;
use chat_widget::{
    api::ChatClient,
    config::initialize_config,
    constants::SHUTDOWN_GRACE_MS,
    logging::init_logging,
    ui::run_ui,
    App, ChatController, Transcript,
};
use dotenv::dotenv;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let (config, created) = initialize_config().context("Failed to load configuration")?;
    let _logger = init_logging(&config).context("Failed to start logging")?;
    if let Some(path) = created {
        log::info!("Wrote default config to {}", path.display());
    }
    log::info!(
        "Starting chat widget against {} (timeout {}s)",
        config.endpoint,
        config.request_timeout_secs
    );

    let client = ChatClient::from_config(&config)?;
    let controller = ChatController::new(client, Transcript::new().shared());
    controller.start(&config).await;

    let mut app = App::new(controller);
    run_ui(&mut app).await.context("Terminal UI failed")?;

    // Give replies that are still in flight a moment to land in the log.
    let pending = app.controller.in_flight().await;
    if pending > 0 {
        let grace = Duration::from_millis(SHUTDOWN_GRACE_MS);
        if tokio::time::timeout(grace, app.controller.wait_idle())
            .await
            .is_err()
        {
            log::warn!("Exiting with {} request(s) still in flight", pending);
        }
    }

    log::info!("Chat widget stopped");
    Ok(())
}
