//! Chat Commands
//!
//! Open a thread with a recipient, send to it, read it, or follow it.

use anyhow::Result;
use tracing::debug;
use zerotrace_core::Poller;

use super::Client;
use crate::config::CliConfig;
use crate::display;
use crate::presenter::Views;

const CHAT_VIEWS: Views = Views {
    conversations: false,
    messages: true,
};

/// Opens (or resumes) a thread and prints its history.
pub async fn connect(config: &CliConfig, recipient: &str) -> Result<()> {
    let client = Client::open(config, CHAT_VIEWS)?;
    let thread_id = client.engine.connect(&client.session, recipient).await?;
    display::info(&format!("Thread: {}", thread_id));
    Ok(())
}

/// Sends a message to `recipient`.
pub async fn send(config: &CliConfig, recipient: &str, text: &str) -> Result<()> {
    let client = Client::open(config, CHAT_VIEWS)?;
    client.engine.connect(&client.session, recipient).await?;
    let receipt = client.engine.send_message(&client.session, text).await?;

    display::success(&format!("Message sent (id {})", receipt.message_id));
    if let Some(root) = receipt.cstate_root {
        display::info(&format!("State root: {}", root));
    }
    Ok(())
}

/// Prints the history of the thread with `recipient`.
pub async fn read(config: &CliConfig, recipient: &str) -> Result<()> {
    let client = Client::open(config, CHAT_VIEWS)?;
    client.engine.connect(&client.session, recipient).await?;
    Ok(())
}

/// Follows the thread with `recipient` until Ctrl-C.
pub async fn watch(config: &CliConfig, recipient: &str) -> Result<()> {
    let client = Client::open(config, CHAT_VIEWS)?;
    client.engine.connect(&client.session, recipient).await?;

    let mut poller = Poller::from_config(&config.client_config());
    poller.start_task(client.engine.clone(), client.session.clone());
    display::info(&format!(
        "Watching for new messages every {:?}. Press Ctrl-C to stop.",
        poller.interval()
    ));

    tokio::signal::ctrl_c().await?;
    let stopped = poller.stop_task().await;
    debug!(stopped, "watch ended");
    println!();
    Ok(())
}
