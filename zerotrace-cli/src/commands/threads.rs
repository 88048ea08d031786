//! Threads Command
//!
//! Lists cached conversations, optionally refreshing them first.

use anyhow::Result;

use super::Client;
use crate::config::CliConfig;
use crate::display;
use crate::presenter::Views;

/// Lists all conversations.
pub async fn list(config: &CliConfig, refresh: bool) -> Result<()> {
    let client = Client::open(config, Views::default())?;
    client.require_identity()?;

    if refresh {
        let report = client.engine.sync_all(&client.session).await?;
        for (thread_id, error) in &report.failed {
            display::warning(&format!("Could not refresh {}: {}", thread_id, error));
        }
    }

    let threads = client.session.threads();
    println!();
    print!("{}", display::render_conversations(&threads));
    println!();
    if threads.is_empty() {
        display::info("Start a conversation with: zerotrace connect <hash>");
    }

    Ok(())
}
