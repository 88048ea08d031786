//! Identity Commands
//!
//! Create, inspect, back up and delete the local identity.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use super::Client;
use crate::config::CliConfig;
use crate::display;
use crate::presenter::Views;

/// Creates a new identity.
pub async fn init(config: &CliConfig) -> Result<()> {
    let client = Client::open(config, Views::default())?;
    if client.session.has_identity() {
        bail!(
            "ZeroTrace is already initialized in {:?}. Use --data-dir to specify a different location.",
            config.data_dir
        );
    }

    let identity = client.engine.create_identity(&client.session).await?;

    println!();
    println!("  Identity:   {}", identity.identity_hash);
    println!("  Public key: {}", identity.public_key);
    println!("  Data dir:   {:?}", config.data_dir);
    println!();
    display::info("Share your identity hash, then start a chat with: zerotrace connect <hash>");

    Ok(())
}

/// Shows the local identity.
pub fn whoami(config: &CliConfig) -> Result<()> {
    let client = Client::open(config, Views::default())?;
    client.require_identity()?;
    let profile = client.session.profile()?;

    println!();
    println!("  Identity:   {}", profile.identity.identity_hash);
    println!("  Public key: {}", profile.identity.public_key);
    match profile.created_at {
        Some(created) => println!("  Created:    {} (ms since epoch)", created),
        None => println!("  Created:    unknown"),
    }
    println!("  Threads:    {}", profile.thread_count);
    println!();

    Ok(())
}

/// Writes an identity backup document.
pub fn export(config: &CliConfig, output: &Path) -> Result<()> {
    let client = Client::open(config, Views::default())?;
    client.require_identity()?;
    let Some(backup) = client.session.vault().export()? else {
        bail!("No identity to export");
    };

    fs::write(output, serde_json::to_string_pretty(&backup)?)?;
    display::success(&format!("Identity exported to {:?}", output));
    display::warning("Keep this file private.");

    Ok(())
}

/// Deletes the identity and all conversations.
pub fn reset(config: &CliConfig, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("This deletes your identity and all conversations. Re-run with --yes to confirm.");
    }

    let client = Client::open(config, Views::default())?;
    client.engine.reset_identity(&client.session)?;
    display::success("Identity and conversations deleted");

    Ok(())
}

/// Queries the identity's state root.
pub async fn state(config: &CliConfig) -> Result<()> {
    let client = Client::open(config, Views::default())?;
    client.require_identity()?;
    let root = client.engine.state_root(&client.session).await?;

    println!();
    print!("{}", display::render_state_root(&root));
    println!();

    Ok(())
}
