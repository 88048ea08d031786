//! CLI Commands

pub mod chat;
pub mod identity;
pub mod threads;

use std::fs;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use zerotrace_core::{
    EventDispatcher, HttpGateway, Identity, SessionContext, SqliteStore, SyncEngine,
};

use crate::config::CliConfig;
use crate::presenter::{TerminalPresenter, Views};

/// Session and engine wired to the local database and the service.
pub struct Client {
    pub session: Arc<SessionContext>,
    pub engine: Arc<SyncEngine<HttpGateway>>,
}

impl Client {
    /// Opens local storage and prepares the engine. Makes no network calls.
    pub fn open(config: &CliConfig, views: Views) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let store = Arc::new(SqliteStore::open(config.storage_path())?);
        let session = Arc::new(SessionContext::open(store)?);

        let presenter = Arc::new(TerminalPresenter::new(
            views,
            session.identity().map(|i| i.identity_hash),
        ));
        let mut events = EventDispatcher::new();
        events.add_handler(presenter);

        let gateway = Arc::new(HttpGateway::new(&config.client_config())?);
        let engine = Arc::new(SyncEngine::new(gateway, Arc::new(events)));

        Ok(Client { session, engine })
    }

    /// Returns the local identity or explains how to create one.
    pub fn require_identity(&self) -> Result<Identity> {
        self.session
            .identity()
            .ok_or_else(|| anyhow!("ZeroTrace not initialized. Run 'zerotrace init' first."))
    }
}
