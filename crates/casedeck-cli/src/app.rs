//! Wiring of the state layer for one CLI invocation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use casedeck_application::{
    DocumentService, MutationCache, Notifier, RemoteCollections, SessionStore,
    SpreadsheetExporter, StoreEvent,
};
use casedeck_core::session::Session;
use casedeck_infrastructure::{ClientConfig, FileStateRepository, HttpApiClient};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::output;

pub struct App {
    pub config: ClientConfig,
    pub cache: Arc<MutationCache>,
    pub store: Arc<SessionStore>,
    pub documents: DocumentService,
    pub exporter: SpreadsheetExporter,
    events: UnboundedReceiver<StoreEvent>,
}

impl App {
    pub async fn bootstrap(config_path: Option<&Path>, api_url: Option<&str>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => ClientConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ClientConfig::load().context("Failed to load config")?,
        };
        if let Some(url) = api_url {
            config.api_base_url = url.to_string();
        }
        tracing::debug!("[App] Using server {}", config.base_url());

        let client = Arc::new(HttpApiClient::new(&config)?);
        let notifier = Notifier::new();
        let events = notifier.subscribe();

        let cache = Arc::new(MutationCache::new(
            RemoteCollections::from_client(client.clone()),
            notifier.clone(),
        ));

        let state_path = config.state_file_path()?;
        let persisted = Arc::new(
            FileStateRepository::open(state_path.clone())
                .await
                .with_context(|| format!("Failed to open state file {}", state_path.display()))?,
        );
        let store = Arc::new(SessionStore::new(cache.clone(), persisted));
        let documents = DocumentService::new(client, store.clone());
        let exporter = SpreadsheetExporter::new(notifier);

        Ok(Self {
            config,
            cache,
            store,
            documents,
            exporter,
            events,
        })
    }

    /// Loads the session list and restores the last selection.
    pub async fn init(&mut self) -> Result<()> {
        let result = self.store.init().await;
        self.flush_notifications();
        result.context("Failed to reach the casedeck server")
    }

    /// Looks a session up by id, or by title when no id matches.
    pub async fn find_session(&self, key: &str) -> Result<Session> {
        let sessions = self.store.sessions().await?;
        sessions
            .iter()
            .find(|s| s.id == key)
            .or_else(|| sessions.iter().find(|s| s.title == key))
            .cloned()
            .with_context(|| format!("Session '{key}' not found"))
    }

    /// The active session, or an error telling the user how to pick one.
    pub async fn require_active_session(&self) -> Result<Session> {
        self.store
            .active_session()
            .await
            .context("No active session. Use `casedeck session switch <id>` or `casedeck session create <title>`")
    }

    /// Prints the notifications published so far.
    pub fn flush_notifications(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let StoreEvent::Notification(notification) = event {
                output::print_notification(&notification);
            }
        }
    }
}
