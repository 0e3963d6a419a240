use std::sync::Arc;

use crate::config::{BackendMode, Config};
use crate::retrieval::{LiveRetrieval, PlaceholderRetrieval, RetrievalService};
use crate::vendor::{RagClient, VendorClient};

/// Shared application state.
///
/// The retrieval service is built once at startup and is read-only
/// afterwards, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub retrieval: Arc<dyn RetrievalService>,
}

impl AppState {
    /// Build the retrieval backend selected by `config.backend`.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let retrieval: Arc<dyn RetrievalService> = match config.backend {
            BackendMode::Live => {
                let vendor = VendorClient::new(&config.vendor)?;
                let rag = RagClient::new(vendor, &config.vendor);
                let live = LiveRetrieval::bootstrap(rag, &config).await;
                tracing::info!(
                    "Live retrieval ready with {} topic retrievers",
                    live.retrievers().len()
                );
                Arc::new(live)
            }
            BackendMode::Placeholder => {
                tracing::info!("Placeholder retrieval ready (no vendor calls)");
                Arc::new(PlaceholderRetrieval::new())
            }
        };

        Ok(Self::with_retrieval(config, retrieval))
    }

    /// Wrap an already-built service, e.g. a test double.
    pub fn with_retrieval(config: Config, retrieval: Arc<dyn RetrievalService>) -> Self {
        Self {
            config: Arc::new(config),
            retrieval,
        }
    }
}
