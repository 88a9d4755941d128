//! CLI commands for the utang ledger.
//!
//! Every command builds the same stack: configuration, then the gateway the
//! configuration selects, then a [`LedgerStore`] over it. Commands run one
//! attempt against the backend and print plain tables; failures surface as
//! the gateway's error text and a non-zero exit.

pub mod auth;
pub mod borrowers;
pub mod contracts;
pub mod offers;
pub mod payments;
pub mod summary;
pub mod user;

use std::sync::Arc;

use anyhow::Result;

use utang_core::config::GatewayBackend;
use utang_core::gateway::LedgerGateway;
use utang_core::storage::ClientStorage;
use utang_core::ConfigLoader;
use utang_gateway_http::{HttpGateway, HttpGatewayConfig, TokenStore};
use utang_gateway_local::LocalGateway;
use utang_store::{LedgerStore, SessionStore};

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub gateway: Arc<dyn LedgerGateway>,
    pub store: LedgerStore,
    pub storage: ClientStorage,
}

impl AppContext {
    /// Loads configuration and wires up the configured backend.
    pub fn load(config_path: &str) -> Result<Self> {
        let config = ConfigLoader::load_from(config_path)?;
        let storage = ClientStorage::new(&config.storage.data_dir);
        tracing::debug!(
            backend = %config.gateway.backend,
            data_dir = %storage.dir().display(),
            "selected ledger backend"
        );

        let gateway: Arc<dyn LedgerGateway> = match config.gateway.backend {
            GatewayBackend::Remote => {
                tracing::debug!(base_url = %config.api.base_url, "using remote gateway");
                Arc::new(HttpGateway::new(
                    HttpGatewayConfig::from(&config.api),
                    TokenStore::new(storage.clone()),
                )?)
            }
            GatewayBackend::Local => Arc::new(LocalGateway::new(storage.clone())),
        };

        let store = LedgerStore::new(Arc::clone(&gateway), SessionStore::new(storage.clone()));
        Ok(Self {
            gateway,
            store,
            storage,
        })
    }
}
