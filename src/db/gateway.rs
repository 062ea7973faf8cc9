use crate::config::SupabaseConfig;
use crate::error::GatewayError;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use super::supabase::SupabaseConnector;
use super::traits::{DatabaseConnector, DatabaseHandle};

const URL_SETTING: &str = "SUPABASE_URL";
const KEY_SETTING: &str = "SUPABASE_SERVICE_KEY";

/// Owner of the single database handle.
///
/// Settings are checked on the first `get_handle` call rather than at startup. Construction
/// runs at most once successfully; a failed attempt leaves the cell empty so the next request
/// tries again. Once built, the handle is shared by every caller.
pub struct DatabaseGateway {
    url: Option<String>,
    service_key: Option<String>,
    connector: Box<dyn DatabaseConnector>,
    handle: OnceCell<DatabaseHandle>,
}

impl DatabaseGateway {
    pub fn new(cfg: &SupabaseConfig, connector: impl DatabaseConnector + 'static) -> Self {
        Self {
            url: cfg.url().map(str::to_string),
            service_key: cfg.service_key().map(str::to_string),
            connector: Box::new(connector),
            handle: OnceCell::new(),
        }
    }

    /// Gateway backed by the real Supabase REST client.
    pub fn from_config(cfg: &SupabaseConfig) -> Self {
        Self::new(cfg, SupabaseConnector::from_config(cfg))
    }

    pub async fn get_handle(&self) -> Result<DatabaseHandle, GatewayError> {
        if let Some(handle) = self.handle.get() {
            return Ok(handle.clone());
        }
        self.handle
            .get_or_try_init(|| self.connect())
            .await
            .cloned()
    }

    async fn connect(&self) -> Result<DatabaseHandle, GatewayError> {
        let (Some(url), Some(service_key)) = (self.url.as_deref(), self.service_key.as_deref())
        else {
            let missing: Vec<&'static str> = [
                (URL_SETTING, self.url.is_none()),
                (KEY_SETTING, self.service_key.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();

            warn!(
                event = "db.gateway.config_missing",
                missing = ?missing,
                "Supabase configuration is incomplete"
            );
            return Err(GatewayError::Configuration { missing });
        };

        info!(
            event = "db.gateway.config_present",
            url = %url,
            "Supabase configuration found; building client"
        );

        match self.connector.connect(url, service_key).await {
            Ok(handle) => {
                info!(event = "db.gateway.init_succeeded", "Supabase client initialized");
                Ok(handle)
            }
            Err(e) => {
                error!(
                    event = "db.gateway.init_failed",
                    error = %e,
                    "Supabase client initialization failed"
                );
                Err(e)
            }
        }
    }
}
