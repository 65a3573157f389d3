//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_accounting_provider() -> String {
    "quickbooks".to_string()
}

const fn default_cache_ttl_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    pub auth_service_url: String,
    /// Root URL of the finance REST backend.
    pub api_base_url: String,
    pub api_token: String,
    /// Path segment of the accounting provider endpoints.
    #[serde(default = "default_accounting_provider")]
    pub accounting_provider: String,
    /// Seconds a cached backend read stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}
