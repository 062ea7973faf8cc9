mod basic;
mod supabase;

pub use basic::{BasicConfig, LogFormat};
pub use supabase::SupabaseConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Remote database settings (see `supabase` table in config.toml).
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// Cross-origin settings (see `cors` table in config.toml).
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser.
    /// TOML: `cors.allowed_origins`. Default: the local React dev server.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variables honoured on top of the TOML file, and the key each one sets.
const ENV_KEYS: [(&str, &str); 7] = [
    ("HOST", "basic.listen_addr"),
    ("PORT", "basic.listen_port"),
    ("LOGLEVEL", "basic.loglevel"),
    ("LOG_FORMAT", "basic.log_format"),
    ("SUPABASE_URL", "supabase.url"),
    ("SUPABASE_SERVICE_KEY", "supabase.service_key"),
    ("SUPABASE_PROXY", "supabase.proxy"),
];

fn env_provider() -> Env {
    Env::raw().filter_map(|key| {
        ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
    })
}

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and the
    /// environment, in that order of precedence (last wins).
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(env_provider())
    }

    /// Loads configuration. Supabase credentials are not checked here.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
