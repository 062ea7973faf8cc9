use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Connection settings for the remote Supabase project.
///
/// `url` and `service_key` are deliberately optional here: absence is reported by the
/// database gateway on first use, not at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseConfig {
    /// Base URL of the Supabase project.
    /// TOML: `supabase.url`. Env: `SUPABASE_URL`.
    #[serde(default)]
    pub url: Option<String>,

    /// Service role key, server-side only.
    /// TOML: `supabase.service_key`. Env: `SUPABASE_SERVICE_KEY`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub service_key: Option<String>,

    /// Table holding movie rows.
    /// TOML: `supabase.table`. Default: `movies`.
    #[serde(default = "default_table")]
    pub table: String,

    /// Optional outbound HTTP proxy for the database client.
    /// TOML: `supabase.proxy`. Env: `SUPABASE_PROXY`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// TOML: `supabase.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// TOML: `supabase.request_timeout_secs`. Default: `30`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: default_table(),
            proxy: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SupabaseConfig {
    /// Trimmed project URL, `None` when unset or blank.
    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    /// Trimmed service key, `None` when unset or blank.
    pub fn service_key(&self) -> Option<&str> {
        non_blank(self.service_key.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// Env values that look numeric reach us as numbers.
fn deserialize_opt_string_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for supabase.service_key",
        )),
    }
}

fn default_table() -> String {
    "movies".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}
