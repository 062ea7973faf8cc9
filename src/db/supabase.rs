use crate::config::SupabaseConfig;
use crate::error::{GatewayError, RemoteError};
use async_trait::async_trait;
use reqwest::{
    StatusCode,
    header::{ACCEPT, HeaderValue},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::traits::{DatabaseConnector, DatabaseHandle, Operation, RemoteDatabase, Rows};

const USER_AGENT: &str = concat!("movies-api/", env!("CARGO_PKG_VERSION"));
const REST_PATH: &str = "rest/v1/";
const BODY_PREVIEW_CHARS: usize = 300;

/// PostgREST error payload (`{"code","message","details","hint"}`).
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Value>,
    #[serde(default)]
    hint: Option<Value>,
}

impl PostgrestErrorBody {
    fn into_message(self) -> (Option<String>, String) {
        let parts: Vec<String> = [
            self.message.map(Value::String),
            self.details,
            self.hint,
        ]
        .into_iter()
        .flatten()
        .filter_map(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .filter(|s| !s.trim().is_empty())
        .collect();
        (self.code, parts.join(" "))
    }
}

fn rejection_from_body(status: StatusCode, bytes: &[u8]) -> RemoteError {
    let (code, message) = serde_json::from_slice::<PostgrestErrorBody>(bytes)
        .map(PostgrestErrorBody::into_message)
        .unwrap_or_default();

    let message = if !message.trim().is_empty() {
        message
    } else if !bytes.iter().all(u8::is_ascii_whitespace) {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    };

    let preview: String = message.chars().take(BODY_PREVIEW_CHARS).collect();
    tracing::debug!(
        %status,
        code = ?code,
        message = %preview,
        "Supabase returned an error response"
    );
    RemoteError::Rejected {
        status,
        code,
        message,
    }
}

fn parse_rows(bytes: &[u8]) -> Result<Rows, RemoteError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Null => Ok(None),
        Value::Array(rows) => Ok(Some(rows)),
        row @ Value::Object(_) => Ok(Some(vec![row])),
        other => Err(RemoteError::Payload(serde::de::Error::custom(format!(
            "expected an array of rows, got {other}"
        )))),
    }
}

/// Client for one Supabase project's REST endpoint.
pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: Url,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(
        client: reqwest::Client,
        project_url: &Url,
        service_key: &str,
    ) -> Result<Self, url::ParseError> {
        let mut base = project_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            rest_url: base.join(REST_PATH)?,
            service_key: service_key.to_string(),
        })
    }

    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    fn table_url(&self, table: &str) -> Result<Url, RemoteError> {
        Ok(self.rest_url.join(table)?)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", self.service_key.as_str())
            .bearer_auth(&self.service_key)
            .header(ACCEPT, "application/json")
    }

    pub fn build_select_request(&self, table: &str) -> Result<reqwest::Request, RemoteError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("select", "*");
        Ok(self.authorized(self.client.get(url)).build()?)
    }

    pub fn build_insert_request(
        &self,
        table: &str,
        row: &Value,
    ) -> Result<reqwest::Request, RemoteError> {
        let url = self.table_url(table)?;
        Ok(self
            .authorized(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(row)
            .build()?)
    }
}

#[async_trait]
impl RemoteDatabase for SupabaseClient {
    async fn query(&self, table: &str, operation: Operation) -> Result<Rows, RemoteError> {
        let req = match &operation {
            Operation::SelectAll => self.build_select_request(table)?,
            Operation::Insert(row) => self.build_insert_request(table, row)?,
        };

        let resp = self.client.execute(req).await?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| RemoteError::Body { status, source })?;

        if !status.is_success() {
            return Err(rejection_from_body(status, &bytes));
        }
        parse_rows(&bytes)
    }
}

/// Builds [`SupabaseClient`] handles with the configured transport settings.
#[derive(Debug, Clone)]
pub struct SupabaseConnector {
    proxy: Option<Url>,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl SupabaseConnector {
    pub fn from_config(cfg: &SupabaseConfig) -> Self {
        Self {
            proxy: cfg.proxy.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        builder.build()
    }
}

#[async_trait]
impl DatabaseConnector for SupabaseConnector {
    async fn connect(&self, url: &str, service_key: &str) -> Result<DatabaseHandle, GatewayError> {
        let project_url = Url::parse(url)
            .map_err(|e| GatewayError::Initialization(format!("invalid SUPABASE_URL: {e}")))?;
        if !matches!(project_url.scheme(), "http" | "https") {
            return Err(GatewayError::Initialization(format!(
                "unsupported SUPABASE_URL scheme: {}",
                project_url.scheme()
            )));
        }
        // Never echo the key back, even in error text.
        HeaderValue::from_str(service_key).map_err(|_| {
            GatewayError::Initialization("SUPABASE_SERVICE_KEY is not a valid header value".into())
        })?;

        let client = self
            .build_client()
            .map_err(|e| GatewayError::Initialization(format!("HTTP client build failed: {e}")))?;
        let supabase = SupabaseClient::new(client, &project_url, service_key)
            .map_err(|e| GatewayError::Initialization(format!("invalid SUPABASE_URL: {e}")))?;

        Ok(Arc::new(supabase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;

    fn client_for(base: &str) -> SupabaseClient {
        let url = Url::parse(base).expect("invalid url");
        SupabaseClient::new(reqwest::Client::new(), &url, "svc-key").expect("client")
    }

    fn header<'a>(req: &'a reqwest::Request, name: &str) -> Option<&'a str> {
        req.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn rest_url_handles_trailing_slash_and_prefix() {
        assert_eq!(
            client_for("https://abc.supabase.co").rest_url().as_str(),
            "https://abc.supabase.co/rest/v1/"
        );
        assert_eq!(
            client_for("http://127.0.0.1:54321/proxy").rest_url().as_str(),
            "http://127.0.0.1:54321/proxy/rest/v1/"
        );
    }

    #[test]
    fn build_select_request_sets_expected_headers() {
        let client = client_for("https://abc.supabase.co/");
        let req = client.build_select_request("movies").expect("request");

        assert_eq!(req.method(), Method::GET);
        assert_eq!(
            req.url().as_str(),
            "https://abc.supabase.co/rest/v1/movies?select=*"
        );
        assert_eq!(header(&req, "apikey"), Some("svc-key"));
        assert_eq!(header(&req, "authorization"), Some("Bearer svc-key"));
    }

    #[test]
    fn build_insert_request_asks_for_representation() {
        let client = client_for("https://abc.supabase.co/");
        let row = json!({ "title": "Dune" });
        let req = client.build_insert_request("movies", &row).expect("request");

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.url().as_str(), "https://abc.supabase.co/rest/v1/movies");
        assert_eq!(header(&req, "prefer"), Some("return=representation"));
        let body = req.body().and_then(|b| b.as_bytes()).expect("buffered body");
        assert_eq!(serde_json::from_slice::<Value>(body).unwrap(), row);
    }

    #[test]
    fn rejection_joins_postgrest_fields() {
        let body = br#"{"code":"42703","details":null,"hint":"Perhaps you meant \"title\".","message":"column movies.photo_url does not exist"}"#;
        let err = rejection_from_body(StatusCode::BAD_REQUEST, body);
        match err {
            RemoteError::Rejected { code, message, .. } => {
                assert_eq!(code.as_deref(), Some("42703"));
                assert_eq!(
                    message,
                    "column movies.photo_url does not exist Perhaps you meant \"title\"."
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejection_falls_back_to_raw_text_then_reason() {
        let err = rejection_from_body(StatusCode::BAD_GATEWAY, b"upstream down");
        assert_eq!(err.message(), "upstream down");

        let err = rejection_from_body(StatusCode::SERVICE_UNAVAILABLE, b"");
        assert_eq!(err.message(), "Service Unavailable");
    }

    #[test]
    fn long_raw_rejection_text_is_kept_whole() {
        let body = format!("{} column photo_url does not exist", "x".repeat(400));
        let err = rejection_from_body(StatusCode::BAD_REQUEST, body.as_bytes());
        assert_eq!(err.message(), body);
        assert!(err.is_refusal());
    }

    #[test]
    fn undecodable_success_body_is_not_a_refusal() {
        let err = parse_rows(b"<html>ok</html>").unwrap_err();
        assert!(matches!(err, RemoteError::Payload(_)));
        assert!(!err.is_refusal());
    }

    #[test]
    fn parse_rows_normalizes_payload_shapes() {
        assert_eq!(parse_rows(b"").unwrap(), None);
        assert_eq!(parse_rows(b"null").unwrap(), None);
        assert_eq!(parse_rows(b"[]").unwrap(), Some(vec![]));
        assert_eq!(
            parse_rows(br#"{"id":1}"#).unwrap(),
            Some(vec![json!({ "id": 1 })])
        );
        assert!(parse_rows(b"42").is_err());
    }

    #[tokio::test]
    async fn connector_rejects_malformed_urls() {
        let connector = SupabaseConnector::from_config(&SupabaseConfig::default());

        let err = connector.connect("not a url", "key").await.err();
        assert!(matches!(err, Some(GatewayError::Initialization(_))));

        let err = connector.connect("ftp://abc.supabase.co", "key").await.err();
        assert!(matches!(err, Some(GatewayError::Initialization(_))));
    }

    #[tokio::test]
    async fn connector_never_leaks_key_in_errors() {
        let connector = SupabaseConnector::from_config(&SupabaseConfig::default());
        let err = connector
            .connect("https://abc.supabase.co", "secret\nvalue")
            .await
            .err()
            .expect("newline is not a valid header value");
        assert!(!err.to_string().contains("secret"));
    }
}
