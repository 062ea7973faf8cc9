use crate::error::{GatewayError, RemoteError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Operation issued against a remote table.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Fetch every row, unfiltered, in the service's native order.
    SelectAll,
    /// Insert one row and return its stored representation.
    Insert(Value),
}

/// Rows carried by a successful operation; `None` when the service sent no payload.
pub type Rows = Option<Vec<Value>>;

#[async_trait]
pub trait RemoteDatabase: Send + Sync {
    async fn query(&self, table: &str, operation: Operation) -> Result<Rows, RemoteError>;
}

/// Shared, reusable session with the remote service.
pub type DatabaseHandle = Arc<dyn RemoteDatabase>;

/// Builds a handle from the two connection settings.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    async fn connect(&self, url: &str, service_key: &str) -> Result<DatabaseHandle, GatewayError>;
}
