//! Database module: access to the remote Supabase (PostgREST) service.
//!
//! Layout:
//! - `traits.rs`: the `query(table, operation)` seam and the connector used to build handles
//! - `supabase.rs`: reqwest-backed PostgREST client and its connector
//! - `gateway.rs`: lazily-built, process-wide handle shared by every request

pub mod gateway;
pub mod supabase;
pub mod traits;

pub use gateway::DatabaseGateway;
pub use supabase::{SupabaseClient, SupabaseConnector};
pub use traits::{DatabaseConnector, DatabaseHandle, Operation, RemoteDatabase, Rows};
