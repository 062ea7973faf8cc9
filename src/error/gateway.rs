use thiserror::Error as ThisError;

/// Failure to hand out a database handle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum GatewayError {
    /// Connection settings are unset or blank. Carries setting names, never values.
    #[error("Missing required Supabase configuration: {}", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    /// Settings were present but the client could not be built.
    #[error("Failed to initialize Supabase client: {0}")]
    Initialization(String),
}
