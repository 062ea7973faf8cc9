mod gateway;
mod movies;
mod remote;
mod validation;

pub use gateway::GatewayError;
pub use movies::{MoviesError, StorageError};
pub use remote::RemoteError;
pub use validation::ValidationError;
