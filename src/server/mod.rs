pub mod router;
pub mod routes;

pub use router::{AppState, MoviesApp, movies_router};
