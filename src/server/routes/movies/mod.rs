use crate::server::router::AppState;
use axum::{Router, routing::get};

pub mod extract;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/movies",
        get(handlers::list_movies_handler).post(handlers::create_movie_handler),
    )
}
