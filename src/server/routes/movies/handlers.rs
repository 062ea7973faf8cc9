use super::extract::CreateMovieBody;
use crate::error::MoviesError;
use crate::server::router::AppState;
use axum::{Json, extract::State, http::StatusCode};
use movies_schema::Movie;

pub(super) async fn list_movies_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Movie>>, MoviesError> {
    let movies = state.movies.list_movies().await?;
    Ok(Json(movies))
}

pub(super) async fn create_movie_handler(
    State(state): State<AppState>,
    CreateMovieBody(body): CreateMovieBody,
) -> Result<(StatusCode, Json<Movie>), MoviesError> {
    let movie = state.movies.create_movie(body).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}
