pub mod api;
pub mod cache;
pub mod client;

pub use api::TmdbApi;
pub use cache::{CachePolicy, ResponseCache};
pub use client::{FetchError, FetchRequest, TypedClient};

use async_trait::async_trait;
use std::fmt;

use crate::movies::{MovieCastMember, MovieDetails, MoviePage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    PopularMovies,
    SearchedMovies,
    MovieDetails,
    MovieCasts,
    MovieRecommendations,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::PopularMovies => "popular movies",
            Endpoint::SearchedMovies => "searched movies",
            Endpoint::MovieDetails => "movie details",
            Endpoint::MovieCasts => "movie casts",
            Endpoint::MovieRecommendations => "recommended movies",
        };
        f.write_str(name)
    }
}

/// A failed upstream call, already logged where it happened.
#[derive(Debug, thiserror::Error)]
#[error("{endpoint}: {source}")]
pub struct ApiError {
    pub endpoint: Endpoint,
    #[source]
    pub source: FetchError,
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The movie data operations the application is built on.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn get_popular_movies(&self, page: u32, page_size: u32) -> ApiResult<MoviePage>;

    async fn get_searched_movies(
        &self,
        page: u32,
        page_size: u32,
        keywords: &str,
    ) -> ApiResult<MoviePage>;

    async fn get_movie_details(&self, movie_id: i64) -> ApiResult<MovieDetails>;

    async fn get_movie_casts(&self, movie_id: i64) -> ApiResult<Vec<MovieCastMember>>;

    async fn get_movie_recommendations(
        &self,
        movie_id: i64,
        page: u32,
        page_size: u32,
    ) -> ApiResult<MoviePage>;
}
