use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::error;

use super::cache::CachePolicy;
use super::client::{FetchError, FetchRequest, TypedClient};
use super::{ApiError, ApiResult, Endpoint, MovieSource};
use crate::movies::{MovieCastMember, MovieDetails, MoviePage};
use crate::schema::{CastResponse, MovieDetailsRecord, MovieListResponse, Shape};

const REVALIDATE_WINDOW: Duration = Duration::from_secs(60);

/// TMDB v3 endpoints behind one typed client.
#[derive(Clone)]
pub struct TmdbApi {
    client: TypedClient,
    base_url: String,
    api_key: String,
}

impl TmdbApi {
    pub fn new(client: TypedClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn list_url(&self, path: &str, page: u32, page_size: u32) -> String {
        format!(
            "{}{}?api_key={}&page={}&pageSize={}",
            self.base_url, path, self.api_key, page, page_size
        )
    }

    fn item_url(&self, path: &str) -> String {
        format!("{}{}?api_key={}", self.base_url, path, self.api_key)
    }

    async fn fetch<T: Shape>(
        &self,
        endpoint: Endpoint,
        url: String,
        cache: CachePolicy,
    ) -> ApiResult<T> {
        let req = FetchRequest::get(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .cache(cache);

        self.client.fetch_typed::<T>(req).await.map_err(|source| {
            log_failure(endpoint, &source);
            ApiError { endpoint, source }
        })
    }
}

fn log_failure(endpoint: Endpoint, err: &FetchError) {
    match err {
        FetchError::Validation(e) => error!(
            endpoint = %endpoint,
            issues = e.issues().len(),
            "Upstream response for {} failed validation: {}", endpoint, e
        ),
        FetchError::Json(e) => error!(endpoint = %endpoint, "Upstream body for {} is not JSON: {}", endpoint, e),
        FetchError::Status { status, .. } => {
            error!(endpoint = %endpoint, status = *status, "Failed to fetch {}: {}", endpoint, err)
        }
        FetchError::Network(e) => error!(endpoint = %endpoint, "Failed to fetch {}: {}", endpoint, e),
    }
}

#[async_trait]
impl MovieSource for TmdbApi {
    async fn get_popular_movies(&self, page: u32, page_size: u32) -> ApiResult<MoviePage> {
        let url = self.list_url("/movie/popular", page, page_size);
        let list: MovieListResponse = self
            .fetch(Endpoint::PopularMovies, url, CachePolicy::ForceCache)
            .await?;
        Ok(list.into())
    }

    async fn get_searched_movies(
        &self,
        page: u32,
        page_size: u32,
        keywords: &str,
    ) -> ApiResult<MoviePage> {
        let url = format!(
            "{}&query={}",
            self.list_url("/search/movie", page, page_size),
            urlencoding::encode(keywords)
        );
        let list: MovieListResponse = self
            .fetch(Endpoint::SearchedMovies, url, CachePolicy::ForceCache)
            .await?;
        Ok(list.into())
    }

    async fn get_movie_details(&self, movie_id: i64) -> ApiResult<MovieDetails> {
        let url = self.item_url(&format!("/movie/{}", movie_id));
        let record: MovieDetailsRecord = self
            .fetch(
                Endpoint::MovieDetails,
                url,
                CachePolicy::Revalidate(REVALIDATE_WINDOW),
            )
            .await?;
        Ok(record.into())
    }

    async fn get_movie_casts(&self, movie_id: i64) -> ApiResult<Vec<MovieCastMember>> {
        let url = self.item_url(&format!("/movie/{}/credits", movie_id));
        let credits: CastResponse = self
            .fetch(Endpoint::MovieCasts, url, CachePolicy::ForceCache)
            .await?;
        Ok(credits.cast.into_iter().map(Into::into).collect())
    }

    async fn get_movie_recommendations(
        &self,
        movie_id: i64,
        page: u32,
        page_size: u32,
    ) -> ApiResult<MoviePage> {
        let url = self.list_url(&format!("/movie/{}/recommendations", movie_id), page, page_size);
        let list: MovieListResponse = self
            .fetch(
                Endpoint::MovieRecommendations,
                url,
                CachePolicy::Revalidate(REVALIDATE_WINDOW),
            )
            .await?;
        Ok(list.into())
    }
}
