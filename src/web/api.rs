use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::movies::{MovieCastMember, MovieDetails, MoviePage};
use crate::schema::{KeywordError, SearchForm};
use crate::server::AppState;
use crate::tmdb::ApiError;
use crate::views::ViewSnapshot;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keywords: String,
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub enum ApiFailure {
    Upstream(ApiError),
    BadKeywords(KeywordError),
    NotFound,
}

impl From<ApiError> for ApiFailure {
    fn from(e: ApiError) -> Self {
        ApiFailure::Upstream(e)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiFailure::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                format!("{}: {}", e.endpoint, e.source.class()),
            ),
            ApiFailure::BadKeywords(e) => (StatusCode::BAD_REQUEST, e.message),
            ApiFailure::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

type ApiReply<T> = Result<Json<T>, ApiFailure>;

fn page_args(state: &AppState, page: Option<u32>, page_size: Option<u32>) -> (u32, u32) {
    (
        page.unwrap_or(1).max(1),
        page_size.unwrap_or(state.config.tmdb.page_size),
    )
}

pub async fn popular_movies(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiReply<MoviePage> {
    let (page, page_size) = page_args(&state, query.page, query.page_size);
    Ok(Json(state.movies.get_popular_movies(page, page_size).await?))
}

pub async fn searched_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiReply<MoviePage> {
    let keyword = SearchForm::new(query.keywords)
        .keyword()
        .map_err(ApiFailure::BadKeywords)?;
    let (page, page_size) = page_args(&state, query.page, query.page_size);
    let movies = state
        .movies
        .get_searched_movies(page, page_size, keyword.as_str())
        .await?;
    Ok(Json(movies))
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> ApiReply<MovieDetails> {
    Ok(Json(state.movies.get_movie_details(movie_id).await?))
}

pub async fn movie_credits(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> ApiReply<Vec<MovieCastMember>> {
    Ok(Json(state.movies.get_movie_casts(movie_id).await?))
}

pub async fn movie_recommendations(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> ApiReply<MoviePage> {
    let (page, page_size) = page_args(&state, query.page, query.page_size);
    let movies = state
        .movies
        .get_movie_recommendations(movie_id, page, page_size)
        .await?;
    Ok(Json(movies))
}

pub async fn view_snapshot(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
) -> ApiReply<ViewSnapshot> {
    let view = state.views.get(&view_id).await.ok_or(ApiFailure::NotFound)?;
    Ok(Json(view.snapshot().await))
}
