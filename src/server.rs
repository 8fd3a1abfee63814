use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::tmdb::MovieSource;
use crate::views::ViewRegistry;
use crate::web::{self, render, Renderer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: Arc<dyn MovieSource>,
    pub views: Arc<ViewRegistry>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(config: Config, movies: Arc<dyn MovieSource>) -> Self {
        let views = Arc::new(ViewRegistry::new(
            Duration::from_secs(config.views.idle_ttl_secs),
            config.views.max_views,
        ));
        let renderer = Arc::new(Renderer::new(config.tmdb.image_base_url.clone()));
        Self {
            config: Arc::new(config),
            movies,
            views,
            renderer,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/popular", get(web::api::popular_movies))
        .route("/api/search", get(web::api::searched_movies))
        .route("/api/movie/:movie_id", get(web::api::movie_details))
        .route("/api/movie/:movie_id/credits", get(web::api::movie_credits))
        .route(
            "/api/movie/:movie_id/recommendations",
            get(web::api::movie_recommendations),
        )
        .route("/api/views/:view_id", get(web::api::view_snapshot));

    let view_routes = Router::new()
        .route("/views/:view_id", delete(web::detach_view))
        .route("/views/:view_id/scroll", post(web::scroll_view))
        .route("/views/:view_id/search", post(web::search_view));

    let mut router = Router::new()
        .route("/", get(web::index))
        .route("/movies", get(web::movies_page))
        .route("/movies/:movie_id", get(web::movie_page))
        .route("/robots.txt", get(robots_txt_handler))
        .route(render::PLACEHOLDER_POSTER, get(placeholder_poster_handler))
        .merge(api_routes)
        .merge(view_routes)
        .fallback(fallback_handler);

    if let Some(ref staticdir) = state.config.staticdir {
        router = router.nest_service("/static", ServeDir::new(staticdir));
    }

    router
        .layer(axum::middleware::from_fn(crate::middleware::cache_control))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /api/\nDisallow: /views/\n"
}

async fn placeholder_poster_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        render::placeholder_poster(),
    )
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    let path = req.uri().path();
    if req.method() == axum::http::Method::GET && path.len() > 1 && path.ends_with('/') {
        return Redirect::permanent(path.trim_end_matches('/')).into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
