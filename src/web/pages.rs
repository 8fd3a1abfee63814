use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::render::{DetailPage, Feed, ListingPage, NO_MOVIES, NO_RECOMMENDATIONS};
use crate::pagination::{ListingFeed, PageSource, Paginator, RecommendationFeed};
use crate::schema::SearchForm;
use crate::server::AppState;
use crate::views::ViewKind;

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub keywords: Option<String>,
}

pub async fn index() -> Redirect {
    Redirect::to("/movies")
}

/// The listing page: popular movies, or search results for `?keywords=`.
pub async fn movies_page(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Html<String> {
    let mut error = None;
    let mut keyword = None;

    // A submitted form always carries the parameter, even when it is empty.
    if let Some(ref raw) = query.keywords {
        match SearchForm::new(raw.clone()).keyword() {
            Ok(k) => keyword = Some(k),
            Err(e) => error = Some(e.message),
        }
    }
    let input = query.keywords.unwrap_or_default();
    let searching = keyword.is_some();

    let source: Arc<dyn PageSource> = match keyword {
        Some(keyword) => Arc::new(ListingFeed::search(state.movies.clone(), keyword)),
        None => Arc::new(ListingFeed::popular(state.movies.clone())),
    };
    let paginator = Paginator::new(source, state.config.tmdb.page_size);
    let view = state.views.attach(ViewKind::Listing, paginator).await;
    let update = view.reset().await;

    Html(state.renderer.listing_page(&ListingPage {
        searching,
        input: &input,
        error: error.as_deref(),
        feed: Feed {
            view_id: Some(&view.id),
            items: &update.items,
            empty_message: NO_MOVIES,
            threshold: state.config.views.scroll_threshold,
        },
    }))
}

/// The detail page. Details, cast and recommendations are fetched
/// independently; whatever fails is simply left out.
pub async fn movie_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let movie_id = match raw_id.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!("Invalid movie id {:?}", raw_id);
            None
        }
    };

    let Some(movie_id) = movie_id else {
        return Html(state.renderer.detail_page(&DetailPage {
            details: None,
            cast: None,
            recommendations: Feed {
                view_id: None,
                items: &[],
                empty_message: NO_RECOMMENDATIONS,
                threshold: state.config.views.scroll_threshold,
            },
        }));
    };

    let source = Arc::new(RecommendationFeed::new(state.movies.clone(), movie_id));
    let paginator = Paginator::new(source, state.config.tmdb.page_size);
    let view = state.views.attach(ViewKind::Recommendations, paginator).await;

    let (details, cast, recommendations) = tokio::join!(
        state.movies.get_movie_details(movie_id),
        state.movies.get_movie_casts(movie_id),
        view.reset(),
    );
    let details = details.ok();
    let cast = cast.ok();

    Html(state.renderer.detail_page(&DetailPage {
        details: details.as_ref(),
        cast: cast.as_deref(),
        recommendations: Feed {
            view_id: Some(&view.id),
            items: &recommendations.items,
            empty_message: NO_RECOMMENDATIONS,
            threshold: state.config.views.scroll_threshold,
        },
    }))
}

#[cfg(test)]
mod tests {
    use crate::testing::{body_string, test_app, FakeMovies};
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    async fn get(movies: FakeMovies, uri: &str) -> (StatusCode, String) {
        let (app, _) = test_app(movies);
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_string(response).await)
    }

    #[tokio::test]
    async fn test_index_redirects() {
        let (app, _) = test_app(FakeMovies::new());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/movies");
    }

    #[tokio::test]
    async fn test_popular_listing() {
        let (status, html) = get(FakeMovies::new().with_popular_pages(2, 20), "/movies").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Popular Movies"));
        assert_eq!(html.matches(r#"class="card""#).count(), 20);
        assert!(html.contains(r#"<p class="empty" hidden>"#));
    }

    #[tokio::test]
    async fn test_search_listing() {
        let (_, html) = get(FakeMovies::new().with_search("heat", 3), "/movies?keywords=heat").await;
        assert!(html.contains("Searched Movies"));
        assert!(html.contains(r#"value="heat""#));
        assert_eq!(html.matches(r#"class="card""#).count(), 3);
    }

    #[tokio::test]
    async fn test_search_without_results() {
        let (_, html) = get(FakeMovies::new(), "/movies?keywords=xyzxyz123notreal").await;
        assert!(html.contains(r#"<p class="empty">No movies found</p>"#));
    }

    #[tokio::test]
    async fn test_blank_keywords_show_error() {
        let (_, html) = get(
            FakeMovies::new().with_popular_pages(1, 20),
            "/movies?keywords=%20%20%20",
        )
        .await;
        assert!(html.contains(r#"<p class="error">Please enter keywords to search.</p>"#));
        assert!(html.contains("Popular Movies"));
    }

    #[tokio::test]
    async fn test_empty_keywords_show_error() {
        let (_, html) = get(FakeMovies::new().with_popular_pages(1, 20), "/movies?keywords=").await;
        assert!(html.contains("Please enter keywords to search."));
    }

    #[tokio::test]
    async fn test_upstream_failure_renders_empty_list() {
        let (status, html) = get(FakeMovies::new().failing(), "/movies").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<p class="empty">No movies found</p>"#));
    }

    #[tokio::test]
    async fn test_detail_page() {
        let movies = FakeMovies::new()
            .with_details(550, "Fight Club")
            .with_recommendations(2, 20);
        let (status, html) = get(movies, "/movies/550").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<span>Fight Club</span>"));
        assert!(html.contains("Drama, Thriller"));
        assert!(html.contains("Brad Pitt, Edward Norton"));
        assert!(html.contains("Recommended Movies"));
        assert_eq!(html.matches(r#"class="card""#).count(), 20);
    }

    #[tokio::test]
    async fn test_detail_page_with_bad_id() {
        let (app, movies) = test_app(FakeMovies::new());
        let response = app
            .oneshot(Request::builder().uri("/movies/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<span></span>"));
        assert!(html.contains(r#"<p class="empty">No recommendation found</p>"#));
        assert_eq!(movies.calls(), 0);
    }

    #[tokio::test]
    async fn test_detail_page_unknown_movie() {
        let (_, html) = get(FakeMovies::new(), "/movies/42").await;
        assert!(html.contains("<span></span>"));
        assert!(html.contains("No recommendation found"));
    }
}
