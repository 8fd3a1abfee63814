use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::render::listing_heading;
use crate::pagination::{FeedState, FetchOutcome, ListingFeed, ScrollPosition};
use crate::schema::SearchForm;
use crate::server::AppState;
use crate::views::{ViewKind, ViewUpdate};

/// Rendered cards plus the state of the view they belong to.
#[derive(Debug, Serialize)]
pub struct FeedChunk {
    pub html: String,
    pub appended: usize,
    pub total: usize,
    pub page: u32,
    pub state: FeedState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<FetchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchRejected {
    pub error: String,
}

fn chunk(state: &AppState, update: ViewUpdate) -> FeedChunk {
    FeedChunk {
        html: state.renderer.movie_cards(&update.items),
        appended: update.items.len(),
        total: update.total,
        page: update.page,
        state: update.state,
        outcome: update.outcome,
        heading: None,
    }
}

pub async fn scroll_view(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
    Json(position): Json<ScrollPosition>,
) -> Result<Json<FeedChunk>, StatusCode> {
    let view = state.views.get(&view_id).await.ok_or(StatusCode::NOT_FOUND)?;
    let update = view
        .scroll(&position, state.config.views.scroll_threshold)
        .await;
    Ok(Json(chunk(&state, update)))
}

/// Run a new search in an existing listing view.
pub async fn search_view(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
    Json(form): Json<SearchForm>,
) -> Result<Response, StatusCode> {
    let view = state.views.get(&view_id).await.ok_or(StatusCode::NOT_FOUND)?;
    if view.kind != ViewKind::Listing {
        return Err(StatusCode::CONFLICT);
    }

    let keyword = match form.keyword() {
        Ok(keyword) => keyword,
        Err(e) => {
            let body = SearchRejected { error: e.message };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
        }
    };

    let update = view
        .retarget(Arc::new(ListingFeed::search(state.movies.clone(), keyword)))
        .await;
    let mut chunk = chunk(&state, update);
    chunk.heading = Some(listing_heading(true).to_string());
    Ok(Json(chunk).into_response())
}

pub async fn detach_view(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
) -> StatusCode {
    if state.views.detach(&view_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
