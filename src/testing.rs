//! Fixtures shared by the unit tests.

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::movies::{MovieCastMember, MovieDetails, MoviePage, MovieSummary};
use crate::schema::{MovieDetailsRecord, MovieSummaryRecord, Shape};
use crate::tmdb::{ApiError, ApiResult, Endpoint, FetchError, MovieSource};

pub fn summary_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "adult": false,
        "backdrop_path": format!("/backdrop{}.jpg", id),
        "genre_ids": [18, 53],
        "original_language": "en",
        "original_title": title,
        "overview": format!("Overview of {}", title),
        "popularity": 61.416,
        "poster_path": format!("/poster{}.jpg", id),
        "release_date": "1999-10-15",
        "title": title,
        "video": false,
        "vote_average": 8.4,
        "vote_count": 26280
    })
}

pub fn list_json(page: u32, results: Vec<Value>) -> Value {
    json!({
        "page": page,
        "total_pages": 500,
        "total_results": 10000,
        "results": results
    })
}

pub fn details_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "adult": false,
        "backdrop_path": "/hZkgoQYus5vegHoetLkCJzb17zJ.jpg",
        "belongs_to_collection": null,
        "budget": 63000000,
        "genres": [{ "id": 18, "name": "Drama" }, { "id": 53, "name": "Thriller" }],
        "homepage": "http://www.foxmovies.com/movies/fight-club",
        "imdb_id": "tt0137523",
        "origin_country": ["US"],
        "original_language": "en",
        "original_title": title,
        "overview": "A ticking-time-bomb insomniac and a slippery soap salesman.",
        "popularity": 61.416,
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "production_companies": [{
            "id": 508,
            "logo_path": "/7cxRWzi4LsVm4Utfpr1hfARNurT.png",
            "name": "Regency Enterprises",
            "origin_country": "US"
        }],
        "production_countries": [{ "iso_3166_1": "US", "name": "United States of America" }],
        "release_date": "1999-10-15",
        "revenue": 100853753,
        "runtime": 139,
        "spoken_languages": [{ "english_name": "English", "iso_639_1": "en", "name": "English" }],
        "status": "Released",
        "tagline": "Mischief. Mayhem. Soap.",
        "title": title,
        "video": false,
        "vote_average": 8.433,
        "vote_count": 26280
    })
}

pub fn summary(id: i64, title: &str) -> MovieSummary {
    let record: MovieSummaryRecord = serde_json::from_value(summary_json(id, title)).unwrap();
    record.into()
}

pub fn details(id: i64, title: &str) -> MovieDetails {
    MovieDetailsRecord::validate(&details_json(id, title)).unwrap().into()
}

pub fn cast_member(id: i64, name: &str) -> MovieCastMember {
    MovieCastMember {
        id,
        name: name.to_string(),
        gender: Some(2),
        original_name: name.to_string(),
        adult: false,
        known_for_department: "Acting".to_string(),
        popularity: 10.0,
        profile_path: None,
        cast_id: id,
        character: "Himself".to_string(),
        credit_id: format!("credit{}", id),
        order: 0,
    }
}

fn upstream_down(endpoint: Endpoint) -> ApiError {
    ApiError {
        endpoint,
        source: FetchError::Status {
            status: 503,
            message: "upstream unavailable".to_string(),
        },
    }
}

fn numbered_page(page: u32, pages: u32, per_page: u32, prefix: &str) -> MoviePage {
    let results = if page >= 1 && page <= pages {
        let first = (page as i64 - 1) * per_page as i64;
        (first..first + per_page as i64)
            .map(|id| summary(id, &format!("{} {}", prefix, id)))
            .collect()
    } else {
        Vec::new()
    };
    MoviePage {
        results,
        page,
        total_pages: pages,
        total_results: (pages * per_page) as u64,
    }
}

/// In-memory `MovieSource`.
#[derive(Default)]
pub struct FakeMovies {
    popular_pages: u32,
    per_page: u32,
    repeated_id: Option<i64>,
    searches: HashMap<String, usize>,
    recommendation_pages: u32,
    details: HashMap<i64, String>,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeMovies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_popular_pages(mut self, pages: u32, per_page: u32) -> Self {
        self.popular_pages = pages;
        self.per_page = per_page;
        self
    }

    /// Pages after the first end with another copy of movie `id`.
    pub fn with_repeated_id(mut self, id: i64) -> Self {
        self.repeated_id = Some(id);
        self
    }

    /// Page 1 of a search for `keywords` yields `count` movies.
    pub fn with_search(mut self, keywords: &str, count: usize) -> Self {
        self.searches.insert(keywords.to_string(), count);
        self
    }

    pub fn with_recommendations(mut self, pages: u32, per_page: u32) -> Self {
        self.recommendation_pages = pages;
        self.per_page = per_page;
        self
    }

    pub fn with_details(mut self, id: i64, title: &str) -> Self {
        self.details.insert(id, title.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, endpoint: Endpoint) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(upstream_down(endpoint));
        }
        Ok(())
    }
}

#[async_trait]
impl MovieSource for FakeMovies {
    async fn get_popular_movies(&self, page: u32, _page_size: u32) -> ApiResult<MoviePage> {
        self.enter(Endpoint::PopularMovies)?;
        let mut result = numbered_page(page, self.popular_pages, self.per_page, "Movie");
        if let (Some(id), true) = (self.repeated_id, page > 1) {
            if let Some(last) = result.results.last_mut() {
                *last = summary(id, &format!("Movie {}", id));
            }
        }
        Ok(result)
    }

    async fn get_searched_movies(
        &self,
        page: u32,
        _page_size: u32,
        keywords: &str,
    ) -> ApiResult<MoviePage> {
        self.enter(Endpoint::SearchedMovies)?;
        let count = match (page, self.searches.get(keywords)) {
            (1, Some(count)) => *count,
            _ => 0,
        };
        Ok(MoviePage {
            results: (0..count as i64)
                .map(|i| summary(1000 + i, &format!("{} {}", keywords, i)))
                .collect(),
            page,
            total_pages: 1,
            total_results: count as u64,
        })
    }

    async fn get_movie_details(&self, movie_id: i64) -> ApiResult<MovieDetails> {
        self.enter(Endpoint::MovieDetails)?;
        match self.details.get(&movie_id) {
            Some(title) => Ok(details(movie_id, title)),
            None => Err(ApiError {
                endpoint: Endpoint::MovieDetails,
                source: FetchError::Status {
                    status: 404,
                    message: "The resource you requested could not be found.".to_string(),
                },
            }),
        }
    }

    async fn get_movie_casts(&self, movie_id: i64) -> ApiResult<Vec<MovieCastMember>> {
        self.enter(Endpoint::MovieCasts)?;
        if !self.details.contains_key(&movie_id) {
            return Err(upstream_down(Endpoint::MovieCasts));
        }
        Ok(vec![cast_member(287, "Brad Pitt"), cast_member(819, "Edward Norton")])
    }

    async fn get_movie_recommendations(
        &self,
        _movie_id: i64,
        page: u32,
        _page_size: u32,
    ) -> ApiResult<MoviePage> {
        self.enter(Endpoint::MovieRecommendations)?;
        Ok(numbered_page(page, self.recommendation_pages, self.per_page, "Recommended"))
    }
}

/// A real HTTP server on an ephemeral port standing in for the upstream API.
pub struct FakeUpstream {
    base: String,
    hits: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub async fn start(router: Router) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = router.layer(axum::middleware::from_fn(move |req: Request, next: Next| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let response: Response = next.run(req).await;
                response
            }
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            hits,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// The full router over a `FakeMovies`, which is handed back for call counts.
pub fn test_app(movies: FakeMovies) -> (Router, Arc<FakeMovies>) {
    let movies = Arc::new(movies);
    let source: Arc<dyn MovieSource> = movies.clone();
    let config = crate::config::Config::from_yaml("test", "{}").unwrap();
    let state = crate::server::AppState::new(config, source);
    (crate::server::build_router(state), movies)
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The response body as JSON, or `Null` when it is empty or not JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
