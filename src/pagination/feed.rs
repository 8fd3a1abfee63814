use async_trait::async_trait;
use std::sync::Arc;

use crate::movies::MoviePage;
use crate::schema::SearchKeyword;
use crate::tmdb::{ApiResult, MovieSource};

/// Where a `Paginator` gets its pages from.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<MoviePage>;

    /// Short description used in logs.
    fn label(&self) -> String;
}

/// Popular movies, or search results when a keyword is set.
pub struct ListingFeed {
    movies: Arc<dyn MovieSource>,
    keyword: Option<SearchKeyword>,
}

impl ListingFeed {
    pub fn popular(movies: Arc<dyn MovieSource>) -> Self {
        Self { movies, keyword: None }
    }

    pub fn search(movies: Arc<dyn MovieSource>, keyword: SearchKeyword) -> Self {
        Self {
            movies,
            keyword: Some(keyword),
        }
    }
}

#[async_trait]
impl PageSource for ListingFeed {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<MoviePage> {
        match self.keyword {
            Some(ref keyword) => {
                self.movies
                    .get_searched_movies(page, page_size, keyword.as_str())
                    .await
            }
            None => self.movies.get_popular_movies(page, page_size).await,
        }
    }

    /// Never includes the keyword; labels end up in logs and snapshots.
    fn label(&self) -> String {
        match self.keyword {
            Some(_) => "search".to_string(),
            None => "popular".to_string(),
        }
    }
}

/// Movies recommended for one title.
pub struct RecommendationFeed {
    movies: Arc<dyn MovieSource>,
    movie_id: i64,
}

impl RecommendationFeed {
    pub fn new(movies: Arc<dyn MovieSource>, movie_id: i64) -> Self {
        Self { movies, movie_id }
    }
}

#[async_trait]
impl PageSource for RecommendationFeed {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<MoviePage> {
        self.movies
            .get_movie_recommendations(self.movie_id, page, page_size)
            .await
    }

    fn label(&self) -> String {
        format!("recommendations for {}", self.movie_id)
    }
}
