use serde::{Deserialize, Serialize};

use crate::schema::{CastMemberRecord, MovieDetailsRecord, MovieListResponse, MovieSummaryRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub adult: bool,
    pub backdrop_path: Option<String>,
    pub genre_ids: Vec<i64>,
    pub original_language: String,
    pub original_title: String,
    pub overview: String,
    pub popularity: f64,
    pub poster_path: Option<String>,
    pub release_date: String,
    pub title: String,
    pub video: bool,
    pub vote_average: f64,
    pub vote_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub results: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl MoviePage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: i64,
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    pub logo_path: Option<String>,
    pub name: String,
    pub origin_country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub english_name: String,
    pub iso_639_1: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub adult: bool,
    pub backdrop_path: Option<String>,
    pub belongs_to_collection: Option<CollectionRef>,
    pub budget: i64,
    pub genres: Vec<Genre>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub origin_country: Vec<String>,
    pub original_language: String,
    pub original_title: String,
    pub overview: String,
    pub popularity: f64,
    pub poster_path: Option<String>,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<ProductionCountry>,
    pub release_date: String,
    pub revenue: i64,
    pub runtime: Option<i32>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub status: String,
    pub tagline: Option<String>,
    pub title: String,
    pub video: bool,
    pub vote_average: f64,
    pub vote_count: i64,
}

impl MovieDetails {
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCastMember {
    pub id: i64,
    pub name: String,
    pub gender: Option<i32>,
    pub original_name: String,
    pub adult: bool,
    pub known_for_department: String,
    pub popularity: f64,
    pub profile_path: Option<String>,
    pub cast_id: i64,
    pub character: String,
    pub credit_id: String,
    pub order: i32,
}

// The upstream records and the local shapes are field-for-field copies for
// now; the conversions are where they are allowed to drift apart.

impl From<MovieSummaryRecord> for MovieSummary {
    fn from(m: MovieSummaryRecord) -> Self {
        Self {
            id: m.id,
            adult: m.adult,
            backdrop_path: m.backdrop_path,
            genre_ids: m.genre_ids,
            original_language: m.original_language,
            original_title: m.original_title,
            overview: m.overview,
            popularity: m.popularity,
            poster_path: m.poster_path,
            release_date: m.release_date,
            title: m.title,
            video: m.video,
            vote_average: m.vote_average,
            vote_count: m.vote_count,
            media_type: m.media_type,
        }
    }
}

impl From<MovieListResponse> for MoviePage {
    fn from(r: MovieListResponse) -> Self {
        Self {
            results: r.results.into_iter().map(Into::into).collect(),
            page: r.page,
            total_pages: r.total_pages,
            total_results: r.total_results,
        }
    }
}

impl From<MovieDetailsRecord> for MovieDetails {
    fn from(r: MovieDetailsRecord) -> Self {
        Self {
            id: r.id,
            adult: r.adult,
            backdrop_path: r.backdrop_path,
            belongs_to_collection: r.belongs_to_collection,
            budget: r.budget,
            genres: r.genres,
            homepage: r.homepage,
            imdb_id: r.imdb_id,
            origin_country: r.origin_country,
            original_language: r.original_language,
            original_title: r.original_title,
            overview: r.overview,
            popularity: r.popularity,
            poster_path: r.poster_path,
            production_companies: r.production_companies,
            production_countries: r.production_countries,
            release_date: r.release_date,
            revenue: r.revenue,
            runtime: r.runtime,
            spoken_languages: r.spoken_languages,
            status: r.status,
            tagline: r.tagline,
            title: r.title,
            video: r.video,
            vote_average: r.vote_average,
            vote_count: r.vote_count,
        }
    }
}

impl From<CastMemberRecord> for MovieCastMember {
    fn from(c: CastMemberRecord) -> Self {
        Self {
            id: c.id,
            name: c.name,
            gender: c.gender,
            original_name: c.original_name,
            adult: c.adult,
            known_for_department: c.known_for_department,
            popularity: c.popularity,
            profile_path: c.profile_path,
            cast_id: c.cast_id,
            character: c.character,
            credit_id: c.credit_id,
            order: c.order,
        }
    }
}
