use serde::{Deserialize, Serialize};

use super::shape::{Field, Kind, Shape};
use crate::movies::{CollectionRef, Genre, ProductionCompany, ProductionCountry, SpokenLanguage};

// Upstream response records. Each carries the field table it is validated
// against; the tables and the struct definitions must stay in step.

const MOVIE_SUMMARY: &[Field] = &[
    Field::required("id", Kind::Integer),
    Field::required("adult", Kind::Bool),
    Field::nullable("backdrop_path", Kind::String),
    Field::required("genre_ids", Kind::ArrayOf(&Kind::Integer)),
    Field::required("original_language", Kind::String),
    Field::required("original_title", Kind::String),
    Field::required("overview", Kind::String),
    Field::required("popularity", Kind::Number),
    Field::nullable("poster_path", Kind::String),
    Field::required("release_date", Kind::String),
    Field::required("title", Kind::String),
    Field::required("video", Kind::Bool),
    Field::required("vote_average", Kind::Number),
    Field::required("vote_count", Kind::Integer),
    Field::optional("media_type", Kind::String),
];

const MOVIE_LIST: &[Field] = &[
    Field::required("page", Kind::Integer),
    Field::required("total_pages", Kind::Integer),
    Field::required("total_results", Kind::Integer),
    Field::required("results", Kind::ArrayOf(&Kind::Object(MOVIE_SUMMARY))),
];

const COLLECTION: &[Field] = &[
    Field::required("id", Kind::Integer),
    Field::required("name", Kind::String),
    Field::nullable("poster_path", Kind::String),
    Field::nullable("backdrop_path", Kind::String),
];

const GENRE: &[Field] = &[
    Field::required("id", Kind::Integer),
    Field::required("name", Kind::String),
];

const COMPANY: &[Field] = &[
    Field::required("id", Kind::Integer),
    Field::nullable("logo_path", Kind::String),
    Field::required("name", Kind::String),
    Field::required("origin_country", Kind::String),
];

const COUNTRY: &[Field] = &[
    Field::required("iso_3166_1", Kind::String),
    Field::required("name", Kind::String),
];

const LANGUAGE: &[Field] = &[
    Field::required("english_name", Kind::String),
    Field::required("iso_639_1", Kind::String),
    Field::required("name", Kind::String),
];

const MOVIE_DETAILS: &[Field] = &[
    Field::required("id", Kind::Integer),
    Field::required("adult", Kind::Bool),
    Field::nullable("backdrop_path", Kind::String),
    Field::nullable("belongs_to_collection", Kind::Object(COLLECTION)),
    Field::required("budget", Kind::Integer),
    Field::required("genres", Kind::ArrayOf(&Kind::Object(GENRE))),
    Field::nullable("homepage", Kind::Url),
    Field::nullable("imdb_id", Kind::String),
    Field::required("origin_country", Kind::ArrayOf(&Kind::String)),
    Field::required("original_language", Kind::String),
    Field::required("original_title", Kind::String),
    Field::required("overview", Kind::String),
    Field::required("popularity", Kind::Number),
    Field::nullable("poster_path", Kind::String),
    Field::required("production_companies", Kind::ArrayOf(&Kind::Object(COMPANY))),
    Field::required("production_countries", Kind::ArrayOf(&Kind::Object(COUNTRY))),
    Field::required("release_date", Kind::String),
    Field::required("revenue", Kind::Integer),
    Field::nullable("runtime", Kind::Integer),
    Field::required("spoken_languages", Kind::ArrayOf(&Kind::Object(LANGUAGE))),
    Field::required("status", Kind::String),
    Field::nullable("tagline", Kind::String),
    Field::required("title", Kind::String),
    Field::required("video", Kind::Bool),
    Field::required("vote_average", Kind::Number),
    Field::required("vote_count", Kind::Integer),
];

const CAST_MEMBER: &[Field] = &[
    Field::required("id", Kind::Integer),
    Field::required("name", Kind::String),
    Field::nullable("gender", Kind::Integer),
    Field::required("original_name", Kind::String),
    Field::required("adult", Kind::Bool),
    Field::required("known_for_department", Kind::String),
    Field::required("popularity", Kind::Number),
    Field::nullable("profile_path", Kind::String),
    Field::required("cast_id", Kind::Integer),
    Field::required("character", Kind::String),
    Field::required("credit_id", Kind::String),
    Field::required("order", Kind::Integer),
];

const CAST: &[Field] = &[
    Field::required("id", Kind::Integer),
    Field::required("cast", Kind::ArrayOf(&Kind::Object(CAST_MEMBER))),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummaryRecord {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieListResponse {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub results: Vec<MovieSummaryRecord>,
}

impl Shape for MovieListResponse {
    const NAME: &'static str = "movie list";
    const FIELDS: &'static [Field] = MOVIE_LIST;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetailsRecord {
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

impl Shape for MovieDetailsRecord {
    const NAME: &'static str = "movie details";
    const FIELDS: &'static [Field] = MOVIE_DETAILS;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMemberRecord {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastResponse {
    pub id: i64,
    pub cast: Vec<CastMemberRecord>,
}

impl Shape for CastResponse {
    const NAME: &'static str = "movie credits";
    const FIELDS: &'static [Field] = CAST;
}
