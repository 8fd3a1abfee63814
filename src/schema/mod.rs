pub mod movie;
pub mod search;
pub mod shape;

pub use movie::{CastMemberRecord, CastResponse, MovieDetailsRecord, MovieListResponse, MovieSummaryRecord};
pub use search::{KeywordError, SearchForm, SearchKeyword, KEYWORDS_REQUIRED};
pub use shape::{check, Field, Issue, IssueKind, Kind, Presence, SchemaError, Shape};
