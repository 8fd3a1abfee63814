pub mod feed;
pub mod paginator;
pub mod scroll;

pub use feed::{ListingFeed, PageSource, RecommendationFeed};
pub use paginator::{FeedState, FetchOutcome, FetchTicket, Paginator};
pub use scroll::ScrollPosition;
