pub mod api;
pub mod feed;
pub mod pages;
pub mod render;

pub use feed::{detach_view, scroll_view, search_view, FeedChunk};
pub use pages::{index, movie_page, movies_page};
pub use render::Renderer;
