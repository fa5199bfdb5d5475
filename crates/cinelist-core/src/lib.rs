pub mod detail;
pub mod feed;
pub mod persist;
pub mod storage;
pub mod wishlist;

pub use detail::{
    director_name, to_genre_names, to_hour_minute, to_language_name, to_us_certification,
    writer_name, CastLine, MovieDetailView,
};
pub use feed::{merge_page, FeedQuery, FetchOutcome, FetchResult, FetchStatus, MovieFeed, PendingFetch};
pub use persist::PersistConfig;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use wishlist::{
    reduce, sort_view, SortOrder, WishlistAction, WishlistSort, WishlistSortKey, WishlistState,
    WishlistStore,
};
