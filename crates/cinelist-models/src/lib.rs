pub mod account;
pub mod credits;
pub mod movie;
pub mod movie_detail;
pub mod paged;
pub mod selection;

pub use account::{AccountAvatar, AccountDetails};
pub use credits::{CastMember, CrewMember, MovieCredits};
pub use movie::{Identified, Movie};
pub use movie_detail::{
    CountryReleaseDates, Genre, MovieDetail, ProductionCompany, ProductionCountry, ReleaseDate,
    ReleaseDates, SpokenLanguage,
};
pub use paged::PagedResult;
pub use selection::{Category, DiscoverSort, SelectList, SelectOption};
