use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::movie::{parse_release_date, Identified, Movie};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductionCountry {
    #[serde(rename = "iso31661")]
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SpokenLanguage {
    #[serde(rename = "iso6391")]
    pub iso_639_1: String,
    pub english_name: String,
    pub name: String,
}

/// One certification entry for a country.
///
/// `release_type` follows the upstream numbering (3 = theatrical).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseDate {
    pub certification: Option<String>,
    #[serde(rename = "type")]
    pub release_type: Option<u8>,
    pub release_date: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CountryReleaseDates {
    #[serde(rename = "iso31661")]
    pub iso_3166_1: String,
    pub release_dates: Vec<ReleaseDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseDates {
    pub results: Vec<CountryReleaseDates>,
}

/// Full movie record from `/movie/{id}`. This is what the wishlist persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
    pub original_language: String,
    pub adult: bool,
    pub video: bool,
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub release_dates: Option<ReleaseDates>,
    pub budget: u64,
    pub revenue: u64,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
}

impl MovieDetail {
    pub fn release_day(&self) -> Option<NaiveDate> {
        parse_release_date(self.release_date.as_deref())
    }

    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_day().map(|d| d.year())
    }

    /// Summary view used when rendering detail records in movie lists.
    pub fn to_summary(&self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.clone(),
            original_title: self.original_title.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            original_language: self.original_language.clone(),
            adult: self.adult,
            video: self.video,
        }
    }
}

impl PartialEq for MovieDetail {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Identified for MovieDetail {
    fn id(&self) -> u64 {
        self.id
    }
}
