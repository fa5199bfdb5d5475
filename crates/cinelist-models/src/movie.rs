use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Anything that carries a stable upstream identifier.
///
/// Paged accumulation and the wishlist both deduplicate on this id.
pub trait Identified {
    fn id(&self) -> u64;
}

/// Movie summary as returned by discover, search and recommendation listings.
///
/// Fields are camelCase because payloads are normalized before decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Movie {
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
    pub genre_ids: Vec<u64>,
    pub original_language: String,
    pub adult: bool,
    pub video: bool,
}

impl Movie {
    /// Parse `releaseDate` (YYYY-MM-DD). Empty or malformed dates yield `None`.
    pub fn release_day(&self) -> Option<NaiveDate> {
        parse_release_date(self.release_date.as_deref())
    }

    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_day().map(|d| d.year())
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Movie {}

impl Identified for Movie {
    fn id(&self) -> u64 {
        self.id
    }
}

pub(crate) fn parse_release_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_normalized_summary() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 550,
            "title": "Fight Club",
            "originalTitle": "Fight Club",
            "posterPath": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "releaseDate": "1999-10-15",
            "voteAverage": 8.4,
            "voteCount": 26280,
            "genreIds": [18],
            "adult": false
        }))
        .unwrap();

        assert_eq!(movie.id, 550);
        assert_eq!(movie.genre_ids, vec![18]);
        assert_eq!(movie.release_year(), Some(1999));
        assert_eq!(movie.backdrop_path, None);
    }

    #[test]
    fn test_equality_is_by_id() {
        let a = Movie { id: 1, title: "A".to_string(), ..Movie::default() };
        let b = Movie { id: 1, title: "B".to_string(), ..Movie::default() };
        let c = Movie { id: 2, title: "A".to_string(), ..Movie::default() };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_release_day_tolerates_blank_dates() {
        let movie = Movie { release_date: Some(String::new()), ..Movie::default() };
        assert_eq!(movie.release_day(), None);

        let movie = Movie { release_date: Some("not-a-date".to_string()), ..Movie::default() };
        assert_eq!(movie.release_day(), None);
    }
}
