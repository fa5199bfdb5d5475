//! Formatting helpers for the movie detail view.

use cinelist_models::{CrewMember, Genre, MovieCredits, MovieDetail, ReleaseDates};
use serde::Serialize;

const THEATRICAL_RELEASE: u8 = 3;

/// `197` -> `3h 17m`, `60` -> `1h`, `45` -> `45m`, anything not positive -> `0m`.
pub fn to_hour_minute(minutes: i64) -> String {
    if minutes <= 0 {
        return "0m".to_string();
    }
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

pub fn to_genre_names(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// English name for a language code; `en`, `en-US` and `pt_BR` all resolve on the
/// language part. Unknown codes come back trimmed.
pub fn to_language_name(code: &str) -> String {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let language = trimmed
        .split(['-', '_'])
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();
    ISO_639_1
        .binary_search_by(|(code, _)| code.cmp(&language.as_str()))
        .map(|index| ISO_639_1[index].1.to_string())
        .unwrap_or_else(|_| trimmed.to_string())
}

/// US certification, preferring the theatrical release. `PG-13` becomes `PG13`.
pub fn to_us_certification(release_dates: Option<&ReleaseDates>) -> String {
    let Some(us) = release_dates.and_then(|rd| rd.results.iter().find(|c| c.iso_3166_1 == "US")) else {
        return String::new();
    };

    let rated = |r: &&cinelist_models::ReleaseDate| {
        r.certification
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    };
    let pick = us
        .release_dates
        .iter()
        .filter(rated)
        .find(|r| r.release_type == Some(THEATRICAL_RELEASE))
        .or_else(|| us.release_dates.iter().find(rated));

    pick.and_then(|r| r.certification.as_deref())
        .map(|c| c.chars().filter(|ch| !ch.is_whitespace() && *ch != '-').collect())
        .unwrap_or_default()
}

fn in_department<'a>(crew: &'a [CrewMember], department: &str) -> Vec<&'a CrewMember> {
    crew.iter()
        .filter(|m| {
            m.known_for_department
                .as_deref()
                .is_some_and(|d| d.trim().eq_ignore_ascii_case(department))
        })
        .collect()
}

fn first_named(candidates: &[&CrewMember]) -> String {
    candidates
        .iter()
        .map(|m| m.name.trim())
        .find(|name| !name.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn with_job(candidates: &[&CrewMember], job: &str) -> Option<String> {
    candidates
        .iter()
        .find(|m| m.job.trim().eq_ignore_ascii_case(job))
        .map(|m| m.name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn director_name(crew: &[CrewMember]) -> String {
    let candidates = in_department(crew, "Directing");
    with_job(&candidates, "Director").unwrap_or_else(|| first_named(&candidates))
}

pub fn writer_name(crew: &[CrewMember]) -> String {
    let candidates = in_department(crew, "Writing");
    ["Screenplay", "Writer", "Story", "Teleplay"]
        .iter()
        .find_map(|job| with_job(&candidates, job))
        .unwrap_or_else(|| first_named(&candidates))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastLine {
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

/// Everything the detail screen shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailView {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub certification: String,
    pub runtime: String,
    pub genres: String,
    pub language: String,
    pub rating: f64,
    pub overview: String,
    pub director: String,
    pub writer: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub cast: Vec<CastLine>,
    pub in_wishlist: bool,
}

impl MovieDetailView {
    /// `image_url` turns an image path into a full URL.
    pub fn build(
        detail: &MovieDetail,
        credits: Option<&MovieCredits>,
        in_wishlist: bool,
        image_url: impl Fn(&str) -> String,
    ) -> Self {
        let crew = credits.map(|c| c.crew.as_slice()).unwrap_or(&[]);
        let cast = credits
            .map(|c| {
                c.billed_cast()
                    .into_iter()
                    .map(|member| CastLine {
                        name: member.name.clone(),
                        character: member.character.clone(),
                        profile_url: member.profile_path.as_deref().map(&image_url),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: detail.id,
            title: detail.title.clone(),
            year: detail.release_year(),
            certification: to_us_certification(detail.release_dates.as_ref()),
            runtime: to_hour_minute(detail.runtime.map(i64::from).unwrap_or(0)),
            genres: to_genre_names(&detail.genres),
            language: to_language_name(&detail.original_language),
            rating: detail.vote_average,
            overview: detail.overview.clone(),
            director: director_name(crew),
            writer: writer_name(crew),
            poster_url: detail.poster_path.as_deref().map(&image_url),
            backdrop_url: detail.backdrop_path.as_deref().map(&image_url),
            cast,
            in_wishlist,
        }
    }

    /// User score as a percentage, the way the rating ring shows it.
    pub fn score_percent(&self) -> u8 {
        (self.rating * 10.0).round().clamp(0.0, 100.0) as u8
    }
}

// Sorted by code for binary search.
static ISO_639_1: &[(&str, &str)] = &[
    ("aa", "Afar"),
    ("ab", "Abkhaz"),
    ("ae", "Avestan"),
    ("af", "Afrikaans"),
    ("ak", "Akan"),
    ("am", "Amharic"),
    ("an", "Aragonese"),
    ("ar", "Arabic"),
    ("as", "Assamese"),
    ("av", "Avaric"),
    ("ay", "Aymara"),
    ("az", "Azerbaijani"),
    ("ba", "Bashkir"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bi", "Bislama"),
    ("bm", "Bambara"),
    ("bn", "Bengali"),
    ("bo", "Tibetan"),
    ("br", "Breton"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("ce", "Chechen"),
    ("ch", "Chamorro"),
    ("co", "Corsican"),
    ("cr", "Cree"),
    ("cs", "Czech"),
    ("cu", "Old Church Slavonic"),
    ("cv", "Chuvash"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("dv", "Divehi"),
    ("dz", "Dzongkha"),
    ("ee", "Ewe"),
    ("el", "Greek"),
    ("en", "English"),
    ("eo", "Esperanto"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("ff", "Fula"),
    ("fi", "Finnish"),
    ("fj", "Fijian"),
    ("fo", "Faroese"),
    ("fr", "French"),
    ("fy", "Western Frisian"),
    ("ga", "Irish"),
    ("gd", "Scottish Gaelic"),
    ("gl", "Galician"),
    ("gn", "Guaraní"),
    ("gu", "Gujarati"),
    ("gv", "Manx"),
    ("ha", "Hausa"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("ho", "Hiri Motu"),
    ("hr", "Croatian"),
    ("ht", "Haitian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("hz", "Herero"),
    ("ia", "Interlingua"),
    ("id", "Indonesian"),
    ("ie", "Interlingue"),
    ("ig", "Igbo"),
    ("ii", "Nuosu"),
    ("ik", "Inupiaq"),
    ("io", "Ido"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("iu", "Inuktitut"),
    ("ja", "Japanese"),
    ("jv", "Javanese"),
    ("ka", "Georgian"),
    ("kg", "Kongo"),
    ("ki", "Kikuyu"),
    ("kj", "Kwanyama"),
    ("kk", "Kazakh"),
    ("kl", "Kalaallisut"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("kr", "Kanuri"),
    ("ks", "Kashmiri"),
    ("ku", "Kurdish"),
    ("kv", "Komi"),
    ("kw", "Cornish"),
    ("ky", "Kyrgyz"),
    ("la", "Latin"),
    ("lb", "Luxembourgish"),
    ("lg", "Ganda"),
    ("li", "Limburgish"),
    ("ln", "Lingala"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lu", "Luba-Katanga"),
    ("lv", "Latvian"),
    ("mg", "Malagasy"),
    ("mh", "Marshallese"),
    ("mi", "Māori"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("my", "Burmese"),
    ("na", "Nauru"),
    ("nb", "Norwegian Bokmål"),
    ("nd", "Northern Ndebele"),
    ("ne", "Nepali"),
    ("ng", "Ndonga"),
    ("nl", "Dutch"),
    ("nn", "Norwegian Nynorsk"),
    ("no", "Norwegian"),
    ("nr", "Southern Ndebele"),
    ("nv", "Navajo"),
    ("ny", "Chichewa"),
    ("oc", "Occitan"),
    ("oj", "Ojibwe"),
    ("om", "Oromo"),
    ("or", "Oriya"),
    ("os", "Ossetian"),
    ("pa", "Panjabi"),
    ("pi", "Pāli"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("qu", "Quechua"),
    ("rm", "Romansh"),
    ("rn", "Kirundi"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("rw", "Kinyarwanda"),
    ("sa", "Sanskrit"),
    ("sc", "Sardinian"),
    ("sd", "Sindhi"),
    ("se", "Northern Sami"),
    ("sg", "Sango"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sm", "Samoan"),
    ("sn", "Shona"),
    ("so", "Somali"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("ss", "Swati"),
    ("st", "Southern Sotho"),
    ("su", "Sundanese"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("tg", "Tajik"),
    ("th", "Thai"),
    ("ti", "Tigrinya"),
    ("tk", "Turkmen"),
    ("tl", "Tagalog"),
    ("tn", "Tswana"),
    ("to", "Tonga"),
    ("tr", "Turkish"),
    ("ts", "Tsonga"),
    ("tt", "Tatar"),
    ("tw", "Twi"),
    ("ty", "Tahitian"),
    ("ug", "Uyghur"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("ve", "Venda"),
    ("vi", "Vietnamese"),
    ("vo", "Volapük"),
    ("wa", "Walloon"),
    ("wo", "Wolof"),
    ("xh", "Xhosa"),
    ("yi", "Yiddish"),
    ("yo", "Yoruba"),
    ("za", "Zhuang"),
    ("zh", "Chinese"),
    ("zu", "Zulu"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_models::{CastMember, CountryReleaseDates, ReleaseDate};

    fn crew(name: &str, job: &str, department: &str) -> CrewMember {
        CrewMember {
            name: name.to_string(),
            job: job.to_string(),
            known_for_department: Some(department.to_string()),
            ..CrewMember::default()
        }
    }

    fn release(certification: &str, release_type: u8) -> ReleaseDate {
        ReleaseDate {
            certification: Some(certification.to_string()),
            release_type: Some(release_type),
            ..ReleaseDate::default()
        }
    }

    fn us_dates(dates: Vec<ReleaseDate>) -> ReleaseDates {
        ReleaseDates {
            results: vec![
                CountryReleaseDates {
                    iso_3166_1: "GB".to_string(),
                    release_dates: vec![release("15", 3)],
                },
                CountryReleaseDates {
                    iso_3166_1: "US".to_string(),
                    release_dates: dates,
                },
            ],
        }
    }

    #[test]
    fn test_language_table_is_sorted() {
        assert!(ISO_639_1.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_to_hour_minute() {
        assert_eq!(to_hour_minute(197), "3h 17m");
        assert_eq!(to_hour_minute(60), "1h");
        assert_eq!(to_hour_minute(45), "45m");
        assert_eq!(to_hour_minute(0), "0m");
        assert_eq!(to_hour_minute(-5), "0m");
    }

    #[test]
    fn test_to_genre_names() {
        let genres = vec![
            Genre { id: 878, name: "Science Fiction".to_string() },
            Genre { id: 0, name: "  ".to_string() },
            Genre { id: 12, name: " Adventure ".to_string() },
        ];
        assert_eq!(to_genre_names(&genres), "Science Fiction, Adventure");
        assert_eq!(to_genre_names(&[]), "");
    }

    #[test]
    fn test_to_language_name() {
        assert_eq!(to_language_name("en"), "English");
        assert_eq!(to_language_name("en-US"), "English");
        assert_eq!(to_language_name("pt_BR"), "Portuguese");
        assert_eq!(to_language_name(" JA "), "Japanese");
        assert_eq!(to_language_name("xx"), "xx");
        assert_eq!(to_language_name(" "), "");
    }

    #[test]
    fn test_us_certification_prefers_theatrical() {
        let dates = us_dates(vec![release("R", 4), release("PG-13", 3), release("", 3)]);
        assert_eq!(to_us_certification(Some(&dates)), "PG13");
    }

    #[test]
    fn test_us_certification_falls_back_to_any_rated() {
        let dates = us_dates(vec![release(" ", 3), release("NC 17", 5)]);
        assert_eq!(to_us_certification(Some(&dates)), "NC17");
        assert_eq!(to_us_certification(Some(&us_dates(vec![]))), "");
        assert_eq!(to_us_certification(None), "");
    }

    #[test]
    fn test_director_name() {
        let crew_list = vec![
            crew("Assistant", "First Assistant Director", "Directing"),
            crew("Denis Villeneuve", "Director", "directing"),
            crew("Hans Zimmer", "Original Music Composer", "Sound"),
        ];
        assert_eq!(director_name(&crew_list), "Denis Villeneuve");
        assert_eq!(director_name(&crew_list[..1]), "Assistant");
        assert_eq!(director_name(&crew_list[2..]), "");
    }

    #[test]
    fn test_writer_name_job_preference() {
        let crew_list = vec![
            crew("Story Person", "Story", "Writing"),
            crew("Novelist", "Novel", "Writing"),
            crew("Credited Writer", "Writer", "Writing"),
            crew("Screenwriter", "Screenplay", "Writing"),
        ];
        assert_eq!(writer_name(&crew_list), "Screenwriter");
        assert_eq!(writer_name(&crew_list[..3]), "Credited Writer");
        assert_eq!(writer_name(&crew_list[1..2]), "Novelist");
    }

    #[test]
    fn test_detail_view() {
        let detail = MovieDetail {
            id: 438631,
            title: "Dune".to_string(),
            release_date: Some("2021-09-15".to_string()),
            runtime: Some(155),
            original_language: "en".to_string(),
            vote_average: 7.8,
            poster_path: Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg".to_string()),
            genres: vec![Genre { id: 878, name: "Science Fiction".to_string() }],
            release_dates: Some(us_dates(vec![release("PG-13", 3)])),
            ..MovieDetail::default()
        };
        let credits = MovieCredits {
            id: 438631,
            cast: vec![CastMember {
                name: "Timothée Chalamet".to_string(),
                character: "Paul Atreides".to_string(),
                ..CastMember::default()
            }],
            crew: vec![crew("Denis Villeneuve", "Director", "Directing")],
        };

        let view = MovieDetailView::build(&detail, Some(&credits), true, |path| {
            format!("https://img.example{}", path)
        });

        assert_eq!(view.year, Some(2021));
        assert_eq!(view.certification, "PG13");
        assert_eq!(view.runtime, "2h 35m");
        assert_eq!(view.language, "English");
        assert_eq!(view.director, "Denis Villeneuve");
        assert_eq!(view.writer, "");
        assert_eq!(
            view.poster_url.as_deref(),
            Some("https://img.example/d5NXSklXo0qyIYkgV94XAgMIckC.jpg")
        );
        assert_eq!(view.backdrop_url, None);
        assert_eq!(view.cast[0].character, "Paul Atreides");
        assert_eq!(view.score_percent(), 78);
        assert!(view.in_wishlist);
    }
}
