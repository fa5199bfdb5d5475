use cinelist_core::MovieDetailView;
use cinelist_models::{Movie, MovieDetail};
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner while a request is in flight. Falls back to structured log lines when
/// stdout/stderr are not a terminal.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        if !is_interactive() {
            tracing::info!(operation = "progress", message = %message, "Progress update");
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold)),
    );
    table
}

fn rating_cell(rating: f64) -> Cell {
    let color = if rating >= 7.0 {
        Color::Green
    } else if rating >= 5.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{:.1}", rating)).fg(color)
}

fn year_text(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Listing table; `saved` marks wishlisted ids with a star.
pub fn movies_table(movies: &[Movie], saved: impl Fn(u64) -> bool) -> Table {
    let mut table = new_table(&["#", "ID", "Title", "Year", "Rating", ""]);
    for (index, movie) in movies.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(movie.id),
            Cell::new(&movie.title),
            Cell::new(year_text(movie.release_year())),
            rating_cell(movie.vote_average),
            Cell::new(if saved(movie.id) { "★" } else { "" }).fg(Color::Yellow),
        ]);
    }
    table
}

pub fn wishlist_table(items: &[&MovieDetail]) -> Table {
    let mut table = new_table(&["ID", "Title", "Released", "Rating"]);
    for detail in items {
        table.add_row(vec![
            Cell::new(detail.id),
            Cell::new(&detail.title),
            Cell::new(detail.release_date.as_deref().filter(|d| !d.is_empty()).unwrap_or("-")),
            rating_cell(detail.vote_average),
        ]);
    }
    table
}

pub fn detail_table(view: &MovieDetailView) -> Table {
    let title = match view.year {
        Some(year) => format!("{} ({})", view.title, year),
        None => view.title.clone(),
    };
    let mut table = new_table(&[title.as_str(), ""]);

    let rows = [
        ("User score", format!("{}%", view.score_percent())),
        ("Certification", view.certification.clone()),
        ("Runtime", view.runtime.clone()),
        ("Genres", view.genres.clone()),
        ("Language", view.language.clone()),
        ("Director", view.director.clone()),
        ("Writer", view.writer.clone()),
        ("Poster", view.poster_url.clone().unwrap_or_default()),
        ("Overview", view.overview.clone()),
    ];
    for (label, value) in rows {
        if value.trim().is_empty() {
            continue;
        }
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table.add_row(vec![
        Cell::new("Wishlist").add_attribute(Attribute::Bold),
        if view.in_wishlist {
            Cell::new("★ saved").fg(Color::Yellow)
        } else {
            Cell::new("not saved").fg(Color::DarkGrey)
        },
    ]);
    table
}

pub fn cast_table(view: &MovieDetailView, limit: usize) -> Table {
    let mut table = new_table(&["Cast", "Character"]);
    for line in view.cast.iter().take(limit) {
        table.add_row(vec![Cell::new(&line.name), Cell::new(&line.character)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movies_table_marks_saved_rows() {
        let movies = vec![
            Movie { id: 1, title: "Alien".to_string(), release_date: Some("1979-05-25".to_string()), vote_average: 8.1, ..Movie::default() },
            Movie { id: 2, title: "Aliens".to_string(), ..Movie::default() },
        ];
        let rendered = movies_table(&movies, |id| id == 2).to_string();
        assert!(rendered.contains("Alien"));
        assert!(rendered.contains("1979"));
        assert!(rendered.contains("8.1"));
        assert_eq!(rendered.matches('★').count(), 1);
    }

    #[test]
    fn test_detail_table_skips_blank_rows() {
        let view = MovieDetailView {
            id: 78,
            title: "Blade Runner".to_string(),
            year: Some(1982),
            certification: "R".to_string(),
            runtime: "1h 57m".to_string(),
            genres: "Science Fiction, Drama".to_string(),
            language: "English".to_string(),
            rating: 7.9,
            overview: String::new(),
            director: "Ridley Scott".to_string(),
            writer: String::new(),
            poster_url: None,
            backdrop_url: None,
            cast: vec![],
            in_wishlist: true,
        };
        let rendered = detail_table(&view).to_string();
        assert!(rendered.contains("Blade Runner (1982)"));
        assert!(rendered.contains("79%"));
        assert!(rendered.contains("Ridley Scott"));
        assert!(!rendered.contains("Writer"));
        assert!(!rendered.contains("Overview"));
        assert!(rendered.contains("saved"));
    }
}
