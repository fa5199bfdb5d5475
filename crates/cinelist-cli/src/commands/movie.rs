use super::context::AppContext;
use super::ui::{self, Spinner};
use crate::output::Output;
use cinelist_api::MovieCatalog;
use cinelist_core::{FileStorage, MovieDetailView, WishlistStore};
use cinelist_models::{Movie, MovieCredits, MovieDetail, PagedResult};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use tracing::warn;

const CAST_ROWS: usize = 10;

pub async fn run_movie(
    movie_id: u64,
    recommendations_page: u32,
    toggle_wishlist: bool,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut wishlist = ctx.open_wishlist()?;
    show_movie(&ctx, &mut wishlist, movie_id, recommendations_page, toggle_wishlist, output).await?;
    Ok(())
}

/// Detail screen: movie, credits and one page of recommendations, fetched together.
/// Returns the detail record when it could be loaded.
pub async fn show_movie(
    ctx: &AppContext,
    wishlist: &mut WishlistStore<FileStorage>,
    movie_id: u64,
    recommendations_page: u32,
    toggle_wishlist: bool,
    output: &Output,
) -> Result<Option<MovieDetail>> {
    let spinner = Spinner::start(format!("Loading movie {}...", movie_id));
    let (detail, credits, recommendations) =
        fetch_movie(ctx, movie_id, recommendations_page.max(1)).await;
    spinner.finish();

    let Some(detail) = detail else {
        output.no_data(&format!("movie {}", movie_id));
        return Ok(None);
    };

    if toggle_wishlist {
        let title = detail.title.clone();
        let saved = wishlist
            .toggle(detail.clone())
            .map_err(|e| eyre!("Failed to update wishlist: {:#}", e))?;
        if saved {
            output.success(format!("Added '{}' to your wishlist", title));
        } else {
            output.success(format!("Removed '{}' from your wishlist", title));
        }
    }

    let view = MovieDetailView::build(&detail, credits.as_ref(), wishlist.contains(movie_id), |path| {
        ctx.image_url(path)
    });
    render_movie(&view, recommendations.as_ref(), wishlist, output);
    Ok(Some(detail))
}

/// Each part degrades to `None` on failure so the rest can still be shown.
pub async fn fetch_movie(
    ctx: &AppContext,
    movie_id: u64,
    recommendations_page: u32,
) -> (Option<MovieDetail>, Option<MovieCredits>, Option<PagedResult<Movie>>) {
    let movies = ctx.services.movies.as_ref();
    let (detail, credits, recommendations) = tokio::join!(
        movies.details(movie_id),
        movies.credits(movie_id),
        movies.recommendations(movie_id, recommendations_page),
    );

    let detail = detail
        .inspect_err(|e| warn!(movie_id, "Failed to load movie details: {}", e))
        .ok();
    let credits = credits
        .inspect_err(|e| warn!(movie_id, "Failed to load credits: {}", e))
        .ok();
    let recommendations = recommendations
        .inspect_err(|e| warn!(movie_id, "Failed to load recommendations: {}", e))
        .ok();
    (detail, credits, recommendations)
}

fn render_movie(
    view: &MovieDetailView,
    recommendations: Option<&PagedResult<Movie>>,
    wishlist: &WishlistStore<FileStorage>,
    output: &Output,
) {
    if !output.is_human() {
        output.json(&json!({
            "movie": view,
            "recommendations": recommendations,
        }));
        return;
    }

    output.table(&ui::detail_table(view));
    if !view.cast.is_empty() {
        output.table(&ui::cast_table(view, CAST_ROWS));
    }

    output.heading("Recommendations");
    match recommendations {
        Some(page) if !page.results.is_empty() => {
            output.table(&ui::movies_table(&page.results, |id| wishlist.contains(id)));
            output.info(format!("Page {} of {}", page.page, page.total_pages.max(1)));
        }
        _ => output.no_data("recommendations"),
    }
}
