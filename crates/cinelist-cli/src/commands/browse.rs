use super::context::AppContext;
use super::movie;
use super::prompts;
use super::ui::{self, Spinner};
use crate::output::Output;
use cinelist_api::MovieCatalog;
use cinelist_core::{FeedQuery, FetchStatus, FileStorage, MovieFeed, WishlistStore};
use cinelist_models::{Category, DiscoverSort, SelectList};
use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    NowPlaying,
    Upcoming,
    Popular,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::NowPlaying => Category::NowPlaying,
            CategoryArg::Upcoming => Category::Upcoming,
            CategoryArg::Popular => Category::Popular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Title,
    Rating,
    ReleaseDate,
}

impl From<SortArg> for DiscoverSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => DiscoverSort::Title,
            SortArg::Rating => DiscoverSort::Rating,
            SortArg::ReleaseDate => DiscoverSort::ReleaseDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    LoadMore,
    OpenMovie,
    Category,
    Sort,
    Search,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::LoadMore => "Load more",
            Action::OpenMovie => "Open a movie",
            Action::Category => "Change category",
            Action::Sort => "Change sort order",
            Action::Search => "Search",
            Action::Quit => "Quit",
        }
    }
}

pub async fn run_browse(
    category: CategoryArg,
    sort: SortArg,
    pages: u32,
    interactive: bool,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut wishlist = ctx.open_wishlist()?;

    let mut feed = MovieFeed::new();
    feed.set_category(Category::from(category).value());
    feed.set_sort(DiscoverSort::from(sort).value());

    load_feed(&mut feed, &ctx, pages).await;
    render_feed(&feed, &wishlist, output);

    if interactive {
        if !ui::is_interactive() || !output.is_human() {
            output.warn("Interactive browsing needs a terminal and human output");
            return Ok(());
        }
        browse_interactively(&ctx, &mut feed, &mut wishlist, output).await?;
    }
    Ok(())
}

/// Load page 1 and then up to `pages - 1` more. Stops early on the last page or a failure.
pub async fn load_feed(feed: &mut MovieFeed, ctx: &AppContext, pages: u32) {
    let catalog: &dyn MovieCatalog = ctx.services.movies.as_ref();
    let spinner = Spinner::start(match feed.query() {
        FeedQuery::Search { term } => format!("Searching for '{}'...", term),
        FeedQuery::Discover { category, .. } => format!("Loading {} movies...", category.label()),
    });

    if feed.refresh(catalog).await == FetchStatus::Applied {
        for _ in 1..pages.max(1) {
            if feed.fetch_more(catalog).await != Some(FetchStatus::Applied) {
                break;
            }
        }
    }
    spinner.finish();
}

fn feed_title(feed: &MovieFeed) -> String {
    match feed.query() {
        FeedQuery::Search { term } => format!("Results for '{}'", term),
        FeedQuery::Discover { category, .. } => {
            let sort = feed.sorts().selected().map(|o| o.label.as_str()).unwrap_or_default();
            format!("{} · {}", category.label(), sort)
        }
    }
}

pub fn render_feed(feed: &MovieFeed, wishlist: &WishlistStore<FileStorage>, output: &Output) {
    let total_pages = feed.data().map(|d| d.total_pages).unwrap_or(0);
    let total_results = feed.data().map(|d| d.total_results).unwrap_or(0);

    if !output.is_human() {
        let query = match feed.query() {
            FeedQuery::Search { term } => json!({ "search": term }),
            FeedQuery::Discover { category, sort_by } => {
                json!({ "category": category.value(), "sortBy": sort_by })
            }
        };
        output.json(&json!({
            "query": query,
            "page": feed.page(),
            "totalPages": total_pages,
            "totalResults": total_results,
            "results": feed.movies(),
        }));
        return;
    }

    if feed.movies().is_empty() {
        output.no_data(&feed_title(feed));
        return;
    }

    output.heading(feed_title(feed));
    output.table(&ui::movies_table(feed.movies(), |id| wishlist.contains(id)));
    output.info(format!(
        "{} of {} movies, page {} of {}",
        feed.movies().len(),
        total_results,
        feed.page(),
        total_pages.max(1)
    ));
}

/// Index of the selected option, for use as the menu default.
fn selected_index(list: &SelectList) -> usize {
    list.options().iter().position(|o| o.selected).unwrap_or(0)
}

/// Prompt over a select list; `None` when the user backs out.
fn pick_option(prompt: &str, list: &SelectList) -> Result<Option<String>> {
    let labels: Vec<&str> = list.options().iter().map(|o| o.label.as_str()).collect();
    let picked = prompts::prompt_select(prompt, &labels, selected_index(list))?;
    Ok(picked.map(|i| list.options()[i].value.clone()))
}

async fn browse_interactively(
    ctx: &AppContext,
    feed: &mut MovieFeed,
    wishlist: &mut WishlistStore<FileStorage>,
    output: &Output,
) -> Result<()> {
    let catalog: &dyn MovieCatalog = ctx.services.movies.as_ref();

    loop {
        let mut actions = Vec::new();
        if feed.has_more() {
            actions.push(Action::LoadMore);
        }
        if !feed.movies().is_empty() {
            actions.push(Action::OpenMovie);
        }
        actions.extend([Action::Category, Action::Sort, Action::Search, Action::Quit]);

        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let Some(choice) = prompts::prompt_select("What next?", &labels, 0)? else {
            break;
        };

        match actions[choice] {
            Action::LoadMore => {
                let spinner = Spinner::start(format!("Loading page {}...", feed.page() + 1));
                feed.fetch_more(catalog).await;
                spinner.finish();
                render_feed(feed, wishlist, output);
            }
            Action::OpenMovie => {
                let labels: Vec<String> = feed
                    .movies()
                    .iter()
                    .map(|m| match m.release_year() {
                        Some(year) => format!("{} ({})", m.title, year),
                        None => m.title.clone(),
                    })
                    .collect();
                let Some(index) = prompts::prompt_select("Open which movie?", &labels, 0)? else {
                    continue;
                };
                let movie_id = feed.movies()[index].id;
                open_movie(ctx, wishlist, movie_id, output).await?;
            }
            Action::Category => {
                if let Some(value) = pick_option("Category", feed.categories())? {
                    if feed.set_category(&value) {
                        load_feed(feed, ctx, 1).await;
                    }
                    render_feed(feed, wishlist, output);
                }
            }
            Action::Sort => {
                if let Some(value) = pick_option("Sort by", feed.sorts())? {
                    if feed.set_sort(&value) {
                        load_feed(feed, ctx, 1).await;
                    }
                    render_feed(feed, wishlist, output);
                }
            }
            Action::Search => {
                let input = prompts::prompt_string(
                    "Search movies (leave empty to go back to browsing)",
                    Some(feed.search_input()),
                )?;
                let cleared = feed.set_search_input(&input);
                let committed = feed.commit_search();
                if cleared || committed {
                    load_feed(feed, ctx, 1).await;
                }
                render_feed(feed, wishlist, output);
            }
            Action::Quit => break,
        }
    }
    Ok(())
}

async fn open_movie(
    ctx: &AppContext,
    wishlist: &mut WishlistStore<FileStorage>,
    movie_id: u64,
    output: &Output,
) -> Result<()> {
    let Some(detail) = movie::show_movie(ctx, wishlist, movie_id, 1, false, output).await? else {
        return Ok(());
    };

    let question = if wishlist.contains(movie_id) {
        format!("Remove '{}' from your wishlist?", detail.title)
    } else {
        format!("Add '{}' to your wishlist?", detail.title)
    };
    if prompts::prompt_yes_no(&question, false)? {
        let title = detail.title.clone();
        let saved = wishlist
            .toggle(detail)
            .map_err(|e| eyre!("Failed to update wishlist: {:#}", e))?;
        output.success(if saved {
            format!("Added '{}' to your wishlist", title)
        } else {
            format!("Removed '{}' from your wishlist", title)
        });
    }
    Ok(())
}
