use super::browse::{load_feed, render_feed};
use super::context::AppContext;
use crate::output::Output;
use cinelist_core::MovieFeed;
use color_eyre::Result;

pub async fn run_search(term: &str, pages: u32, output: &Output) -> Result<()> {
    if term.trim().is_empty() {
        output.warn("Nothing to search for");
        return Ok(());
    }

    let ctx = AppContext::load()?;
    let wishlist = ctx.open_wishlist()?;

    let mut feed = MovieFeed::new();
    feed.set_search_input(term);
    feed.commit_search();

    load_feed(&mut feed, &ctx, pages).await;
    render_feed(&feed, &wishlist, output);
    Ok(())
}
