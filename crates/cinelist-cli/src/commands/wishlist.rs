use super::account;
use super::context::AppContext;
use super::prompts;
use super::ui::{self, Spinner};
use crate::output::Output;
use cinelist_api::MovieCatalog;
use cinelist_core::{SortOrder, WishlistSort, WishlistSortKey};
use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WishlistSortArg {
    Rating,
    Title,
    ReleaseDate,
}

impl From<WishlistSortArg> for WishlistSortKey {
    fn from(arg: WishlistSortArg) -> Self {
        match arg {
            WishlistSortArg::Rating => WishlistSortKey::Rating,
            WishlistSortArg::Title => WishlistSortKey::Alphabetical,
            WishlistSortArg::ReleaseDate => WishlistSortKey::ReleaseDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

pub async fn run_wishlist(cmd: crate::WishlistCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::WishlistCommands::List { sort, order } => {
            list(WishlistSort::new(sort.into(), order.into()), output).await
        }
        crate::WishlistCommands::Add { id } => add(id, output).await,
        crate::WishlistCommands::Remove { id } => remove(id, output),
        crate::WishlistCommands::Clear { yes } => clear(yes, output),
    }
}

async fn list(sort: WishlistSort, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let wishlist = ctx.open_wishlist()?;
    let items = wishlist.sorted(sort);
    let order = match sort.order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    };

    if !output.is_human() {
        output.json(&json!({
            "sort": sort.key.label(),
            "order": order,
            "count": items.len(),
            "results": items,
        }));
        return Ok(());
    }

    let owner = match ctx.config.account_id {
        Some(account_id) => account::fetch_account(&ctx, account_id).await,
        None => None,
    };
    output.heading(format!("{}'s wishlist", account::greeting_name(owner.as_ref())));

    if items.is_empty() {
        output.no_data("wishlist is empty");
        return Ok(());
    }

    output.table(&ui::wishlist_table(&items));
    output.info(format!("{} movies, sorted by {} ({})", items.len(), sort.key.label(), order));
    Ok(())
}

async fn add(movie_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut wishlist = ctx.open_wishlist()?;

    if wishlist.contains(movie_id) {
        output.info(format!("Movie {} is already on your wishlist", movie_id));
        return Ok(());
    }

    let spinner = Spinner::start(format!("Loading movie {}...", movie_id));
    let detail = ctx.services.movies.details(movie_id).await;
    spinner.finish();

    let detail = match detail {
        Ok(detail) => detail,
        Err(e) => {
            warn!(movie_id, "Failed to load movie details: {}", e);
            output.no_data(&format!("movie {}", movie_id));
            return Ok(());
        }
    };

    let title = detail.title.clone();
    wishlist
        .add(detail)
        .map_err(|e| eyre!("Failed to update wishlist: {:#}", e))?;
    output.success(format!("Added '{}' to your wishlist", title));
    Ok(())
}

fn remove(movie_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut wishlist = ctx.open_wishlist()?;

    let title = wishlist
        .select_all()
        .iter()
        .find(|m| m.id == movie_id)
        .map(|m| m.title.clone());

    let removed = wishlist
        .remove(movie_id)
        .map_err(|e| eyre!("Failed to update wishlist: {:#}", e))?;
    match (removed, title) {
        (true, Some(title)) => output.success(format!("Removed '{}' from your wishlist", title)),
        _ => output.info(format!("Movie {} is not on your wishlist", movie_id)),
    }
    Ok(())
}

fn clear(yes: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut wishlist = ctx.open_wishlist()?;

    if wishlist.select_all().is_empty() {
        output.info("Your wishlist is already empty");
        return Ok(());
    }

    if !yes {
        if !ui::is_interactive() {
            output.warn("Not clearing the wishlist without --yes outside a terminal");
            return Ok(());
        }
        let question = format!("Remove all {} movies from your wishlist?", wishlist.select_all().len());
        if !prompts::prompt_yes_no(&question, false)? {
            output.info("Wishlist left unchanged");
            return Ok(());
        }
    }

    let removed = wishlist
        .clear()
        .map_err(|e| eyre!("Failed to clear wishlist: {:#}", e))?;
    output.success(format!("Removed {} movies from your wishlist", removed));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_args_map_to_store_sort() {
        assert_eq!(WishlistSortKey::from(WishlistSortArg::Title), WishlistSortKey::Alphabetical);
        assert_eq!(SortOrder::from(OrderArg::Desc), SortOrder::Desc);
        assert_eq!(WishlistSortArg::from_str("release-date", false), Ok(WishlistSortArg::ReleaseDate));
    }
}
