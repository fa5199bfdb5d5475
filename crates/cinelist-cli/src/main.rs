use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::browse::{CategoryArg, SortArg};
use commands::wishlist::{OrderArg, WishlistSortArg};
use commands::{account, browse, config, movie, search, wishlist};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinelist")]
#[command(about = "cinelist - Browse movies and keep a wishlist from your terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse now playing, upcoming or popular movies
    #[command(long_about = "List movies for a category. Results are fetched page by page and merged, so --pages 3 shows the first three pages without duplicates. With --interactive you can load more pages, switch category or sort order, search and open movies.")]
    Browse {
        /// Listing to show
        #[arg(long, value_enum, default_value = "now-playing")]
        category: CategoryArg,

        /// Server-side sort order
        #[arg(long, value_enum, default_value = "title")]
        sort: SortArg,

        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Keep browsing with menus after the first listing
        #[arg(short, long, action = ArgAction::SetTrue)]
        interactive: bool,
    },
    /// Search movies by title
    Search {
        /// Search term
        term: String,

        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Show a movie with its credits and recommendations
    Movie {
        /// Movie ID
        id: u64,

        /// Page of recommendations to show
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        recommendations_page: u32,

        /// Add the movie to the wishlist, or remove it if already saved
        #[arg(long, action = ArgAction::SetTrue)]
        toggle_wishlist: bool,
    },
    /// Manage the saved wishlist
    Wishlist {
        #[command(subcommand)]
        cmd: Option<WishlistCommands>,
    },
    /// Show account details
    Account {
        /// Account ID (defaults to account_id from the config file)
        #[arg(long)]
        id: Option<u64>,
    },
    /// View or change configuration and the API token
    #[command(long_about = "Manage configuration and credentials for cinelist. The API read access token is stored in the credentials file; CINELIST_API_TOKEN overrides it.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum WishlistCommands {
    /// List saved movies
    List {
        /// Sort key
        #[arg(long, value_enum, default_value = "rating")]
        sort: WishlistSortArg,

        /// Sort direction
        #[arg(long, value_enum, default_value = "asc")]
        order: OrderArg,
    },
    /// Fetch a movie and save it
    Add {
        /// Movie ID
        id: u64,
    },
    /// Remove a saved movie
    Remove {
        /// Movie ID
        id: u64,
    },
    /// Remove every saved movie
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the token)
    Show {
        /// Show the token unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Write defaults without prompting
        #[arg(long, action = ArgAction::SetTrue)]
        defaults: bool,
    },
    /// Save or remove the API read access token
    Token {
        /// Token value (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,

        /// Remove the saved token
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "token")]
        clear: bool,
    },
    /// Show where configuration, credentials, storage and logs live
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone()).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Browse {
            category,
            sort,
            pages,
            interactive,
        } => browse::run_browse(category, sort, pages, interactive, &output).await,
        Commands::Search { term, pages } => search::run_search(&term, pages, &output).await,
        Commands::Movie {
            id,
            recommendations_page,
            toggle_wishlist,
        } => movie::run_movie(id, recommendations_page, toggle_wishlist, &output).await,
        Commands::Wishlist { cmd } => {
            let cmd = cmd.unwrap_or(WishlistCommands::List {
                sort: WishlistSortArg::Rating,
                order: OrderArg::Asc,
            });
            wishlist::run_wishlist(cmd, &output).await
        }
        Commands::Account { id } => account::run_account(id, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output).await
        }
    };

    // color-eyre reports to stderr; JSON consumers also get a structured error on stdout
    if let Err(e) = &result {
        if !output.is_human() {
            output.error(e.to_string());
        }
    }
    result
}
