use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use anitier_lib::modules::catalog::domain::value_objects::{
    DEFAULT_LISTING_LIMIT, DEFAULT_POPULAR_LIMIT,
};
use anitier_lib::shared::utils::init_logger;
use anitier_lib::{AppConfig, CatalogService, GroupingMode};

#[derive(Parser)]
#[command(name = "anitier", about = "Browse the anime catalog grouped by franchise")]
struct Cli {
    /// Override ANITIER_GROUPING_MODE
    #[arg(long, value_enum, global = true)]
    grouping: Option<GroupingArg>,
    /// Debug logging for anitier modules
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Highest ranked titles
    Top {
        #[arg(long, default_value_t = DEFAULT_LISTING_LIMIT)]
        limit: u32,
    },
    /// Titles airing this season
    Season {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Free-text search
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Single entry by MyAnimeList id
    Anime { id: u32 },
    /// Most popular titles
    Popular {
        #[arg(long, default_value_t = DEFAULT_POPULAR_LIMIT)]
        limit: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupingArg {
    PerEntry,
    Franchise,
}

impl From<GroupingArg> for GroupingMode {
    fn from(value: GroupingArg) -> Self {
        match value {
            GroupingArg::PerEntry => GroupingMode::PerEntry,
            GroupingArg::Franchise => GroupingMode::Franchise,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(grouping) = cli.grouping {
        config.grouping_mode = grouping.into();
    }

    let service =
        CatalogService::from_config(&config).context("failed to build catalog service")?;
    log::debug!("Grouping mode: {}", service.grouping_mode());

    match cli.command {
        Command::Top { limit } => {
            let groups = service.top_anime(limit).await.context("top anime")?;
            print_json(&groups)
        }
        Command::Season { page } => {
            let groups = service
                .season_now_page(page)
                .await
                .context("current season")?;
            print_json(&groups)
        }
        Command::Search { query, page } => {
            let groups = service
                .search_page(&query, page)
                .await
                .with_context(|| format!("search for '{query}'"))?;
            print_json(&groups)
        }
        Command::Anime { id } => {
            let entry = service
                .anime_by_id(id)
                .await
                .with_context(|| format!("anime {id}"))?
                .with_context(|| format!("no anime with id {id}"))?;
            print_json(&entry)
        }
        Command::Popular { limit } => {
            let groups = service.popular(limit).await.context("popular anime")?;
            print_json(&groups)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
