mod cli;

use anyhow::Result;
use casa_core::model::PropertyDraft;
use casa_core::search::SearchFilter;
use casa_core::Config;
use chrono::NaiveDate;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut core = cli::commands::build_core(&config, cli.offline)?;

    match cli.command {
        Commands::List => {
            cli::commands::list_properties(&mut core, cli.json).await?;
        }
        Commands::Show { id } => {
            cli::commands::show_property(&mut core, id, cli.json).await?;
        }
        Commands::Add {
            date,
            kind,
            address,
            bedrooms,
            bathrooms,
            price,
            area,
            notes,
        } => {
            let date: NaiveDate = date
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid date '{date}', expected YYYY-MM-DD"))?;
            let draft = PropertyDraft {
                date,
                kind,
                address,
                bedrooms,
                bathrooms,
                price,
                area,
                notes,
            };
            cli::commands::add_property(&mut core, draft, cli.json).await?;
        }
        Commands::Rm { id } => {
            cli::commands::delete_property(&mut core, id).await?;
        }
        Commands::Search {
            kind,
            min_price,
            max_price,
            bedrooms,
        } => {
            let filter = SearchFilter {
                kind_contains: kind,
                min_price,
                max_price,
                bedrooms,
            };
            cli::commands::search_properties(&mut core, filter, cli.json).await?;
        }
        Commands::Watch => {
            cli::commands::watch(&mut core, &config).await?;
        }
    }

    Ok(())
}
