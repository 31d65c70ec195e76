use anyhow::{Context, Result};
use casa_core::model::{Property, PropertyDraft};
use casa_core::search::{self, SearchFilter};
use casa_core::sync::{Served, SyncCore, SyncError};
use casa_core::{Config, HttpApi, LocalStore, PushChannel};
use colored::Colorize;
use std::time::Duration;

/// Assemble the sync core from config: open and initialize the cache, build
/// the gateway with its request timeout.
pub fn build_core(config: &Config, offline: bool) -> Result<SyncCore<HttpApi>> {
    let mut store = LocalStore::open(&config.storage.database_path);
    store
        .initialize()
        .with_context(|| {
            format!(
                "Failed to open local cache: {}",
                config.storage.database_path.display()
            )
        })?;
    let api = HttpApi::new(
        &config.server.url,
        Duration::from_secs(config.server.request_timeout_secs),
    )
    .context("Failed to build HTTP client")?;
    let mut core = SyncCore::new(api, store);
    core.set_initial_connectivity(!offline);
    Ok(core)
}

/// Print the transient notice for a read that fell back to the cache.
fn report(served: &Served) {
    match served {
        Served::Remote => {}
        Served::Cache { fallback_from: None } => {
            eprintln!("{} serving from local cache (offline mode)", "note:".blue());
        }
        Served::Cache { fallback_from: Some(e) } => {
            eprintln!(
                "{} could not reach the server, serving from local cache: {}",
                "warning:".yellow(),
                e.message()
            );
        }
    }
}

fn print_row(property: &Property) {
    println!(
        "  {:>5}  {}  {}",
        property.id,
        property.address.bold(),
        format!(
            "{} | {} bd {} ba | ${:.0} | {:.0} m2 | {}",
            property.kind, property.bedrooms, property.bathrooms, property.price, property.area,
            property.date
        )
        .dimmed()
    );
}

pub async fn list_properties(core: &mut SyncCore<HttpApi>, json: bool) -> Result<()> {
    let served = core.load_summaries().await?;
    report(&served);

    if matches!(served, Served::Remote) {
        if json {
            println!("{}", serde_json::to_string(core.summaries())?);
            return Ok(());
        }
        if core.summaries().is_empty() {
            println!("No properties listed.");
            return Ok(());
        }
        println!("Properties:");
        for summary in core.summaries() {
            println!("  {:>5}  {}", summary.id, summary.address.bold());
        }
    } else {
        if json {
            println!("{}", serde_json::to_string(core.properties())?);
            return Ok(());
        }
        if core.properties().is_empty() {
            println!("No properties cached.");
            return Ok(());
        }
        println!("Properties (cached):");
        for property in core.properties() {
            print_row(property);
        }
    }
    Ok(())
}

pub async fn show_property(core: &mut SyncCore<HttpApi>, id: i64, json: bool) -> Result<()> {
    match core.load_by_id(id).await? {
        Some(served) => {
            report(&served);
            let property = core
                .selected()
                .context("no record selected after load")?;
            if json {
                println!("{}", serde_json::to_string(property)?);
                return Ok(());
            }
            println!("{}", property.address.bold());
            println!("  id:        {}", property.id);
            println!("  date:      {}", property.date);
            println!("  type:      {}", property.kind);
            println!("  bedrooms:  {}", property.bedrooms);
            println!("  bathrooms: {}", property.bathrooms);
            println!("  price:     ${:.2}", property.price);
            println!("  area:      {:.1} m2", property.area);
            if !property.notes.is_empty() {
                println!("  notes:     {}", property.notes);
            }
        }
        None => println!("Property {id} not found."),
    }
    Ok(())
}

pub async fn add_property(
    core: &mut SyncCore<HttpApi>,
    draft: PropertyDraft,
    json: bool,
) -> Result<()> {
    match core.add(&draft).await {
        Ok(created) => {
            if json {
                println!("{}", serde_json::to_string(&created)?);
            } else {
                println!(
                    "{} {} (id {})",
                    "Added".green(),
                    created.address.bold(),
                    created.id
                );
            }
            // the create response is not spliced into the list; refresh to
            // observe the new record
            core.load_summaries().await?;
            Ok(())
        }
        Err(e) => fail("Error Adding Property", e),
    }
}

pub async fn delete_property(core: &mut SyncCore<HttpApi>, id: i64) -> Result<()> {
    match core.delete(id).await {
        Ok(()) => {
            println!("{} property {id}", "Deleted".green());
            Ok(())
        }
        Err(e) => fail("Error Deleting Property", e),
    }
}

pub async fn search_properties(
    core: &mut SyncCore<HttpApi>,
    filter: SearchFilter,
    json: bool,
) -> Result<()> {
    match core.search().await {
        Ok(candidates) => {
            let results = search::apply(candidates, &filter);
            if json {
                println!("{}", serde_json::to_string(&results)?);
                return Ok(());
            }
            if results.is_empty() {
                println!("No matching properties.");
                return Ok(());
            }
            for property in &results {
                print_row(property);
            }
            Ok(())
        }
        Err(e) => fail("Search Error", e),
    }
}

/// Long-running mode: subscribe once to the live feed and merge every pushed
/// record until interrupted.
pub async fn watch(core: &mut SyncCore<HttpApi>, config: &Config) -> Result<()> {
    let served = core.load_summaries().await?;
    report(&served);

    let mut channel = PushChannel::connect(&config.push.url)
        .await
        .with_context(|| format!("Failed to subscribe to push feed: {}", config.push.url))?;
    println!("Watching {} (ctrl-c to stop)", config.push.url);

    loop {
        tokio::select! {
            pushed = channel.next() => {
                match pushed {
                    Some(property) => {
                        println!(
                            "{} {} (id {})",
                            "New property:".cyan(),
                            property.address.bold(),
                            property.id
                        );
                        core.apply_push(property);
                    }
                    None => {
                        eprintln!("{} push feed disconnected", "warning:".yellow());
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping watch");
                channel.close();
                break;
            }
        }
    }
    Ok(())
}

/// User-initiated failures print a short title plus the failure's message.
fn fail(title: &str, e: SyncError) -> Result<()> {
    match e {
        SyncError::Offline => {
            eprintln!(
                "{} {}: this action is unavailable while offline",
                "Offline Mode".red().bold(),
                title
            );
            Ok(())
        }
        other => {
            eprintln!("{} {}", format!("{title}:").red().bold(), other);
            Ok(())
        }
    }
}
