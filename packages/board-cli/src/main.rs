//! Terminal surfaces for the waitboard: the public display (`watch`) and
//! admin commands mapping onto the provider store's mutation API.

mod render;

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Term;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_core::{HttpProviderApi, Mode, PollScheduler, ProviderId, ProviderStore};
use chrono::Local;

#[derive(Parser)]
#[command(name = "waitboard", about = "Provider status board")]
struct Cli {
    /// Base URL of the provider API (defaults to $BOARD_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the live display board until Ctrl-C
    Watch {
        /// Show the admin view instead (full list, no data polling)
        #[arg(long)]
        admin: bool,
    },
    /// List all providers
    List,
    /// Add a provider
    Add { name: String, wait: String },
    /// Remove a provider by id
    Remove { id: i64 },
    /// Set a provider's wait time
    SetWait { id: i64, wait: String },
    /// Adjust a provider's wait time by a delta (clamped at 0)
    Bump {
        id: i64,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Toggle a provider on or off the public display
    ToggleVisible { id: i64 },
    /// Toggle whether a provider's wait time is displayed
    ToggleWait { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let base_url = cli
        .api_url
        .or_else(|| env::var("BOARD_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let api = Arc::new(HttpProviderApi::new(base_url));
    let store = Arc::new(ProviderStore::new(api));

    match cli.command {
        Command::Watch { admin } => watch(store, admin).await,
        Command::List => {
            store.refresh().await.context("failed to load providers")?;
            print!(
                "{}",
                render::render_admin(&store.snapshot(), Local::now())
            );
            Ok(())
        }
        Command::Add { name, wait } => {
            let created = store.create(&name, &wait).await?;
            println!(
                "{}",
                format!(
                    "Added {} (id {}, {} min)",
                    created.name, created.id, created.wait_time
                )
                .green()
            );
            Ok(())
        }
        Command::Remove { id } => {
            store.remove(ProviderId(id)).await?;
            println!("{}", format!("Removed provider {}", id).green());
            Ok(())
        }
        Command::SetWait { id, wait } => {
            let id = ProviderId(id);
            store.refresh().await.context("failed to load providers")?;
            store.begin_edit(id)?;
            if !store.change_edit_value(id, &wait) {
                store.cancel_edit(id);
                bail!("wait time must be a non-negative number of minutes");
            }
            let updated = store.commit_edit(id).await?;
            println!(
                "{}",
                format!("{} now waits {} min", updated.name, updated.wait_time).green()
            );
            Ok(())
        }
        Command::Bump { id, delta } => {
            store.refresh().await.context("failed to load providers")?;
            let updated = store.adjust_wait_time(ProviderId(id), delta).await?;
            println!(
                "{}",
                format!("{} now waits {} min", updated.name, updated.wait_time).green()
            );
            Ok(())
        }
        Command::ToggleVisible { id } => {
            store.refresh().await.context("failed to load providers")?;
            let updated = store.toggle_visible(ProviderId(id)).await?;
            let state = if updated.visible { "shown on" } else { "hidden from" };
            println!(
                "{}",
                format!("{} is now {} the display", updated.name, state).green()
            );
            Ok(())
        }
        Command::ToggleWait { id } => {
            store.refresh().await.context("failed to load providers")?;
            let updated = store.toggle_show_wait_time(ProviderId(id)).await?;
            let state = if updated.show_wait_time {
                "displayed"
            } else {
                "not displayed"
            };
            println!(
                "{}",
                format!("{}'s wait time is now {}", updated.name, state).green()
            );
            Ok(())
        }
    }
}

/// Run a surface until Ctrl-C, redrawing on every clock tick.
///
/// The display surface polls for data; the admin surface loads once and
/// only the clock keeps ticking.
async fn watch(store: Arc<ProviderStore>, admin: bool) -> Result<()> {
    let scheduler = PollScheduler::new(store.clone());
    if admin {
        // one manual load; admin mode never polls in the background
        let _ = store.refresh().await;
    } else {
        scheduler.set_mode(Mode::Display);
    }

    let mut clock = scheduler.clock();
    let term = Term::stdout();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = clock.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = *clock.borrow();
                let frame = if admin {
                    render::render_admin(&store.snapshot(), now)
                } else {
                    render::render_display(&store.display_entries(), now)
                };
                term.clear_screen().ok();
                term.write_str(&frame).ok();
            }
        }
    }

    scheduler.shutdown();
    Ok(())
}
