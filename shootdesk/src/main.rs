// shootdesk - local-first shoot scheduling store
// Entry point and command dispatch

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{BookArgs, ListArgs, LoginArgs, RemoteArgs, UpdateArgs, UploadArgs};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "shootdesk",
    version,
    about = "Manage property media shoots with a best-effort remote mirror",
    long_about = None,
)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip the remote mirror entirely
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List shoots, optionally by status
    List(ListArgs),

    /// Show one shoot with its balance due
    Show { id: String },

    /// Book a new shoot; unspecified fields get placeholder defaults
    Book(BookArgs),

    /// Update fields of a shoot
    Update(UpdateArgs),

    /// Attach delivered media files to a shoot
    Upload(UploadArgs),

    /// Delete a shoot
    Delete { id: String },

    /// Photographers with their shoot counts
    Photographers,

    /// Editors with their shoot counts
    Editors,

    /// Clients with their shoot counts
    Clients,

    /// Sign in; client principals only see their own shoots
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Show the signed-in principal
    Whoami,

    /// Show or change the remote mirror settings
    Remote(RemoteArgs),

    /// Show version, data directory and cache size
    Info,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shootdesk=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => shootdesk::app::default_data_dir()?,
    };

    let state = shootdesk::app::setup(data_dir, cli.offline)
        .await
        .context("failed to initialize shootdesk")?;

    match cli.command {
        Commands::List(args) => print_json(&commands::shoots::list_shoots(&state, args))?,
        Commands::Show { id } => print_json(&commands::shoots::get_shoot(&state, &id)?)?,
        Commands::Book(args) => {
            let (record, sync) = commands::shoots::book_shoot(&state, args)?;
            print_json(&record)?;
            // Let the background mirror finish before the process exits
            sync.finished().await;
        }
        Commands::Update(args) => {
            let id = args.id.clone();
            let record = commands::shoots::update_shoot(&state, args)
                .await
                .with_context(|| format!("failed to update shoot {}", id))?;
            print_json(&record)?;
        }
        Commands::Upload(args) => {
            let id = args.id.clone();
            let record = commands::shoots::upload_media(&state, args)
                .await
                .with_context(|| format!("failed to attach media to shoot {}", id))?;
            print_json(&record)?;
        }
        Commands::Delete { id } => {
            let sync = commands::shoots::delete_shoot(&state, &id)?;
            sync.finished().await;
        }
        Commands::Photographers => print_json(&commands::shoots::list_photographers(&state))?,
        Commands::Editors => print_json(&commands::shoots::list_editors(&state))?,
        Commands::Clients => print_json(&commands::shoots::list_clients(&state))?,
        Commands::Login(args) => print_json(&commands::session::login(&state, args)?)?,
        Commands::Logout => commands::session::logout(&state)?,
        Commands::Whoami => print_json(&commands::session::whoami(&state))?,
        Commands::Remote(args) => {
            print_json(&commands::settings::remote_settings(&state, args).await?)?
        }
        Commands::Info => print_json(&commands::get_app_info(&state).await?)?,
    }

    Ok(())
}
