//! # Secure Notes CLI (`notes`)
//!
//! The `notes` binary initializes the database, serves the HTTP API, and
//! runs individual note operations from the shell.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `notes init` | Create the SQLite database and the `notes` table |
//! | `notes serve` | Start the HTTP server |
//! | `notes create --title T --content C` | Create a note |
//! | `notes get <id>` | Print a note |
//! | `notes update <id> [--title T] [--content C]` | Update supplied fields |
//! | `notes delete <id>` | Delete a note |
//!
//! ## Examples
//!
//! ```bash
//! DATABASE_URL=sqlite:/tmp/notes.sqlite notes init
//! notes --config ./config/notes.toml serve
//! notes update 3 --title "New Title"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use secure_notes::{commands, config, logging, server};

/// Secure Notes — a small CRUD note-taking service.
///
/// Without `--config`, built-in defaults are used. `DATABASE_URL` and
/// `NOTES_BIND` override the database URL and bind address.
#[derive(Parser)]
#[command(name = "notes", version, about = "Secure Notes — a small CRUD note-taking service")]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it multiple times is safe.
    Init,

    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves until interrupted.
    Serve,

    /// Create a note.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },

    /// Print a note by id.
    Get { id: i64 },

    /// Update a note. Omitted or empty fields are left unchanged.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::Config::load(cli.config.as_deref())?;
    logging::init_logging(&cfg.log);

    match cli.command {
        Commands::Init => {
            commands::run_init(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Create { title, content } => {
            commands::run_create(&cfg, title, content).await?;
        }
        Commands::Get { id } => {
            commands::run_get(&cfg, id).await?;
        }
        Commands::Update { id, title, content } => {
            commands::run_update(&cfg, id, title, content).await?;
        }
        Commands::Delete { id } => {
            commands::run_delete(&cfg, id).await?;
        }
    }

    Ok(())
}
