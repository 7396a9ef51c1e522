//! stickies: cloud-synced notes from the command line.
//!
//! Thin driver over the library: each invocation signs in (or registers),
//! performs one operation, and exits non-zero on failure. Credentials come
//! from flags or the STICKIES_EMAIL / STICKIES_PASSWORD environment.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stickies::config::{env_vars, Config};
use stickies::models::Note;
use stickies::notes::NoteStore;

#[derive(Parser)]
#[command(name = "stickies", version, about = "Cloud-synced notes from the command line")]
struct Cli {
    /// Account email; falls back to STICKIES_EMAIL
    #[arg(long, global = true)]
    email: Option<String>,

    /// Account password; falls back to STICKIES_PASSWORD
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account
    Register,
    /// Verify the credentials sign in
    Login,
    /// List all notes for the account
    List,
    /// Create a note, or overwrite one by id
    Save {
        /// Existing note id; omit to create a new note
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Local image file to upload and attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a note by id
    Delete { id: String },
    /// Download an image URL into the downloads directory
    Download { url: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    if let Err(message) = run(cli).await {
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let Cli {
        email,
        password,
        command,
    } = cli;

    let config = Config::from_env();
    let store = NoteStore::from_config(&config);

    match command {
        Command::Register => {
            require_backend_config(&config)?;
            let (email, password) = resolve_credentials(&email, &password)?;
            store.register(&email, &password).await.map_err(|e| e.to_string())?;
            println!("Registered {}", email);
        }
        Command::Login => {
            require_backend_config(&config)?;
            let (email, password) = resolve_credentials(&email, &password)?;
            store.authenticate(&email, &password).await.map_err(|e| e.to_string())?;
            println!("Signed in as {}", email);
        }
        Command::List => {
            require_backend_config(&config)?;
            let (email, password) = resolve_credentials(&email, &password)?;
            store.authenticate(&email, &password).await.map_err(|e| e.to_string())?;

            let notes = store.list_notes().await.map_err(|e| e.to_string())?;
            if notes.is_empty() {
                println!("No notes.");
            }
            for note in notes {
                println!("{}  {}", note.id, note.title);
                println!("    {}", note.content);
                if let Some(url) = note.image_url {
                    println!("    image: {}", url);
                }
            }
        }
        Command::Save {
            id,
            title,
            content,
            image,
        } => {
            if title.trim().is_empty() {
                return Err("Title cannot be empty".to_string());
            }
            if content.trim().is_empty() {
                return Err("Content cannot be empty".to_string());
            }

            require_backend_config(&config)?;
            let (email, password) = resolve_credentials(&email, &password)?;
            store.authenticate(&email, &password).await.map_err(|e| e.to_string())?;

            // Upload first so the saved record carries the hosted URL.
            let image_url = match image {
                Some(path) => Some(store.upload_image(&path).await.map_err(|e| e.to_string())?),
                None => None,
            };

            let note = Note {
                id: id.unwrap_or_default(),
                title,
                content,
                image_url,
                user_id: String::new(),
            };
            store.save(note).await.map_err(|e| e.to_string())?;
            println!("Saved.");
        }
        Command::Delete { id } => {
            require_backend_config(&config)?;
            let (email, password) = resolve_credentials(&email, &password)?;
            store.authenticate(&email, &password).await.map_err(|e| e.to_string())?;

            store.delete_note(&id).await.map_err(|e| e.to_string())?;
            println!("Deleted {}", id);
        }
        Command::Download { url } => {
            require_backend_config(&config)?;
            let (email, password) = resolve_credentials(&email, &password)?;
            store.authenticate(&email, &password).await.map_err(|e| e.to_string())?;

            let path = store.download_image(&url).await.map_err(|e| e.to_string())?;
            println!("Saved to {}", path.display());
        }
    }

    Ok(())
}

fn require_backend_config(config: &Config) -> Result<(), String> {
    if config.firebase_api_key.is_empty() {
        return Err(format!("{} is not set", env_vars::FIREBASE_API_KEY));
    }
    if config.firebase_database_url.is_empty() {
        return Err(format!("{} is not set", env_vars::FIREBASE_DATABASE_URL));
    }
    Ok(())
}

fn resolve_credentials(
    email: &Option<String>,
    password: &Option<String>,
) -> Result<(String, String), String> {
    let email = email
        .clone()
        .or_else(|| std::env::var(env_vars::EMAIL).ok())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| format!("No email given (use --email or {})", env_vars::EMAIL))?;

    let password = password
        .clone()
        .or_else(|| std::env::var(env_vars::PASSWORD).ok())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| format!("No password given (use --password or {})", env_vars::PASSWORD))?;

    Ok((email, password))
}
