use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use hogwarts_catalog::{
    Action, AppState, CardList, Catalog, Config, FavoritesStore, FilterField, SqliteStore,
};

#[derive(Parser)]
#[command(name = "hogwarts", version, about = "Browse Hogwarts characters and keep favorites")]
struct Cli {
    /// Config file (defaults to HOGWARTS_CONFIG or the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the character API endpoint
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive browser (default)
    Browse,
    /// Print the character list, optionally filtered
    List {
        /// Field to match: name, species, house or ancestry
        #[arg(long, default_value = "name")]
        field: FilterField,
        /// Case-insensitive substring to look for
        #[arg(long)]
        text: Option<String>,
    },
    /// Print persisted favorites
    Favorites,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => run_ui_mode(&config),
        Command::List { field, text } => {
            init_logging(None)?;
            run_list(&config, field, text)
        }
        Command::Favorites => {
            init_logging(None)?;
            run_favorites(&config)
        }
    }
}

/// Install the tracing subscriber. With a file, logs stay off the terminal.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env("HOGWARTS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {:?}", parent))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

fn open_favorites(config: &Config) -> Result<FavoritesStore<SqliteStore>> {
    let path = config.storage_path()?;
    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open favorites storage at {:?}", path))?;
    Ok(FavoritesStore::load_persisted(store))
}

/// The single suspension point: fetch the catalog once, then leave async behind
fn fetch_catalog(config: &Config) -> Result<Catalog> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    Ok(runtime.block_on(Catalog::load_or_empty(&client, &config.api_url)))
}

fn run_list(config: &Config, field: FilterField, text: Option<String>) -> Result<()> {
    let favorites = open_favorites(config)?;
    let catalog = fetch_catalog(config)?;
    let mut state = AppState::new(catalog, favorites, config);

    if let Some(text) = text {
        state.perform(Action::ApplyFilter { field, text });
    }

    print_cards(state.characters());
    Ok(())
}

fn run_favorites(config: &Config) -> Result<()> {
    let favorites = open_favorites(config)?;
    let state = AppState::new(Catalog::empty(), favorites, config);

    match state.favorites_list().message() {
        Some(message) => println!("{}", message),
        None => print_cards(state.favorites_list()),
    }
    Ok(())
}

fn print_cards(list: &CardList) {
    if list.is_empty() {
        println!("{}", list.message().unwrap_or("No characters to show."));
        return;
    }
    for card in list.cards() {
        println!(
            "{} {:<32} {:<18} {}",
            card.glyph(),
            card.name,
            card.class_name(),
            card.image_url
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    use hogwarts_catalog::render::NO_FAVORITES_MESSAGE;
    use hogwarts_catalog::ui;

    println!("🧙 Loading Hogwarts Catalog...\n");

    let log_path = config.log_path()?;
    init_logging(Some(&log_path))?;

    println!("❤️  Loading favorites...");
    let favorites = open_favorites(config)?;
    if favorites.is_empty() {
        println!("✓ {}", NO_FAVORITES_MESSAGE);
    } else {
        println!("✓ {} favorites restored", favorites.len());
    }

    println!("📚 Fetching characters from {}...", config.api_url);
    let catalog = fetch_catalog(config)?;
    if catalog.is_empty() {
        println!("⚠️  No characters loaded (see {:?})", log_path);
    } else {
        println!("✓ Loaded {} characters\n", catalog.len());
    }
    println!("Starting UI... (Press 'q' to quit)\n");

    let state = AppState::new(catalog, favorites, config);
    let mut app = ui::App::new(state);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print the list: hogwarts list --field house --text slyth");
    std::process::exit(1);
}
