// Hogwarts Catalog - Core Library
// Exposes catalog, favorites, filter, render and modal logic for the CLI, the TUI, and tests

pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod modal;
pub mod render;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use app::{AppState, MainView};
pub use catalog::{Catalog, DEFAULT_API_URL};
pub use config::Config;
pub use db::{KeyValueStore, MemoryStore, SqliteStore};
pub use entities::{Category, Entity};
pub use error::{ConfigError, FetchError, StoreError};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use filter::{filter, FilterField};
pub use modal::{detail_rows, ClickTarget, Modal};
pub use render::{render, render_favorites, Action, Card, CardList, Surface};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
