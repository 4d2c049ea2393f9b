// 🎛️ Application state and the Favorite Toggle Controller
//
// All session state lives here and is handed to whoever needs it: the
// terminal UI drives it with actions, the list commands read it directly.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::KeyValueStore;
use crate::entities::Entity;
use crate::favorites::FavoritesStore;
use crate::filter::{filter, FilterField};
use crate::modal::{ClickTarget, Modal};
use crate::render::{render, render_favorites, Action, CardList};

/// What the main character list is currently showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MainView {
    /// First `page_size` catalog entries, unfiltered
    #[default]
    Top,
    Filtered { field: FilterField, text: String },
}

pub struct AppState<S: KeyValueStore> {
    catalog: Catalog,
    favorites: FavoritesStore<S>,
    view: MainView,
    characters: CardList,
    favorites_list: CardList,
    modal: Modal,
    page_size: usize,
    placeholder_image: String,
    last_error: Option<String>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Build the state and draw both lists for the first time
    pub fn new(catalog: Catalog, favorites: FavoritesStore<S>, config: &Config) -> Self {
        let mut state = Self {
            catalog,
            favorites,
            view: MainView::Top,
            characters: CardList::new(),
            favorites_list: CardList::new(),
            modal: Modal::Closed,
            page_size: config.page_size,
            placeholder_image: config.placeholder_image.clone(),
            last_error: None,
        };
        state.refresh_characters();
        state.refresh_favorites();
        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn view(&self) -> &MainView {
        &self.view
    }

    pub fn characters(&self) -> &CardList {
        &self.characters
    }

    pub fn favorites_list(&self) -> &CardList {
        &self.favorites_list
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    /// Most recent persistence failure, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Entities the main list shows for the current view
    pub fn main_entities(&self) -> Vec<Entity> {
        match &self.view {
            MainView::Top => self.catalog.top(self.page_size).to_vec(),
            MainView::Filtered { field, text } => filter(self.catalog.entities(), *field, text),
        }
    }

    // ========================================================================
    // CONTROLLER
    // ========================================================================

    pub fn perform(&mut self, action: Action) {
        match action {
            Action::OpenDetail(entity) => {
                debug!(name = %entity.name, "open detail");
                self.modal.open(entity);
            }
            Action::ToggleFavorite(entity) => self.toggle_favorite(&entity),
            Action::ApplyFilter { field, text } => {
                debug!(%field, %text, "apply filter");
                self.view = MainView::Filtered { field, text };
                self.refresh_characters();
            }
            Action::ClearFilter => {
                self.view = MainView::Top;
                self.refresh_characters();
            }
            Action::CloseModal => self.modal.close(),
        }
    }

    /// Forward a click to the modal; true when it closed
    pub fn click_modal(&mut self, target: ClickTarget) -> bool {
        self.modal.handle_click(target)
    }

    /// Toggle membership, then redraw the main list (keeping its current
    /// view, filter included) and the favorites list.
    fn toggle_favorite(&mut self, entity: &Entity) {
        match self.favorites.toggle(entity) {
            Ok(list) => {
                debug!(name = %entity.name, favorites = list.len(), "toggled favorite");
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, name = %entity.name, "favorite changed but could not be saved");
                self.last_error = Some(e.to_string());
            }
        }
        self.refresh_characters();
        self.refresh_favorites();
    }

    fn refresh_characters(&mut self) {
        let entities = self.main_entities();
        render(
            &entities,
            &self.favorites,
            &self.placeholder_image,
            &mut self.characters,
        );
    }

    fn refresh_favorites(&mut self) {
        render_favorites(
            &self.favorites,
            &self.placeholder_image,
            &mut self.favorites_list,
        );
    }
}
