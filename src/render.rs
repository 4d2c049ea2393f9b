// 🃏 Renderer - projects entity sequences into cards on a surface
//
// Cards never hold favorite state of their own: membership is looked up at
// render time, so re-rendering after a toggle is what updates the glyph.

use crate::db::KeyValueStore;
use crate::entities::{Category, Entity};
use crate::favorites::FavoritesStore;
use crate::filter::FilterField;

pub const FAVORITE_GLYPH: &str = "♥";
pub const NOT_FAVORITE_GLYPH: &str = "♡";

/// Message shown in the favorites surface when the list is empty
pub const NO_FAVORITES_MESSAGE: &str = "No favorites added.";

/// Something a user interaction asks the application to do.
///
/// Handlers return an action instead of mutating state themselves; the
/// controller applies it against the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenDetail(Entity),
    ToggleFavorite(Entity),
    ApplyFilter { field: FilterField, text: String },
    ClearFilter,
    CloseModal,
}

// ============================================================================
// CARD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub image_url: String,
    pub category: Category,
    pub favorite: bool,
    pub entity: Entity,
}

impl Card {
    pub fn glyph(&self) -> &'static str {
        if self.favorite {
            FAVORITE_GLYPH
        } else {
            NOT_FAVORITE_GLYPH
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.category.class_name()
    }

    /// Image activation opens the detail modal for this card's entity
    pub fn on_image_click(&self) -> Action {
        Action::OpenDetail(self.entity.clone())
    }

    /// Favorite control activation toggles this card's entity
    pub fn on_favorite_click(&self) -> Action {
        Action::ToggleFavorite(self.entity.clone())
    }
}

// ============================================================================
// SURFACES
// ============================================================================

/// A render target: a list container that can be cleared and appended to
pub trait Surface {
    fn clear(&mut self);
    fn append(&mut self, card: Card);
    /// Replace the contents with a single message instead of cards
    fn show_message(&mut self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardList {
    cards: Vec<Card>,
    message: Option<String>,
}

impl CardList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Surface for CardList {
    fn clear(&mut self) {
        self.cards.clear();
        self.message = None;
    }

    fn append(&mut self, card: Card) {
        self.message = None;
        self.cards.push(card);
    }

    fn show_message(&mut self, message: &str) {
        self.cards.clear();
        self.message = Some(message.to_string());
    }
}

// ============================================================================
// RENDER
// ============================================================================

/// Build the card for one entity
pub fn card_for<S: KeyValueStore>(
    entity: &Entity,
    favorites: &FavoritesStore<S>,
    placeholder_image: &str,
) -> Card {
    Card {
        name: entity.name.clone(),
        image_url: entity.image_or(placeholder_image).to_string(),
        category: entity.category(),
        favorite: favorites.is_favorite(&entity.name),
        entity: entity.clone(),
    }
}

/// Clear `target`, then append one card per entity in order
pub fn render<S: KeyValueStore>(
    entities: &[Entity],
    favorites: &FavoritesStore<S>,
    placeholder_image: &str,
    target: &mut impl Surface,
) {
    target.clear();
    for entity in entities {
        target.append(card_for(entity, favorites, placeholder_image));
    }
}

/// Render every current favorite, or the empty-list message
pub fn render_favorites<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    placeholder_image: &str,
    target: &mut impl Surface,
) {
    if favorites.is_empty() {
        target.show_message(NO_FAVORITES_MESSAGE);
    } else {
        render(favorites.get(), favorites, placeholder_image, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    const PLACEHOLDER: &str = "https://via.placeholder.com/200";

    fn store() -> FavoritesStore<MemoryStore> {
        FavoritesStore::load_persisted(MemoryStore::new())
    }

    #[test]
    fn test_render_clears_then_appends_in_order() {
        let favorites = store();
        let mut list = CardList::new();
        list.show_message("stale");

        let entities = vec![
            Entity::new("Harry Potter").with_house("Gryffindor"),
            Entity::new("Draco Malfoy").with_house("Slytherin"),
        ];
        render(&entities, &favorites, PLACEHOLDER, &mut list);

        assert_eq!(list.message(), None);
        let names: Vec<&str> = list.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Harry Potter", "Draco Malfoy"]);

        render(&entities[..1], &favorites, PLACEHOLDER, &mut list);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_card_category_class() {
        let favorites = store();
        let mut list = CardList::new();
        let entities = vec![
            Entity::new("Cedric Diggory").with_house("Hufflepuff"),
            Entity::new("Cho Chang").with_house("Ravenclaw"),
            Entity::new("Fleur Delacour").with_house("Beauxbatons"),
            Entity::new("Griphook"),
        ];
        render(&entities, &favorites, PLACEHOLDER, &mut list);

        let classes: Vec<&str> = list.cards().iter().map(|c| c.class_name()).collect();
        assert_eq!(
            classes,
            vec!["house-hufflepuff", "house-ravenclaw", "house-unknown", "house-unknown"]
        );
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let card = card_for(&Entity::new("Peeves"), &store(), PLACEHOLDER);
        assert_eq!(card.image_url, PLACEHOLDER);
        assert!(!card.image_url.is_empty());
    }

    #[test]
    fn test_glyph_reflects_membership_at_render_time() {
        let mut favorites = store();
        let harry = Entity::new("Harry Potter");

        let before = card_for(&harry, &favorites, PLACEHOLDER);
        assert_eq!(before.glyph(), NOT_FAVORITE_GLYPH);

        favorites.toggle(&harry).unwrap();
        let after = card_for(&harry, &favorites, PLACEHOLDER);
        assert_eq!(after.glyph(), FAVORITE_GLYPH);
        // The earlier card is a snapshot; only a re-render reflects the change
        assert!(!before.favorite);
    }

    #[test]
    fn test_card_handlers_carry_their_entity() {
        let entity = Entity::new("Luna Lovegood").with_house("Ravenclaw");
        let card = card_for(&entity, &store(), PLACEHOLDER);
        assert_eq!(card.on_image_click(), Action::OpenDetail(entity.clone()));
        assert_eq!(card.on_favorite_click(), Action::ToggleFavorite(entity));
    }

    #[test]
    fn test_empty_favorites_show_message() {
        let mut favorites = store();
        let mut list = CardList::new();

        render_favorites(&favorites, PLACEHOLDER, &mut list);
        assert_eq!(list.message(), Some(NO_FAVORITES_MESSAGE));
        assert!(list.is_empty());

        favorites.toggle(&Entity::new("Dobby")).unwrap();
        render_favorites(&favorites, PLACEHOLDER, &mut list);
        assert_eq!(list.message(), None);
        assert_eq!(list.len(), 1);
        assert_eq!(list.cards()[0].glyph(), FAVORITE_GLYPH);
    }
}
