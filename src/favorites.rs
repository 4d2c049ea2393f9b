// ❤️ Persistent Favorites Store
//
// The full favorites list (whole records, not just names) is stored as one
// JSON array under a fixed key. Every mutation rewrites the entire value.

use tracing::{debug, warn};

use crate::db::KeyValueStore;
use crate::entities::Entity;
use crate::error::StoreError;

/// Storage key holding the serialized favorites array
pub const FAVORITES_KEY: &str = "favorites";

pub struct FavoritesStore<S: KeyValueStore> {
    store: S,
    favorites: Vec<Entity>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Read the persisted list. Absent, unreadable or malformed data all mean "no favorites".
    pub fn load_persisted(store: S) -> Self {
        let favorites = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Entity>>(&raw) {
                Ok(list) => dedup_by_name(list),
                Err(e) => {
                    warn!(error = %e, "persisted favorites are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("no persisted favorites");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "could not read persisted favorites, starting empty");
                Vec::new()
            }
        };

        Self { store, favorites }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|fav| fav.name == name)
    }

    /// Remove `entity` if its name is already a favorite, append it otherwise.
    ///
    /// The in-memory list changes before the write; a failed write is reported
    /// but does not roll the change back.
    pub fn toggle(&mut self, entity: &Entity) -> Result<&[Entity], StoreError> {
        if self.is_favorite(&entity.name) {
            self.favorites.retain(|fav| !fav.same_identity(entity));
            debug!(name = %entity.name, "removed favorite");
        } else {
            self.favorites.push(entity.clone());
            debug!(name = %entity.name, "added favorite");
        }
        self.persist()?;
        Ok(&self.favorites)
    }

    pub fn get(&self) -> &[Entity] {
        &self.favorites
    }

    /// Replace the whole list (deduplicated by name) and persist it
    pub fn set(&mut self, favorites: Vec<Entity>) -> Result<(), StoreError> {
        self.favorites = dedup_by_name(favorites);
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Give the backing store back (used to simulate a reload)
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.favorites)?;
        self.store.set(FAVORITES_KEY, &raw)
    }
}

fn dedup_by_name(list: Vec<Entity>) -> Vec<Entity> {
    let mut out: Vec<Entity> = Vec::with_capacity(list.len());
    for entity in list {
        if !out.iter().any(|seen| seen.same_identity(&entity)) {
            out.push(entity);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SqliteStore};

    fn harry() -> Entity {
        Entity::new("Harry Potter").with_house("Gryffindor")
    }

    #[test]
    fn test_starts_empty_without_data() {
        let favorites = FavoritesStore::load_persisted(MemoryStore::new());
        assert!(favorites.is_empty());
        assert!(!favorites.is_favorite("Harry Potter"));
    }

    #[test]
    fn test_malformed_data_is_treated_as_absent() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{not json").unwrap();
        let favorites = FavoritesStore::load_persisted(store);
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = FavoritesStore::load_persisted(MemoryStore::new());

        let after_add = favorites.toggle(&harry()).unwrap();
        assert_eq!(after_add.len(), 1);
        assert_eq!(after_add[0].name, "Harry Potter");
        assert!(favorites.is_favorite("Harry Potter"));

        let after_remove = favorites.toggle(&harry()).unwrap();
        assert!(after_remove.is_empty());
        assert!(!favorites.is_favorite("Harry Potter"));
    }

    #[test]
    fn test_toggle_matches_by_name_only() {
        let mut favorites = FavoritesStore::load_persisted(MemoryStore::new());
        favorites.toggle(&harry()).unwrap();

        // Same name, different attributes: still the same favorite
        favorites.toggle(&Entity::new("Harry Potter")).unwrap();
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_persists_whole_list() {
        let mut favorites = FavoritesStore::load_persisted(MemoryStore::new());
        favorites.toggle(&harry()).unwrap();
        favorites.toggle(&Entity::new("Hermione Granger")).unwrap();

        let store = favorites.into_store();
        let raw = store.get(FAVORITES_KEY).unwrap().unwrap();
        let stored: Vec<Entity> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0], harry());
    }

    #[test]
    fn test_favorite_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            let mut favorites = FavoritesStore::load_persisted(store);
            favorites.toggle(&harry()).unwrap();
        }

        let reloaded = FavoritesStore::load_persisted(SqliteStore::open(&path).unwrap());
        assert!(reloaded.is_favorite("Harry Potter"));
        assert_eq!(reloaded.get()[0].house.as_deref(), Some("Gryffindor"));
    }

    #[test]
    fn test_persisted_duplicates_collapse() {
        let mut store = MemoryStore::new();
        store
            .set(
                FAVORITES_KEY,
                r#"[{"name":"Dobby","species":"house-elf"},{"name":"Dobby"},{"name":"Kreacher"}]"#,
            )
            .unwrap();

        let favorites = FavoritesStore::load_persisted(store);
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites.get()[0].species.as_deref(), Some("house-elf"));
    }

    #[test]
    fn test_set_replaces_list() {
        let mut favorites = FavoritesStore::load_persisted(MemoryStore::new());
        favorites.toggle(&harry()).unwrap();
        favorites
            .set(vec![Entity::new("Ron Weasley"), Entity::new("Ron Weasley")])
            .unwrap();

        assert_eq!(favorites.len(), 1);
        assert!(!favorites.is_favorite("Harry Potter"));

        let reloaded = FavoritesStore::load_persisted(favorites.into_store());
        assert!(reloaded.is_favorite("Ron Weasley"));
    }
}
