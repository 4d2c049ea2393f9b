// 🧙 Character Entity - one catalog record from the remote API
//
// The API sends "" for every value it does not know. Those are read as None so
// that "missing" has one representation everywhere (filter, modal, card).

use serde::{Deserialize, Deserializer, Serialize};

use super::category::Category;
use crate::filter::FilterField;

/// Placeholder shown for any missing attribute
pub const UNKNOWN: &str = "Unknown";

// ============================================================================
// ENTITY
// ============================================================================

/// A single character record.
///
/// `name` is treated as the identity key when matching favorites. The source
/// does not guarantee uniqueness; two records sharing a name are considered
/// the same favorite.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub species: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub gender: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub house: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub ancestry: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub patronus: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub actor: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl Entity {
    /// Create a record with only a name (all other attributes missing)
    pub fn new(name: impl Into<String>) -> Self {
        Entity {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_house(mut self, house: impl Into<String>) -> Self {
        self.house = Some(house.into());
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn with_ancestry(mut self, ancestry: impl Into<String>) -> Self {
        self.ancestry = Some(ancestry.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn category(&self) -> Category {
        Category::of(self.house.as_deref())
    }

    /// Image URL, or the placeholder when the record has none
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image.as_deref().unwrap_or(placeholder)
    }

    /// Raw value of a filterable field; None when the record lacks it
    pub fn field(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Name => {
                if self.name.is_empty() {
                    None
                } else {
                    Some(self.name.as_str())
                }
            }
            FilterField::Species => self.species.as_deref(),
            FilterField::House => self.house.as_deref(),
            FilterField::Ancestry => self.ancestry.as_deref(),
        }
    }

    /// Display value with the "Unknown" placeholder applied
    pub fn display(value: Option<&str>) -> &str {
        value.unwrap_or(UNKNOWN)
    }

    /// Same identity as `other` for favorites purposes
    pub fn same_identity(&self, other: &Entity) -> bool {
        self.name == other.name
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_record() {
        let json = r#"{
            "id": "9e3f7ce4-b9a7-4244-b709-dae5c1f1d4a8",
            "name": "Harry Potter",
            "alternate_names": ["The Boy Who Lived"],
            "species": "human",
            "gender": "male",
            "house": "Gryffindor",
            "ancestry": "half-blood",
            "patronus": "stag",
            "actor": "Daniel Radcliffe",
            "image": "https://ik.imagekit.io/hpapi/harry.jpg",
            "wand": {"wood": "holly", "core": "phoenix tail feather", "length": 11}
        }"#;

        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.name, "Harry Potter");
        assert_eq!(entity.house.as_deref(), Some("Gryffindor"));
        assert_eq!(entity.patronus.as_deref(), Some("stag"));
        assert_eq!(entity.category(), Category::Gryffindor);
    }

    #[test]
    fn test_empty_strings_are_missing() {
        let json = r#"{"name": "Vernon Dursley", "species": "human", "house": "",
                       "ancestry": "muggle", "patronus": "", "image": ""}"#;

        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.house, None);
        assert_eq!(entity.patronus, None);
        assert_eq!(entity.image, None);
        assert_eq!(entity.gender, None);
        assert_eq!(entity.category(), Category::Unknown);
    }

    #[test]
    fn test_null_fields_are_missing() {
        let json = r#"{"name": "Crookshanks", "house": null, "actor": null}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.house, None);
        assert_eq!(entity.actor, None);
    }

    #[test]
    fn test_image_placeholder() {
        let placeholder = "https://via.placeholder.com/200";
        let without = Entity::new("Ghost");
        let with = Entity::new("Hermione Granger").with_image("https://img/hermione.jpg");

        assert_eq!(without.image_or(placeholder), placeholder);
        assert_eq!(with.image_or(placeholder), "https://img/hermione.jpg");
    }

    #[test]
    fn test_display_unknown() {
        let entity = Entity::new("Nearly Headless Nick");
        assert_eq!(Entity::display(entity.patronus.as_deref()), "Unknown");
        assert_eq!(Entity::display(Some("otter")), "otter");
    }

    #[test]
    fn test_identity_is_name() {
        let a = Entity::new("Luna Lovegood").with_house("Ravenclaw");
        let b = Entity::new("Luna Lovegood");
        let c = Entity::new("Ginny Weasley");
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
    }
}
