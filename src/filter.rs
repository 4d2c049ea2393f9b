// 🔎 Filter Engine - case-insensitive substring selection over the catalog

use std::fmt;
use std::str::FromStr;

use crate::entities::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Name,
    Species,
    House,
    Ancestry,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Name,
        FilterField::Species,
        FilterField::House,
        FilterField::Ancestry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Species => "species",
            FilterField::House => "house",
            FilterField::Ancestry => "ancestry",
        }
    }

    /// Next criterion in selector order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            FilterField::Name => FilterField::Species,
            FilterField::Species => FilterField::House,
            FilterField::House => FilterField::Ancestry,
            FilterField::Ancestry => FilterField::Name,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(FilterField::Name),
            "species" => Ok(FilterField::Species),
            "house" => Ok(FilterField::House),
            "ancestry" => Ok(FilterField::Ancestry),
            other => Err(format!(
                "unknown filter field '{}' (expected name, species, house or ancestry)",
                other
            )),
        }
    }
}

/// Does `entity` match `text` on `field`?
///
/// Empty text matches every record. A missing value never matches non-empty text.
pub fn matches(entity: &Entity, field: FilterField, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    entity
        .field(field)
        .map(|value| value.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

/// Select the records matching `text` on `field`, keeping catalog order
pub fn filter(catalog: &[Entity], field: FilterField, text: &str) -> Vec<Entity> {
    catalog
        .iter()
        .filter(|entity| matches(entity, field, text))
        .cloned()
        .collect()
}
