// 🏷️ Category - house-derived visual grouping for cards and the detail modal
//
// The house value from the API is free text. Only an exact, case-sensitive
// match against one of the four houses yields that house; everything else
// (absent, empty, misspelled, lowercase) is Unknown.

use std::fmt;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Gryffindor,
    Slytherin,
    Hufflepuff,
    Ravenclaw,
    Unknown,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 5] = [
        Category::Gryffindor,
        Category::Slytherin,
        Category::Hufflepuff,
        Category::Ravenclaw,
        Category::Unknown,
    ];

    /// Total mapping from a raw house value to its category.
    ///
    /// Cards and the detail modal both style through this function, so the
    /// two render sites can never disagree.
    pub fn of(house: Option<&str>) -> Category {
        match house {
            Some("Gryffindor") => Category::Gryffindor,
            Some("Slytherin") => Category::Slytherin,
            Some("Hufflepuff") => Category::Hufflepuff,
            Some("Ravenclaw") => Category::Ravenclaw,
            _ => Category::Unknown,
        }
    }

    /// Style class carried by a card or the modal container
    pub fn class_name(&self) -> &'static str {
        match self {
            Category::Gryffindor => "house-gryffindor",
            Category::Slytherin => "house-slytherin",
            Category::Hufflepuff => "house-hufflepuff",
            Category::Ravenclaw => "house-ravenclaw",
            Category::Unknown => "house-unknown",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gryffindor => "Gryffindor",
            Category::Slytherin => "Slytherin",
            Category::Hufflepuff => "Hufflepuff",
            Category::Ravenclaw => "Ravenclaw",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_houses_map_exactly() {
        assert_eq!(Category::of(Some("Gryffindor")), Category::Gryffindor);
        assert_eq!(Category::of(Some("Slytherin")), Category::Slytherin);
        assert_eq!(Category::of(Some("Hufflepuff")), Category::Hufflepuff);
        assert_eq!(Category::of(Some("Ravenclaw")), Category::Ravenclaw);
    }

    #[test]
    fn test_everything_else_is_unknown() {
        assert_eq!(Category::of(None), Category::Unknown);
        assert_eq!(Category::of(Some("")), Category::Unknown);
        assert_eq!(Category::of(Some("gryffindor")), Category::Unknown);
        assert_eq!(Category::of(Some("Gryffindor ")), Category::Unknown);
        assert_eq!(Category::of(Some("Durmstrang")), Category::Unknown);
    }

    #[test]
    fn test_class_names() {
        let classes: Vec<&str> = Category::ALL.iter().map(|c| c.class_name()).collect();
        assert_eq!(
            classes,
            vec![
                "house-gryffindor",
                "house-slytherin",
                "house-hufflepuff",
                "house-ravenclaw",
                "house-unknown",
            ]
        );
    }
}
