use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product category that must exist after bootstrap. Identified by `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySeed {
    pub name: String,
    pub sort_order: i64,
}

impl CategorySeed {
    pub fn new(name: impl Into<String>, sort_order: i64) -> Self {
        Self {
            name: name.into(),
            sort_order,
        }
    }

    pub fn natural_key(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub icon_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Builds a fresh, active top-level category row from its seed.
    pub fn from_seed(seed: &CategorySeed) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: seed.name.clone(),
            parent_id: None,
            icon_url: None,
            is_active: true,
            sort_order: seed.sort_order,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_seed_copies_key_and_position() {
        let seed = CategorySeed::new("Kids", 3);
        let category = Category::from_seed(&seed);
        assert_eq!(category.name, "Kids");
        assert_eq!(category.sort_order, 3);
        assert!(category.is_active);
        assert!(category.parent_id.is_none());
    }

    #[test]
    fn seeds_get_distinct_ids() {
        let seed = CategorySeed::new("Home", 4);
        let a = Category::from_seed(&seed);
        let b = Category::from_seed(&seed);
        assert_ne!(a.id, b.id);
    }
}
