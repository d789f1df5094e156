use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::category::CategorySeed;
use crate::domain::shipping_zone::ShippingZoneSeed;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("malformed seed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{table}[{index}]: `{field}` must not be empty")]
    EmptyField {
        table: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("{table}: duplicate natural key `{key}`")]
    DuplicateKey { table: &'static str, key: String },

    #[error("shipping_zones: negative shipping cost for `{key}`")]
    NegativeCost { key: String },
}

/// The fixed reference rows the bootstrap guarantees, one list per table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedCatalog {
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    #[serde(default)]
    pub shipping_zones: Vec<ShippingZoneSeed>,
}

impl SeedCatalog {
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let catalog: SeedCatalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        for (index, seed) in self.categories.iter().enumerate() {
            if seed.name.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    table: "categories",
                    index,
                    field: "name",
                });
            }
            if !names.insert(seed.natural_key()) {
                return Err(CatalogError::DuplicateKey {
                    table: "categories",
                    key: seed.name.clone(),
                });
            }
        }

        let mut keys = HashSet::new();
        for (index, seed) in self.shipping_zones.iter().enumerate() {
            for (field, value) in [
                ("emirate", &seed.emirate),
                ("city", &seed.city),
                ("area", &seed.area),
            ] {
                if value.trim().is_empty() {
                    return Err(CatalogError::EmptyField {
                        table: "shipping_zones",
                        index,
                        field,
                    });
                }
            }
            let key = seed.natural_key();
            if seed.shipping_cost_fils < 0 {
                return Err(CatalogError::NegativeCost {
                    key: key.to_string(),
                });
            }
            if !keys.insert(key.clone()) {
                return Err(CatalogError::DuplicateKey {
                    table: "shipping_zones",
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}
