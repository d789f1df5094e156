//! Reference rows guaranteed at startup. The default set is compiled in;
//! deployments can point `--seed-file` at a replacement with the same shape.

use souq_types::domain::seed::SeedCatalog;
use std::path::Path;

use crate::errors::BootstrapError;

const EMBEDDED_CATALOG: &str = include_str!("../seeds/reference_data.json");

pub fn default_catalog() -> Result<SeedCatalog, BootstrapError> {
    Ok(SeedCatalog::from_json_str(EMBEDDED_CATALOG)?)
}

pub fn load_catalog(path: Option<&Path>) -> Result<SeedCatalog, BootstrapError> {
    let Some(path) = path else {
        return default_catalog();
    };
    let raw = std::fs::read_to_string(path).map_err(|e| {
        BootstrapError::Config(format!("cannot read seed file {}: {e}", path.display()))
    })?;
    let catalog = SeedCatalog::from_json_str(&raw)?;
    tracing::info!(
        path = %path.display(),
        categories = catalog.categories.len(),
        shipping_zones = catalog.shipping_zones.len(),
        "loaded seed catalog from file"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use souq_types::domain::shipping_zone::DeliveryZone;
    use std::io::Write;

    #[test]
    fn default_catalog_has_six_ordered_categories() {
        let catalog = default_catalog().unwrap();
        let names: Vec<(&str, i64)> = catalog
            .categories
            .iter()
            .map(|c| (c.name.as_str(), c.sort_order))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Women", 1),
                ("Men", 2),
                ("Kids", 3),
                ("Home", 4),
                ("Electronics", 5),
                ("Sports", 6),
            ]
        );
    }

    #[test]
    fn default_catalog_has_twelve_tiered_zones() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.shipping_zones.len(), 12);
        for zone in &catalog.shipping_zones {
            let expected = match zone.delivery_zone {
                DeliveryZone::Zone1 => 1500,
                DeliveryZone::Zone2 => 2000,
                DeliveryZone::Zone3 => 2500,
            };
            assert_eq!(zone.shipping_cost_fils, expected, "{}", zone.natural_key());
        }
    }

    #[test]
    fn seed_file_overrides_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "categories": [{{ "name": "Books", "sort_order": 1 }}] }}"#).unwrap();
        let catalog = load_catalog(Some(file.path())).unwrap();
        assert_eq!(catalog.categories.len(), 1);
        assert!(catalog.shipping_zones.is_empty());
    }

    #[test]
    fn unreadable_or_invalid_seed_file_fails() {
        let missing = load_catalog(Some(Path::new("/nonexistent/souq-seeds.json")));
        assert!(matches!(missing, Err(BootstrapError::Config(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_catalog(Some(file.path())),
            Err(BootstrapError::Catalog(_))
        ));
    }
}
