//! Registry of every table the marketplace application reads or writes.
//!
//! Each entry is applied with create-if-missing semantics; order follows
//! foreign-key dependencies so a fresh database comes up in one pass.

#[derive(Debug, Clone, Copy)]
pub struct SchemaObject {
    pub name: &'static str,
    pub ddl: &'static str,
    /// Unique index on the natural key, applied even when the table already
    /// exists so insert-if-absent has a conflict target.
    pub natural_key: Option<&'static str>,
}

pub const SCHEMA: &[SchemaObject] = &[
    SchemaObject {
        name: "users",
        ddl: include_str!("../migrations/0001_users.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "addresses",
        ddl: include_str!("../migrations/0002_addresses.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "uae_shipping_zones",
        ddl: include_str!("../migrations/0003_uae_shipping_zones.sql"),
        natural_key: Some(
            "CREATE UNIQUE INDEX IF NOT EXISTS uae_shipping_zones_natural_key \
             ON uae_shipping_zones (emirate, city, area)",
        ),
    },
    SchemaObject {
        name: "categories",
        ddl: include_str!("../migrations/0004_categories.sql"),
        natural_key: Some("CREATE UNIQUE INDEX IF NOT EXISTS categories_name_key ON categories (name)"),
    },
    SchemaObject {
        name: "items",
        ddl: include_str!("../migrations/0005_items.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "item_images",
        ddl: include_str!("../migrations/0006_item_images.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "orders",
        ddl: include_str!("../migrations/0007_orders.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "transactions",
        ddl: include_str!("../migrations/0008_transactions.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "shipments",
        ddl: include_str!("../migrations/0009_shipments.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "conversations",
        ddl: include_str!("../migrations/0010_conversations.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "messages",
        ddl: include_str!("../migrations/0011_messages.sql"),
        natural_key: None,
    },
    SchemaObject {
        name: "notifications",
        ddl: include_str!("../migrations/0012_notifications.sql"),
        natural_key: None,
    },
];

pub fn table_names() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|o| o.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_object_is_create_if_missing() {
        for object in SCHEMA {
            assert!(
                object.ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} ", object.name)),
                "{} must use create-if-missing",
                object.name
            );
            assert!(!object.ddl.to_uppercase().contains("DROP "));
        }
    }

    #[test]
    fn seeded_tables_carry_a_natural_key_index() {
        for name in ["categories", "uae_shipping_zones"] {
            let object = SCHEMA.iter().find(|o| o.name == name).unwrap();
            let index = object.natural_key.expect("natural key index");
            assert!(index.starts_with("CREATE UNIQUE INDEX IF NOT EXISTS "));
            assert!(index.contains(&format!("ON {name} (")));
        }
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = table_names().collect();
        assert_eq!(names.len(), SCHEMA.len());
    }
}
