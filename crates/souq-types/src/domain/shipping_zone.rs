use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Delivery tier of an area. Serialized with its display label ("Zone 1").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DeliveryZone {
    #[serde(rename = "Zone 1")]
    Zone1,
    #[serde(rename = "Zone 2")]
    Zone2,
    #[serde(rename = "Zone 3")]
    Zone3,
}

impl DeliveryZone {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryZone::Zone1 => "Zone 1",
            DeliveryZone::Zone2 => "Zone 2",
            DeliveryZone::Zone3 => "Zone 3",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Zone 1" => Some(DeliveryZone::Zone1),
            "Zone 2" => Some(DeliveryZone::Zone2),
            "Zone 3" => Some(DeliveryZone::Zone3),
            _ => None,
        }
    }

    pub fn default_delivery_days(&self) -> i64 {
        match self {
            DeliveryZone::Zone1 => 1,
            DeliveryZone::Zone2 => 2,
            DeliveryZone::Zone3 => 3,
        }
    }
}

impl fmt::Display for DeliveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Natural key of a shipping zone: emirate + city + area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneKey {
    pub emirate: String,
    pub city: String,
    pub area: String,
}

impl ZoneKey {
    pub fn new(emirate: impl Into<String>, city: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            emirate: emirate.into(),
            city: city.into(),
            area: area.into(),
        }
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.emirate, self.city, self.area)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingZoneSeed {
    pub emirate: String,
    pub city: String,
    pub area: String,
    pub delivery_zone: DeliveryZone,
    /// Flat shipping cost for this tier, in fils (1 AED = 100 fils).
    pub shipping_cost_fils: i64,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub standard_delivery_days: Option<i64>,
    #[serde(default = "default_true")]
    pub express_delivery_available: bool,
    #[serde(default = "default_true")]
    pub cod_available: bool,
}

impl ShippingZoneSeed {
    pub fn new(
        emirate: impl Into<String>,
        city: impl Into<String>,
        area: impl Into<String>,
        delivery_zone: DeliveryZone,
        shipping_cost_fils: i64,
    ) -> Self {
        Self {
            emirate: emirate.into(),
            city: city.into(),
            area: area.into(),
            delivery_zone,
            shipping_cost_fils,
            postal_code: None,
            standard_delivery_days: None,
            express_delivery_available: true,
            cod_available: true,
        }
    }

    pub fn natural_key(&self) -> ZoneKey {
        ZoneKey::new(&self.emirate, &self.city, &self.area)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingZone {
    pub id: Uuid,
    pub emirate: String,
    pub city: String,
    pub area: String,
    pub postal_code: Option<String>,
    pub delivery_zone: DeliveryZone,
    pub standard_delivery_days: i64,
    pub express_delivery_available: bool,
    pub cod_available: bool,
    pub shipping_cost_fils: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ShippingZone {
    pub fn from_seed(seed: &ShippingZoneSeed) -> Self {
        Self {
            id: Uuid::new_v4(),
            emirate: seed.emirate.clone(),
            city: seed.city.clone(),
            area: seed.area.clone(),
            postal_code: seed.postal_code.clone(),
            delivery_zone: seed.delivery_zone,
            standard_delivery_days: seed
                .standard_delivery_days
                .unwrap_or_else(|| seed.delivery_zone.default_delivery_days()),
            express_delivery_available: seed.express_delivery_available,
            cod_available: seed.cod_available,
            shipping_cost_fils: seed.shipping_cost_fils,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> ZoneKey {
        ZoneKey::new(&self.emirate, &self.city, &self.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_days_default_from_tier() {
        let seed = ShippingZoneSeed::new("Fujairah", "Fujairah", "Fujairah City", DeliveryZone::Zone3, 2500);
        let zone = ShippingZone::from_seed(&seed);
        assert_eq!(zone.standard_delivery_days, 3);
        assert!(zone.cod_available);
        assert_eq!(zone.key(), seed.natural_key());
    }

    #[test]
    fn explicit_delivery_days_win() {
        let mut seed = ShippingZoneSeed::new("Dubai", "Dubai", "Deira", DeliveryZone::Zone1, 1500);
        seed.standard_delivery_days = Some(2);
        assert_eq!(ShippingZone::from_seed(&seed).standard_delivery_days, 2);
    }

    #[test]
    fn zone_labels_round_through_serde() {
        let json = serde_json::to_string(&DeliveryZone::Zone2).unwrap();
        assert_eq!(json, "\"Zone 2\"");
        assert_eq!(DeliveryZone::from_label("Zone 2"), Some(DeliveryZone::Zone2));
        assert!(DeliveryZone::from_label("Zone 9").is_none());
    }
}
