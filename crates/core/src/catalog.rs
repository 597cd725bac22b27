//! Service catalog.

use serde::{Deserialize, Serialize};

use crate::id::ServiceId;
use crate::value_object::{Price, ServiceDuration};

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub duration: ServiceDuration,
    pub price: Price,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// False while the service still has future reserved appointments.
    #[serde(default = "default_true")]
    pub can_delete: bool,
}

fn default_true() -> bool {
    true
}

/// Payload for creating a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewService {
    pub name: String,
    pub duration: ServiceDuration,
    pub price: Price,
}

/// Partial update of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<ServiceDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_service_listing_entry() {
        let service: Service = serde_json::from_value(json!({
            "id": 3,
            "name": "Corte feminino",
            "duration": 60,
            "price": "80.00",
            "is_active": true,
            "can_delete": false
        }))
        .unwrap();

        assert_eq!(service.duration.minutes(), 60);
        assert_eq!(service.price.cents(), 8000);
        assert!(!service.can_delete);
    }

    #[test]
    fn new_service_serializes_price_as_decimal_string() {
        let payload = NewService {
            name: "Manicure".into(),
            duration: ServiceDuration::from_minutes(45).unwrap(),
            price: "35,5".parse().unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "name": "Manicure", "duration": 45, "price": "35.50" })
        );
    }
}
