//! Value objects: equality by value, not identity.
//!
//! Two `Price`s holding the same amount are the same price; there is no notion
//! of "which" price it is.

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Largest price the catalog accepts, in cents (10,000.00).
pub const MAX_PRICE_CENTS: u64 = 1_000_000;

/// Service price, stored in cents.
///
/// The API exchanges prices as decimal strings with two places (`"50.00"`);
/// input may use either `.` or `,` as the decimal separator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(u64);

impl ValueObject for Price {}

impl Price {
    /// Build a price from cents, enforcing the catalog range `(0, 10000.00]`.
    pub fn from_cents(cents: u64) -> Result<Self, DomainError> {
        if cents == 0 {
            return Err(DomainError::validation("price must be positive"));
        }
        if cents > MAX_PRICE_CENTS {
            return Err(DomainError::validation("price must not exceed 10000.00"));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Parse without range checks; used for values coming back from the API.
    fn parse_unchecked(s: &str) -> Result<u64, DomainError> {
        let s = s.trim();
        let (whole, frac) = match s.find(|c: char| c == '.' || c == ',') {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => (s, ""),
        };

        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || frac.len() > 2
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(DomainError::validation(format!("malformed price: {s:?}")));
        }

        let whole: u64 = whole
            .parse()
            .map_err(|_| DomainError::validation(format!("price out of range: {s:?}")))?;
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().unwrap_or(0) * 10,
            _ => frac.parse::<u64>().unwrap_or(0),
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(|| DomainError::validation(format!("price out of range: {s:?}")))
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cents(Self::parse_unchecked(s)?)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        let cents = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Price::parse_unchecked(&s).map_err(serde::de::Error::custom)?,
            Raw::Number(n) if n.is_finite() && n >= 0.0 => (n * 100.0).round() as u64,
            Raw::Number(n) => {
                return Err(serde::de::Error::custom(format!("invalid price: {n}")));
            }
        };
        Ok(Price(cents))
    }
}

/// Shortest and longest service the catalog accepts, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 480;

/// Length of a service in whole minutes (1–480).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceDuration(u32);

impl ValueObject for ServiceDuration {}

impl ServiceDuration {
    pub fn from_minutes(minutes: u32) -> Result<Self, DomainError> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
            return Err(DomainError::validation(format!(
                "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_comma_and_dot() {
        assert_eq!("50".parse::<Price>().unwrap().cents(), 5000);
        assert_eq!("50,5".parse::<Price>().unwrap().cents(), 5050);
        assert_eq!("0.99".parse::<Price>().unwrap().cents(), 99);
        assert_eq!("10000.00".parse::<Price>().unwrap().cents(), MAX_PRICE_CENTS);
    }

    #[test]
    fn price_rejects_out_of_range_and_malformed() {
        assert!("0".parse::<Price>().is_err());
        assert!("10000.01".parse::<Price>().is_err());
        assert!("12.345".parse::<Price>().is_err());
        assert!("-3".parse::<Price>().is_err());
        assert!(".50".parse::<Price>().is_err());
    }

    #[test]
    fn price_round_trips_through_api_string() {
        let price: Price = serde_json::from_str("\"35.00\"").unwrap();
        assert_eq!(price.cents(), 3500);
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"35.00\"");

        let numeric: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(numeric.to_string(), "12.50");
    }

    #[test]
    fn duration_bounds() {
        assert!(ServiceDuration::from_minutes(0).is_err());
        assert!(ServiceDuration::from_minutes(481).is_err());
        assert_eq!(ServiceDuration::from_minutes(480).unwrap().minutes(), 480);
    }
}
