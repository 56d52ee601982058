//! Serde helpers for Kraken's irregular field encodings.

use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};

/// A limit that Kraken sends either as a decimal string or as `false`.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use serde::Deserialize;
/// use kraken_rest_client::types::serde_helpers::decimal_or_false;
///
/// #[derive(Deserialize)]
/// struct Method {
///     #[serde(deserialize_with = "decimal_or_false::deserialize", default)]
///     limit: Option<Decimal>,
/// }
///
/// let none: Method = serde_json::from_str(r#"{"limit":false}"#).unwrap();
/// assert!(none.limit.is_none());
///
/// let some: Method = serde_json::from_str(r#"{"limit":"2500.00"}"#).unwrap();
/// assert_eq!(some.limit.unwrap().to_string(), "2500.00");
/// ```
pub mod decimal_or_false {
    use super::*;

    /// Deserialize `false` as `None` and a decimal string as `Some`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalOrFalse)
    }

    struct DecimalOrFalse;

    impl<'de> Visitor<'de> for DecimalOrFalse {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal string or false")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            if value {
                Err(E::invalid_value(de::Unexpected::Bool(true), &self))
            } else {
                Ok(None)
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse().map(Some).map_err(E::custom)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }
}

/// Treat an empty string as `None`.
pub mod empty_as_none {
    use super::*;
    use serde::Deserialize;

    /// Deserialize `""` as `None`, anything else as `Some(string)`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}
