//! Per-pair results that carry a `last` cursor.
//!
//! The OHLC, Trades and Spread endpoints return the data under the pair name
//! next to a `last` field to pass as `since` on the next call:
//!
//! ```json
//! { "XXBTZUSD": [[...], [...]], "last": 1688671200 }
//! ```
//!
//! `last` is a number for some endpoints and a string for others, so it is
//! kept as text.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

/// Data for one pair plus the cursor for the next page.
///
/// ```rust
/// use kraken_rest_client::types::PairSeries;
///
/// let json = r#"{"XXBTZUSD": [1, 2, 3], "last": "1700000000123456789"}"#;
/// let series: PairSeries<Vec<u8>> = serde_json::from_str(json).unwrap();
/// assert_eq!(series.pair, "XXBTZUSD");
/// assert_eq!(series.last, "1700000000123456789");
/// assert_eq!(series.data, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PairSeries<T> {
    /// Pair key as returned by Kraken (e.g. `XXBTZUSD`).
    pub pair: String,
    /// Cursor to pass as `since` to continue.
    pub last: String,
    /// Entries for the pair.
    pub data: T,
}

impl<'de, T> Deserialize<'de> for PairSeries<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PairSeriesVisitor(PhantomData))
    }
}

struct PairSeriesVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for PairSeriesVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = PairSeries<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with one pair key and a `last` cursor")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut last = None;
        let mut entry = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == "last" {
                last = Some(match map.next_value::<serde_json::Value>()? {
                    serde_json::Value::String(text) => text,
                    serde_json::Value::Number(number) => number.to_string(),
                    other => {
                        return Err(de::Error::invalid_type(
                            de::Unexpected::Other(&other.to_string()),
                            &"a string or number cursor",
                        ));
                    }
                });
            } else if entry.is_some() {
                return Err(de::Error::custom(format!("unexpected second pair key {key:?}")));
            } else {
                let data = map.next_value::<T>()?;
                entry = Some((key, data));
            }
        }

        let last = last.ok_or_else(|| de::Error::missing_field("last"))?;
        let (pair, data) = entry.ok_or_else(|| de::Error::custom("no pair data in response"))?;
        Ok(PairSeries { pair, last, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_cursor() {
        let json = r#"{"last": 1688671200, "XETHZEUR": ["a"]}"#;
        let series: PairSeries<Vec<String>> = serde_json::from_str(json).unwrap();
        assert_eq!(series.last, "1688671200");
        assert_eq!(series.pair, "XETHZEUR");
    }

    #[test]
    fn test_missing_cursor() {
        let json = r#"{"XETHZEUR": []}"#;
        assert!(serde_json::from_str::<PairSeries<Vec<String>>>(json).is_err());
    }

    #[test]
    fn test_two_pairs_rejected() {
        let json = r#"{"A": [], "B": [], "last": "1"}"#;
        assert!(serde_json::from_str::<PairSeries<Vec<String>>>(json).is_err());
    }
}
