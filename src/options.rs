use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a cursor reacts when a fetched document does not decode into the
/// caller's record type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DecodePolicy {
    /// Any decode error aborts the operation and is reported.
    #[default]
    Strict,
    /// Rows that fail to decode are dropped from bulk reads.
    IgnoreRow,
    /// Fields that fail to decode are left alone; the rest of the row is kept.
    IgnoreField,
}

impl TryFrom<u32> for DecodePolicy {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(DecodePolicy::Strict),
            1 => Ok(DecodePolicy::IgnoreRow),
            2 => Ok(DecodePolicy::IgnoreField),
            other => Err(Error::InvalidPolicy(other)),
        }
    }
}

impl From<DecodePolicy> for u32 {
    fn from(policy: DecodePolicy) -> Self {
        match policy {
            DecodePolicy::Strict => 0,
            DecodePolicy::IgnoreRow => 1,
            DecodePolicy::IgnoreField => 2,
        }
    }
}

/// Per-query settings applied to the cursor a query produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub decode_policy: DecodePolicy,
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Option<Duration>,
}

impl QueryOptions {
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parse options from a JSON object such as `{"decode_policy": 2}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

mod millis {
    use std::time::Duration;

    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => {
                let millis = u64::try_from(d.as_millis())
                    .map_err(|_| S::Error::custom("timeout does not fit in u64 milliseconds"))?;
                ser.serialize_some(&millis)
            }
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(de)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_numbers_map_to_variants() {
        assert_eq!(DecodePolicy::try_from(0).unwrap(), DecodePolicy::Strict);
        assert_eq!(DecodePolicy::try_from(1).unwrap(), DecodePolicy::IgnoreRow);
        assert_eq!(DecodePolicy::try_from(2).unwrap(), DecodePolicy::IgnoreField);
        assert!(matches!(
            DecodePolicy::try_from(7),
            Err(Error::InvalidPolicy(7))
        ));
    }

    #[test]
    fn options_parse_from_json() {
        let opts = QueryOptions::from_json(r#"{"decode_policy": 2, "timeout_ms": 1500}"#).unwrap();
        assert_eq!(opts.decode_policy, DecodePolicy::IgnoreField);
        assert_eq!(opts.timeout, Some(Duration::from_millis(1500)));

        let opts = QueryOptions::from_json("{}").unwrap();
        assert_eq!(opts, QueryOptions::default());
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = QueryOptions::from_json(r#"{"decode_policy": 9}"#).unwrap_err();
        assert!(matches!(err, Error::BadConfig(_)));
    }

    #[test]
    fn oversized_timeout_fails_to_serialize() {
        let opts = QueryOptions::default().with_timeout(Duration::MAX);
        let err = serde_json::to_value(&opts).unwrap_err();
        assert!(err.to_string().contains("u64 milliseconds"));
    }

    #[test]
    fn options_round_trip_through_json() {
        let opts = QueryOptions::default()
            .with_policy(DecodePolicy::IgnoreRow)
            .with_timeout(Duration::from_secs(2));
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["decode_policy"], 1);
        assert_eq!(json["timeout_ms"], 2000);
    }
}
