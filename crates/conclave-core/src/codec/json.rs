//! JSON document encoding.
//!
//! Field names are fixed per type through serde `rename` attributes. Unsigned
//! integers travel as decimal-digit strings so that 64-bit values survive
//! JSON parsers that only know doubles; byte strings travel as lowercase hex.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DecodeError;

/// Conversion to and from a `serde_json::Value` document.
pub trait JsonDocument: Serialize + DeserializeOwned {
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("codec types serialize to JSON without map keys")
    }

    fn from_json(document: &serde_json::Value) -> Result<Self, DecodeError> {
        Ok(<Self as serde::Deserialize>::deserialize(document)?)
    }
}

/// Unsigned integers as decimal strings.
pub mod decimal {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(de::Error::custom)
    }

    /// `FromStr` alone would also take a leading `+` or `0`.
    pub fn parse<T>(s: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: Display,
    {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("expected a decimal digit string, got {s:?}"));
        }
        if s.len() > 1 && s.starts_with('0') {
            return Err(format!("leading zeros are not canonical: {s:?}"));
        }
        s.parse().map_err(|e| format!("{e}: {s:?}"))
    }
}

/// Scripts as hex strings.
pub mod script_hex {
    use bitcoin::ScriptBuf;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(script: &ScriptBuf, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(script.as_bytes()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ScriptBuf, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s)
            .map(ScriptBuf::from_bytes)
            .map_err(|e| de::Error::custom(format!("invalid script hex: {e}")))
    }
}

/// A list of public keys as hex strings.
pub mod pubkey_hex_seq {
    use bitcoin::PublicKey;
    use serde::ser::SerializeSeq;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(keys: &[PublicKey], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(&hex::encode(key.to_bytes()))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<PublicKey>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| {
                let bytes = hex::decode(s)
                    .map_err(|e| de::Error::custom(format!("invalid public key hex: {e}")))?;
                PublicKey::from_slice(&bytes)
                    .map_err(|e| de::Error::custom(format!("invalid public key: {e}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Amount {
        #[serde(with = "decimal")]
        value: u64,
    }

    impl JsonDocument for Amount {}

    #[test]
    fn u64_max_renders_as_string() {
        let json = Amount { value: u64::MAX }.to_json();
        assert_eq!(json, serde_json::json!({ "value": "18446744073709551615" }));
        assert_eq!(
            serde_json::to_string(&Amount { value: u64::MAX }).expect("serialize"),
            r#"{"value":"18446744073709551615"}"#
        );
    }

    #[test]
    fn decimal_rejects_numbers_signs_and_overflow() {
        for bad in [
            serde_json::json!({ "value": 5 }),
            serde_json::json!({ "value": "+5" }),
            serde_json::json!({ "value": "-1" }),
            serde_json::json!({ "value": "" }),
            serde_json::json!({ "value": "007" }),
            serde_json::json!({ "value": "00" }),
            serde_json::json!({ "value": "18446744073709551616" }),
        ] {
            assert!(Amount::from_json(&bad).is_err(), "{bad} must be rejected");
        }
    }

    #[test]
    fn decimal_is_canonical() {
        assert_eq!(decimal::parse::<u64>("0"), Ok(0));
        assert_eq!(decimal::parse::<u64>("10"), Ok(10));
        assert!(decimal::parse::<u64>("007").is_err());

        let zero = Amount::from_json(&serde_json::json!({ "value": "0" })).expect("zero");
        assert_eq!(zero.to_json(), serde_json::json!({ "value": "0" }));
    }

    #[test]
    fn missing_key_is_decode_error_and_unknown_keys_are_ignored() {
        let err = Amount::from_json(&serde_json::json!({})).expect_err("value is required");
        assert!(matches!(err, DecodeError::Json(_)));

        let parsed = Amount::from_json(&serde_json::json!({ "value": "7", "extra": true }))
            .expect("unknown keys are ignored");
        assert_eq!(parsed, Amount { value: 7 });
    }
}
