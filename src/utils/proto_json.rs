//! Serde helpers for the proto3 JSON mapping, which encodes 64-bit integers
//! as JSON strings. Deserialization accepts both strings and numbers.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Int64Repr {
    Str(String),
    Num(i64),
}

impl Int64Repr {
    fn into_i64<E: serde::de::Error>(self) -> std::result::Result<i64, E> {
        match self {
            Int64Repr::Str(s) => s.parse().map_err(E::custom),
            Int64Repr::Num(n) => Ok(n),
        }
    }
}

pub mod int64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
        Int64Repr::deserialize(deserializer)?.into_i64()
    }
}

pub mod int64_vec {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[i64], serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| v.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<i64>, D::Error> {
        Vec::<Int64Repr>::deserialize(deserializer)?
            .into_iter()
            .map(Int64Repr::into_i64)
            .collect()
    }
}
