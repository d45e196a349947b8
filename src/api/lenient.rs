//! Deserializers for the loosely typed values the backend emits.
//!
//! The backend serializes decimals as strings (`"19.90"`) and booleans as `0`/`1`
//! depending on the column, so both shapes are accepted.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolRepr {
    Bool(bool),
    Int(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Number(f64),
    Text(String),
}

pub fn bool_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<BoolRepr>::deserialize(deserializer)?;
    Ok(value.and_then(|repr| match repr {
        BoolRepr::Bool(b) => Some(b),
        BoolRepr::Int(i) => Some(i != 0),
        BoolRepr::Text(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "sim" => Some(true),
            "0" | "false" | "nao" | "não" => Some(false),
            _ => None,
        },
    }))
}

pub fn decimal_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<DecimalRepr>::deserialize(deserializer)?;
    Ok(value.and_then(|repr| match repr {
        DecimalRepr::Number(n) => Some(n),
        DecimalRepr::Text(s) => s.trim().replace(',', ".").parse().ok(),
    }))
}
