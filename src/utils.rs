//! Utility functions for the Bitcoin MCP server

use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer,
};
use serde_json::{from_value, Number, Value};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Tool arguments that do not match the declared input schema.
#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("{0}")]
    Shape(#[from] serde_json::Error),
    #[error("{0}")]
    Constraint(#[from] ValidationErrors),
}

/// Deserialize tool arguments into `T` and check its declared constraints.
///
/// A missing `arguments` object is treated as `{}` so that required fields
/// are reported by name.
pub fn parse_args<T: DeserializeOwned + Validate>(args: Option<&Value>) -> Result<T, ArgsError> {
    let args = match args {
        Some(Value::Null) | None => Value::Object(Default::default()),
        Some(v) => v.clone(),
    };
    let parsed: T = from_value(args)?;
    parsed.validate()?;
    Ok(parsed)
}

/// `deserialize_with` helper for integer arguments that also accepts a JSON
/// float with no fractional part, so `10.0` reads as `10`.
pub fn integral<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let number = Number::deserialize(deserializer)?;
    let whole = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    });
    whole
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| {
            de::Error::custom(format!("expected a non-negative integer, found {}", number))
        })
}
