use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Normalises a stored number: whole values become integers, fractional values stay floats.
pub fn normalize_number(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 {
        if n >= 0.0 && n <= u64::MAX as f64 {
            return Value::from(n as u64);
        }
        if n >= i64::MIN as f64 {
            return Value::from(n as i64);
        }
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Deserializes a non-negative counter that may have been written as an integer or as a
/// whole float by another client of the store.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let normalized = match &raw {
        Value::Number(n) if n.is_f64() => n.as_f64().map(normalize_number).unwrap_or(Value::Null),
        other => other.clone(),
    };
    normalized
        .as_u64()
        .ok_or_else(|| D::Error::custom(format!("expected a non-negative whole count, got {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_floats_become_integers() {
        assert_eq!(normalize_number(3.0), Value::from(3u64));
        assert_eq!(normalize_number(-2.0), Value::from(-2i64));
        assert!(normalize_number(3.0).is_u64());
    }

    #[test]
    fn test_fractional_values_stay_floats() {
        assert_eq!(normalize_number(2.5), Value::from(2.5));
        assert_eq!(normalize_number(f64::NAN), Value::Null);
    }
}
