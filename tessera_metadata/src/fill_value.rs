use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A non-finite floating point fill value, serialised as a string.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Debug, Display)]
pub enum NonFiniteFloat {
    /// Not a number.
    #[serde(rename = "NaN")]
    #[display("NaN")]
    NaN,
    /// Positive infinity.
    #[serde(rename = "Infinity")]
    #[display("Infinity")]
    Infinity,
    /// Negative infinity.
    #[serde(rename = "-Infinity")]
    #[display("-Infinity")]
    NegInfinity,
}

/// Fill value metadata: a JSON scalar interpreted according to the data type of the array.
///
/// Non-finite floating point values are represented by the strings `"NaN"`, `"Infinity"` and `"-Infinity"`.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Display)]
#[serde(untagged)]
pub enum FillValueMetadata {
    /// A boolean.
    Bool(bool),
    /// A non-negative integer.
    UInt(u64),
    /// A negative integer.
    Int(i64),
    /// A finite float.
    Float(f64),
    /// A non-finite float.
    NonFinite(NonFiniteFloat),
}

impl FillValueMetadata {
    /// Create fill value metadata from a float, mapping non-finite values to [`NonFiniteFloat`].
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::NonFinite(NonFiniteFloat::NaN)
        } else if value == f64::INFINITY {
            Self::NonFinite(NonFiniteFloat::Infinity)
        } else if value == f64::NEG_INFINITY {
            Self::NonFinite(NonFiniteFloat::NegInfinity)
        } else {
            Self::Float(value)
        }
    }

    /// Create fill value metadata from a signed integer.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        u64::try_from(value).map_or(Self::Int(value), Self::UInt)
    }

    /// Return the fill value as a float, if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            Self::UInt(value) => Some(*value as f64),
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::NonFinite(NonFiniteFloat::NaN) => Some(f64::NAN),
            Self::NonFinite(NonFiniteFloat::Infinity) => Some(f64::INFINITY),
            Self::NonFinite(NonFiniteFloat::NegInfinity) => Some(f64::NEG_INFINITY),
        }
    }
}

impl From<bool> for FillValueMetadata {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for FillValueMetadata {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<i64> for FillValueMetadata {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i32> for FillValueMetadata {
    fn from(value: i32) -> Self {
        Self::from_i64(i64::from(value))
    }
}

impl From<f64> for FillValueMetadata {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<f32> for FillValueMetadata {
    fn from(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }
}

impl From<NonFiniteFloat> for FillValueMetadata {
    fn from(value: NonFiniteFloat) -> Self {
        Self::NonFinite(value)
    }
}

impl Default for FillValueMetadata {
    fn default() -> Self {
        Self::UInt(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_value_metadata() {
        assert_eq!(
            serde_json::from_str::<FillValueMetadata>("0").unwrap(),
            FillValueMetadata::UInt(0)
        );
        assert_eq!(
            serde_json::from_str::<FillValueMetadata>("-3").unwrap(),
            FillValueMetadata::Int(-3)
        );
        assert_eq!(
            serde_json::from_str::<FillValueMetadata>("0.5").unwrap(),
            FillValueMetadata::Float(0.5)
        );
        assert_eq!(
            serde_json::from_str::<FillValueMetadata>("true").unwrap(),
            FillValueMetadata::Bool(true)
        );
        assert_eq!(
            serde_json::from_str::<FillValueMetadata>(r#""-Infinity""#).unwrap(),
            FillValueMetadata::NonFinite(NonFiniteFloat::NegInfinity)
        );
        assert!(serde_json::from_str::<FillValueMetadata>(r#""nan""#).is_err());
        assert!(serde_json::from_str::<FillValueMetadata>("[0]").is_err());
    }

    #[test]
    fn fill_value_metadata_non_finite() {
        let fill_value = FillValueMetadata::from_f64(f64::NAN);
        assert_eq!(serde_json::to_string(&fill_value).unwrap(), r#""NaN""#);
        assert!(fill_value.as_f64().unwrap().is_nan());
        assert_eq!(
            FillValueMetadata::from_f64(1.0),
            FillValueMetadata::Float(1.0)
        );
        assert_eq!(FillValueMetadata::from_i64(5), FillValueMetadata::UInt(5));
        assert_eq!(FillValueMetadata::from_i64(-5), FillValueMetadata::Int(-5));
        assert_eq!(FillValueMetadata::Bool(true).as_f64(), None);
    }
}
