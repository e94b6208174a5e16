use crate::metadata::{DataType, DataTypeKind, Endianness, FillValueMetadata};

/// The fill value of an array: the encoded bytes of one element.
///
/// Elements that have never been written read as the fill value.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FillValue(Vec<u8>);

/// Encode an integer as `size` bytes if it is in the range of the integer type.
fn integer_bytes(
    value: i128,
    size: usize,
    signed: bool,
    endianness: Endianness,
) -> Option<Vec<u8>> {
    let bits = u32::try_from(size).ok()?.checked_mul(8)?;
    let (min, max) = if signed {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    };
    if !(min..=max).contains(&value) {
        return None;
    }
    let mut bytes = value.to_le_bytes()[..size].to_vec();
    if endianness == Endianness::Big {
        bytes.reverse();
    }
    Some(bytes)
}

impl FillValue {
    /// Create a fill value from raw element bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Create the fill value for `data_type` from metadata.
    ///
    /// Returns [`None`] if the value is not representable by the data type.
    /// Integer fill values must be in range, and floating point fill values may not overflow the data type.
    #[must_use]
    pub fn from_metadata(data_type: &DataType, metadata: &FillValueMetadata) -> Option<Self> {
        let endianness = data_type.endianness();
        let bytes = match (data_type.kind(), metadata) {
            (DataTypeKind::Bool, FillValueMetadata::Bool(value)) => vec![u8::from(*value)],
            (DataTypeKind::Bool, FillValueMetadata::UInt(value @ (0 | 1))) => {
                vec![u8::from(*value == 1)]
            }
            (DataTypeKind::UInt | DataTypeKind::Int, FillValueMetadata::UInt(value)) => {
                let signed = data_type.kind() == DataTypeKind::Int;
                integer_bytes(i128::from(*value), data_type.size(), signed, endianness)?
            }
            (DataTypeKind::Int, FillValueMetadata::Int(value)) => {
                integer_bytes(i128::from(*value), data_type.size(), true, endianness)?
            }
            (DataTypeKind::Float, metadata) => {
                let value = metadata.as_f64()?;
                match data_type.size() {
                    4 => {
                        #[allow(clippy::cast_possible_truncation)]
                        let value = value as f32;
                        if value.is_infinite() && metadata.as_f64()?.is_finite() {
                            return None;
                        }
                        match endianness {
                            Endianness::Little => value.to_le_bytes().to_vec(),
                            Endianness::Big => value.to_be_bytes().to_vec(),
                        }
                    }
                    8 => match endianness {
                        Endianness::Little => value.to_le_bytes().to_vec(),
                        Endianness::Big => value.to_be_bytes().to_vec(),
                    },
                    _ => return None,
                }
            }
            _ => return None,
        };
        Some(Self(bytes))
    }

    /// Returns the size in bytes of the fill value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Return the byte representation of the fill value.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return `num_elements` repetitions of the fill value.
    #[must_use]
    pub fn repeat(&self, num_elements: usize) -> Vec<u8> {
        self.0.repeat(num_elements)
    }

    /// Check if every element of `bytes` equals the fill value.
    ///
    /// Compares bytes, so a `NaN` fill value matches elements with the same `NaN` encoding.
    #[must_use]
    pub fn equals_all(&self, bytes: &[u8]) -> bool {
        match self.0.len() {
            0 => bytes.is_empty(),
            1 => {
                let fill = self.0[0];
                bytes.iter().all(|byte| *byte == fill)
            }
            size => {
                bytes.len() % size == 0
                    && bytes
                        .chunks_exact(size)
                        .all(|element| element == self.0.as_slice())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::metadata::NonFiniteFloat;

    use super::*;

    #[test]
    fn fill_value_from_metadata() {
        assert_eq!(
            FillValue::from_metadata(&DataType::uint16(), &FillValueMetadata::UInt(258)),
            Some(FillValue::new(vec![2, 1]))
        );
        assert_eq!(
            FillValue::from_metadata(
                &DataType::uint16().with_endianness(Endianness::Big),
                &FillValueMetadata::UInt(258)
            ),
            Some(FillValue::new(vec![1, 2]))
        );
        assert_eq!(
            FillValue::from_metadata(&DataType::int8(), &FillValueMetadata::Int(-1)),
            Some(FillValue::new(vec![255]))
        );
        assert_eq!(
            FillValue::from_metadata(&DataType::bool(), &FillValueMetadata::Bool(true)),
            Some(FillValue::new(vec![1]))
        );
        assert_eq!(
            FillValue::from_metadata(&DataType::float32(), &FillValueMetadata::UInt(0)),
            Some(FillValue::new(vec![0; 4]))
        );
        assert_eq!(
            FillValue::from_metadata(
                &DataType::float64(),
                &FillValueMetadata::NonFinite(NonFiniteFloat::NaN)
            ),
            Some(FillValue::new(f64::NAN.to_le_bytes().to_vec()))
        );
    }

    #[test]
    fn fill_value_unrepresentable() {
        let unrepresentable = [
            (DataType::uint8(), FillValueMetadata::UInt(256)),
            (DataType::uint8(), FillValueMetadata::Int(-1)),
            (DataType::int16(), FillValueMetadata::Float(0.5)),
            (DataType::bool(), FillValueMetadata::UInt(2)),
            (DataType::float32(), FillValueMetadata::Float(1e300)),
            (DataType::float32(), FillValueMetadata::Bool(false)),
        ];
        for (data_type, fill_value) in unrepresentable {
            assert!(
                FillValue::from_metadata(&data_type, &fill_value).is_none(),
                "{data_type} {fill_value}"
            );
        }
    }

    #[test]
    fn fill_value_equals_all() {
        let fill = FillValue::new(vec![1, 2]);
        assert!(fill.equals_all(&[]));
        assert!(fill.equals_all(&[1, 2, 1, 2]));
        assert!(!fill.equals_all(&[1, 2, 2, 1]));
        assert!(!fill.equals_all(&[1, 2, 1]));
        assert!(FillValue::new(vec![0]).equals_all(&[0; 100]));
    }
}
