use crate::metadata::{DataType, DataTypeKind, Endianness};

/// A native element type which can be read from and written to an array without conversion.
///
/// An element type is compatible with a data type of the same kind and size in native byte order.
pub trait Element: bytemuck::Pod {
    /// The data type kind.
    const KIND: DataTypeKind;

    /// The element type name used in error messages.
    const NAME: &'static str;

    /// Returns true if elements of this type have the same representation as elements of `data_type`.
    #[must_use]
    fn compatible(data_type: &DataType) -> bool {
        data_type.kind() == Self::KIND
            && data_type.size() == size_of::<Self>()
            && (data_type.size() == 1 || data_type.endianness() == Endianness::native())
    }
}

macro_rules! impl_element {
    ($ty:ty, $kind:ident) => {
        impl Element for $ty {
            const KIND: DataTypeKind = DataTypeKind::$kind;
            const NAME: &'static str = stringify!($ty);
        }
    };
}

impl_element!(u8, UInt);
impl_element!(u16, UInt);
impl_element!(u32, UInt);
impl_element!(u64, UInt);
impl_element!(i8, Int);
impl_element!(i16, Int);
impl_element!(i32, Int);
impl_element!(i64, Int);
impl_element!(f32, Float);
impl_element!(f64, Float);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_compatible() {
        assert!(f32::compatible(&DataType::float32().with_endianness(Endianness::native())));
        assert!(!f32::compatible(&DataType::float64()));
        assert!(!u32::compatible(&DataType::int32()));
        assert!(u8::compatible(&DataType::uint8()));
        assert!(!u8::compatible(&DataType::bool()));
        let foreign = match Endianness::native() {
            Endianness::Little => Endianness::Big,
            Endianness::Big => Endianness::Little,
        };
        assert!(!u16::compatible(&DataType::uint16().with_endianness(foreign)));
    }
}
