use std::hash::Hash;

use num_traits::{AsPrimitive, PrimInt};

pub mod macros;

/// Trait for types which can act as element indices within a geometry store (or any other
/// array-like structure).
///
/// Implemented for every primitive integer; unsigned types are the intended use.
pub trait ArrayIndex:
    PrimInt + AsPrimitive<usize> + Default + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Widen `self` to a `usize` suitable for indexing a slice.
    #[inline(always)]
    fn to_index(self) -> usize {
        <Self as AsPrimitive<usize>>::as_(self)
    }

    /// Narrow a `usize` into `Self`, or `None` if it isn't representable.
    #[inline]
    fn from_index(index: usize) -> Option<Self> {
        num_traits::cast::<usize, Self>(index)
    }
}

impl<P> ArrayIndex for P where
    P: PrimInt + AsPrimitive<usize> + Default + Hash + Send + Sync + std::fmt::Debug + 'static
{
}

#[cfg(test)]
mod tests {
    use super::ArrayIndex;

    #[test]
    fn narrowing() {
        assert_eq!(u8::from_index(255), Some(255u8));
        assert_eq!(u8::from_index(256), None);
        assert_eq!(u16::from_index(70_000), None);
        assert_eq!(u32::from_index(70_000), Some(70_000u32));
        assert_eq!(42u64.to_index(), 42usize);
    }
}
