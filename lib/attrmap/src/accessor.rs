//! Typed views of type-erased attribute buffers.
//!
//! Attribute buffers are plain byte vectors with no alignment guarantee beyond that of `u8`, so
//! elements are copied in and out with unaligned reads and writes. Use
//! [`try_as_slice`](AttributeAccessor::try_as_slice) when a borrowed `&[T]` is needed and the
//! buffer happens to be suitably aligned.

use std::{fmt, marker::PhantomData, mem, ptr};

use crate::Attribute;

#[inline(always)]
#[allow(unsafe_code)]
fn read<T: Attribute>(bytes: &[u8]) -> T {
    debug_assert_eq!(bytes.len(), mem::size_of::<T>());
    // every bit pattern is a valid `T`, and `bytes` covers exactly one `T`
    unsafe { ptr::read_unaligned(bytes.as_ptr().cast::<T>()) }
}

#[inline(always)]
#[allow(unsafe_code)]
fn write<T: Attribute>(bytes: &mut [u8], value: T) {
    debug_assert_eq!(bytes.len(), mem::size_of::<T>());
    unsafe { ptr::write_unaligned(bytes.as_mut_ptr().cast::<T>(), value) }
}

#[inline]
#[allow(unsafe_code)]
fn aligned_slice<T>(bytes: &[u8], len: usize) -> Option<&[T]> {
    if bytes.as_ptr() as usize % mem::align_of::<T>() != 0 {
        return None;
    }
    // aligned, in bounds, and any bit pattern is valid
    Some(unsafe { std::slice::from_raw_parts(bytes.as_ptr().cast::<T>(), len) })
}

/// A typed, read-only view of the elements of one attribute.
///
/// Created by [AttributeStore::accessor](crate::AttributeStore::accessor) after a single type
/// check; accesses through the view don't repeat it.
pub struct AttributeAccessor<'data, T> {
    bytes: &'data [u8],
    len: usize,
    _ty: PhantomData<T>,
}

impl<T> Clone for AttributeAccessor<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AttributeAccessor<'_, T> {}

impl<T> fmt::Debug for AttributeAccessor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeAccessor")
            .field("type", &std::any::type_name::<T>())
            .field("len", &self.len)
            .finish()
    }
}

impl<'data, T: Attribute> AttributeAccessor<'data, T> {
    /// # Panics
    ///
    /// * if `bytes.len() != len * size_of::<T>()`
    pub(crate) fn new(bytes: &'data [u8], len: usize) -> Self {
        assert_eq!(bytes.len(), len * mem::size_of::<T>());
        Self {
            bytes,
            len,
            _ty: PhantomData,
        }
    }

    /// Number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the element at `index`.
    ///
    /// # Panics
    ///
    /// * `index` >= `self.len()`
    #[inline]
    pub fn get(&self, index: usize) -> T {
        debug_assert!(
            index < self.len,
            "attribute index {index} out of range (len {})",
            self.len
        );
        let stride = mem::size_of::<T>();
        let start = index * stride;
        read(&self.bytes[start..start + stride])
    }

    #[inline]
    pub fn try_get(&self, index: usize) -> Option<T> {
        (index < self.len).then(|| self.get(index))
    }

    /// Get the element at `index` without bounds checks.
    ///
    /// # Safety
    ///
    /// * `index` < `self.len()`
    #[inline]
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        unsafe {
            ptr::read_unaligned(
                self.bytes
                    .as_ptr()
                    .add(index * mem::size_of::<T>())
                    .cast::<T>(),
            )
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + 'data {
        let this = *self;
        (0..this.len).map(move |i| this.get(i))
    }

    /// Borrow the elements as a slice, if the underlying buffer is aligned for `T`.
    #[inline]
    pub fn try_as_slice(&self) -> Option<&'data [T]> {
        aligned_slice(self.bytes, self.len)
    }
}

/// A typed, mutable view of the elements of one attribute.
///
/// Disjoint halves obtained through [split_at_mut](Self::split_at_mut) may be written from
/// different threads.
pub struct AttributeAccessorMut<'data, T> {
    bytes: &'data mut [u8],
    len: usize,
    _ty: PhantomData<T>,
}

impl<T> fmt::Debug for AttributeAccessorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeAccessorMut")
            .field("type", &std::any::type_name::<T>())
            .field("len", &self.len)
            .finish()
    }
}

impl<'data, T: Attribute> AttributeAccessorMut<'data, T> {
    /// # Panics
    ///
    /// * if `bytes.len() != len * size_of::<T>()`
    pub(crate) fn new(bytes: &'data mut [u8], len: usize) -> Self {
        assert_eq!(bytes.len(), len * mem::size_of::<T>());
        Self {
            bytes,
            len,
            _ty: PhantomData,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reborrow as a read-only view.
    #[inline]
    pub fn as_accessor(&self) -> AttributeAccessor<'_, T> {
        AttributeAccessor::new(self.bytes, self.len)
    }

    #[inline]
    pub fn into_accessor(self) -> AttributeAccessor<'data, T> {
        AttributeAccessor::new(self.bytes, self.len)
    }

    /// # Panics
    ///
    /// * `index` >= `self.len()`
    #[inline]
    pub fn get(&self, index: usize) -> T {
        self.as_accessor().get(index)
    }

    #[inline]
    pub fn try_get(&self, index: usize) -> Option<T> {
        self.as_accessor().try_get(index)
    }

    /// Overwrite the element at `index`.
    ///
    /// # Panics
    ///
    /// * `index` >= `self.len()`
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        debug_assert!(
            index < self.len,
            "attribute index {index} out of range (len {})",
            self.len
        );
        let stride = mem::size_of::<T>();
        let start = index * stride;
        write(&mut self.bytes[start..start + stride], value);
    }

    /// Overwrite the element at `index`, returning `false` if it's out of range.
    #[inline]
    pub fn try_set(&mut self, index: usize, value: T) -> bool {
        if index >= self.len {
            return false;
        }
        self.set(index, value);
        true
    }

    /// # Safety
    ///
    /// * `index` < `self.len()`
    #[inline]
    #[allow(unsafe_code)]
    pub unsafe fn set_unchecked(&mut self, index: usize, value: T) {
        unsafe {
            ptr::write_unaligned(
                self.bytes
                    .as_mut_ptr()
                    .add(index * mem::size_of::<T>())
                    .cast::<T>(),
                value,
            )
        }
    }

    pub fn fill(&mut self, value: T) {
        for i in 0..self.len {
            self.set(i, value);
        }
    }

    /// Divide `self` into views of `[0, mid)` and `[mid, len)`. Indices into the second view
    /// are relative to `mid`.
    ///
    /// # Panics
    ///
    /// * `mid` > `self.len()`
    pub fn split_at_mut(self, mid: usize) -> (Self, Self) {
        assert!(mid <= self.len, "split point {mid} beyond len {}", self.len);
        let len = self.len;
        let (lo, hi) = self.bytes.split_at_mut(mid * mem::size_of::<T>());
        (Self::new(lo, mid), Self::new(hi, len - mid))
    }

    #[inline]
    #[allow(unsafe_code)]
    pub fn try_as_mut_slice(&mut self) -> Option<&mut [T]> {
        if self.bytes.as_ptr() as usize % mem::align_of::<T>() != 0 {
            return None;
        }
        Some(unsafe {
            std::slice::from_raw_parts_mut(self.bytes.as_mut_ptr().cast::<T>(), self.len)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaligned_round_trip() {
        // offset by one byte so that `f32` reads are guaranteed to be unaligned somewhere
        let mut storage = vec![0u8; 1 + 3 * 4];
        let mut acc = AttributeAccessorMut::<f32>::new(&mut storage[1..], 3);
        acc.set(0, 1.5);
        acc.set(2, -4.0);
        assert_eq!(acc.get(0), 1.5);
        assert_eq!(acc.get(1), 0.0);
        assert_eq!(acc.get(2), -4.0);
        assert_eq!(acc.try_get(3), None);
        assert!(!acc.try_set(3, 1.0));
        assert_eq!(acc.as_accessor().iter().collect::<Vec<_>>(), vec![1.5, 0.0, -4.0]);
    }

    #[test]
    fn split_halves_are_disjoint() {
        let mut storage = vec![0u8; 4 * 4];
        let acc = AttributeAccessorMut::<u32>::new(&mut storage, 4);
        let (mut lo, mut hi) = acc.split_at_mut(1);
        lo.fill(7);
        hi.fill(9);
        assert_eq!(lo.len(), 1);
        assert_eq!(hi.len(), 3);
        let all = AttributeAccessor::<u32>::new(&storage, 4);
        assert_eq!(all.iter().collect::<Vec<_>>(), vec![7, 9, 9, 9]);
    }

    #[test]
    #[should_panic]
    fn out_of_range_get_panics() {
        let storage = vec![0u8; 2 * 2];
        let acc = AttributeAccessor::<u16>::new(&storage, 2);
        let _ = acc.get(2);
    }
}
