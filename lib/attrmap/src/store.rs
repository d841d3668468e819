use std::collections::HashMap;

use crate::{
    accessor::{AttributeAccessor, AttributeAccessorMut},
    Attribute, AttributeError, AttributeId, TypeTag,
};

/// Layout information about one registered attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMetadata {
    /// Bytes per element.
    pub stride: usize,
    /// Number of elements.
    pub len: usize,
    pub tag: TypeTag,
}

#[derive(Debug, Clone)]
struct AttributeEntry {
    bytes: Vec<u8>,
    len: usize,
    tag: TypeTag,
}

impl AttributeEntry {
    fn new(tag: TypeTag, len: usize) -> Self {
        Self {
            bytes: vec![0; tag.size() * len],
            len,
            tag,
        }
    }

    #[inline]
    fn stride(&self) -> usize {
        self.tag.size()
    }

    /// Preserves the first `min(self.len, len)` elements; new elements are zeroed.
    fn resize(&mut self, len: usize) {
        self.bytes.resize(self.stride() * len, 0);
        self.len = len;
    }

    #[inline]
    fn check<T: Attribute>(&self, id: AttributeId) -> Result<(), AttributeError> {
        if self.tag.is::<T>() {
            Ok(())
        } else {
            Err(AttributeError::TypeMismatch {
                id,
                expected: self.tag,
                found: TypeTag::of::<T>(),
            })
        }
    }
}

/// A set of type-erased, per-element attribute buffers, keyed by [AttributeId].
///
/// Each entry is a contiguous run of `len` elements of one [Attribute] type. The store itself
/// attaches no meaning to element indices; its owner decides what they refer to and keeps every
/// entry sized to match (see [resize_all](Self::resize_all)).
///
/// Failed operations never modify the store.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    entries: HashMap<AttributeId, AttributeEntry>,
}

impl AttributeStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new attribute holding `len` zeroed elements of type `T`.
    pub fn register<T: Attribute>(
        &mut self,
        id: AttributeId,
        len: usize,
    ) -> Result<(), AttributeError> {
        use std::collections::hash_map::Entry;
        match self.entries.entry(id) {
            Entry::Occupied(_) => Err(AttributeError::AlreadyExists(id)),
            Entry::Vacant(v) => {
                let tag = TypeTag::of::<T>();
                tracing::trace!(%id, %tag, len, "registering attribute");
                v.insert(AttributeEntry::new(tag, len));
                Ok(())
            }
        }
    }

    /// Resize a registered attribute to hold `len` elements, preserving the first
    /// `min(old_len, len)` of them. New elements are zeroed.
    pub fn resize<T: Attribute>(
        &mut self,
        id: AttributeId,
        len: usize,
    ) -> Result<(), AttributeError> {
        let entry = self.entry_mut(id)?;
        entry.check::<T>(id)?;
        entry.resize(len);
        Ok(())
    }

    /// Resize every registered attribute to hold `len` elements, regardless of type.
    pub fn resize_all(&mut self, len: usize) {
        if !self.entries.is_empty() {
            tracing::trace!(attributes = self.entries.len(), len, "resizing all attributes");
        }
        for entry in self.entries.values_mut() {
            entry.resize(len);
        }
    }

    /// Zero element `index` of every attribute long enough to hold it.
    pub fn reset_element(&mut self, index: usize) {
        for entry in self.entries.values_mut() {
            if index < entry.len {
                let stride = entry.stride();
                entry.bytes[index * stride..(index + 1) * stride].fill(0);
            }
        }
    }

    /// Remove a registered attribute, releasing its buffer.
    pub fn remove(&mut self, id: AttributeId) -> Result<(), AttributeError> {
        match self.entries.remove(&id) {
            Some(_) => {
                tracing::trace!(%id, "removed attribute");
                Ok(())
            }
            None => Err(AttributeError::NotFound(id)),
        }
    }

    #[inline]
    pub fn contains(&self, id: AttributeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn metadata(&self, id: AttributeId) -> Option<AttributeMetadata> {
        self.entries.get(&id).map(|e| AttributeMetadata {
            stride: e.stride(),
            len: e.len,
            tag: e.tag,
        })
    }

    /// Ids of all registered attributes, in ascending order.
    pub fn ids(&self) -> Vec<AttributeId> {
        let mut res: Vec<AttributeId> = self.entries.keys().copied().collect();
        res.sort_unstable();
        res
    }

    /// Number of registered attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every attribute, releasing all buffers.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.shrink_to_fit();
    }

    /// Get a typed view of a registered attribute.
    pub fn accessor<T: Attribute>(
        &self,
        id: AttributeId,
    ) -> Result<AttributeAccessor<'_, T>, AttributeError> {
        let entry = self.entry(id)?;
        entry.check::<T>(id)?;
        Ok(AttributeAccessor::new(&entry.bytes, entry.len))
    }

    /// Get a typed, mutable view of a registered attribute.
    pub fn accessor_mut<T: Attribute>(
        &mut self,
        id: AttributeId,
    ) -> Result<AttributeAccessorMut<'_, T>, AttributeError> {
        let entry = self.entry_mut(id)?;
        entry.check::<T>(id)?;
        Ok(AttributeAccessorMut::new(&mut entry.bytes, entry.len))
    }

    /// Copy one element out of a registered attribute.
    pub fn get<T: Attribute>(&self, id: AttributeId, index: usize) -> Result<T, AttributeError> {
        let acc = self.accessor::<T>(id)?;
        acc.try_get(index).ok_or(AttributeError::IndexOutOfRange {
            id,
            index,
            len: acc.len(),
        })
    }

    /// Overwrite one element of a registered attribute.
    pub fn set<T: Attribute>(
        &mut self,
        id: AttributeId,
        index: usize,
        value: T,
    ) -> Result<(), AttributeError> {
        let mut acc = self.accessor_mut::<T>(id)?;
        if acc.try_set(index, value) {
            Ok(())
        } else {
            Err(AttributeError::IndexOutOfRange {
                id,
                index,
                len: acc.len(),
            })
        }
    }

    #[inline]
    fn entry(&self, id: AttributeId) -> Result<&AttributeEntry, AttributeError> {
        self.entries.get(&id).ok_or(AttributeError::NotFound(id))
    }

    #[inline]
    fn entry_mut(&mut self, id: AttributeId) -> Result<&mut AttributeEntry, AttributeError> {
        self.entries.get_mut(&id).ok_or(AttributeError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_resize_leaves_entry_alone() {
        let mut store = AttributeStore::new();
        store.register::<u32>(AttributeId(20), 3).unwrap();
        store.set(AttributeId(20), 2, 11u32).unwrap();
        assert!(store.resize::<f32>(AttributeId(20), 10).is_err());
        let meta = store.metadata(AttributeId(20)).unwrap();
        assert_eq!(meta.len, 3);
        assert_eq!(meta.stride, 4);
        assert_eq!(store.get::<u32>(AttributeId(20), 2), Ok(11));
    }

    #[test]
    fn reset_element_zeroes_every_entry() {
        let mut store = AttributeStore::new();
        store.register::<u8>(AttributeId(1), 2).unwrap();
        store.register::<[f64; 2]>(AttributeId(2), 4).unwrap();
        store.set(AttributeId(1), 1, 3u8).unwrap();
        store.set(AttributeId(2), 1, [1.0f64, 2.0]).unwrap();
        store.set(AttributeId(2), 3, [5.0f64, 6.0]).unwrap();

        store.reset_element(1);
        store.reset_element(3);
        assert_eq!(store.get::<u8>(AttributeId(1), 1), Ok(0));
        assert_eq!(store.get::<[f64; 2]>(AttributeId(2), 1), Ok([0.0; 2]));
        assert_eq!(store.get::<[f64; 2]>(AttributeId(2), 3), Ok([0.0; 2]));
    }

    #[test]
    fn ids_are_sorted() {
        let mut store = AttributeStore::new();
        for id in [7, 1, 4] {
            store.register::<u8>(AttributeId(id), 0).unwrap();
        }
        assert_eq!(
            store.ids(),
            vec![AttributeId(1), AttributeId(4), AttributeId(7)]
        );
    }
}
