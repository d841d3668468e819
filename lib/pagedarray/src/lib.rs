#![doc = include_str!("../README.md")]

use std::ops::Range;

/// Location of one row within the backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RowDesc {
    offset: usize,
    len: usize,
    capacity: usize,
}

impl RowDesc {
    #[inline(always)]
    fn elements(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    #[inline(always)]
    fn end(&self) -> usize {
        self.offset + self.capacity
    }

    #[inline(always)]
    fn is_full(&self) -> bool {
        self.len == self.capacity
    }
}

/// A collection of growable rows sharing one backing buffer.
///
/// # Invariants
///
/// * every row's slice `[offset, offset + capacity)` lies within `storage`, and no two rows' slices
///   overlap
/// * `storage.len()` == sum of all row capacities + `orphaned`
/// * the current row, if any, is the most recently created or relocated row
#[derive(Debug, Clone)]
pub struct PagedArray<T> {
    storage: Vec<T>,
    rows: Vec<RowDesc>,
    current: Option<usize>,
    default_row_capacity: usize,
    orphaned: usize,
}

impl<T: Copy + Default> Default for PagedArray<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROW_CAPACITY)
    }
}

impl<T: Copy + Default> PagedArray<T> {
    pub const DEFAULT_ROW_CAPACITY: usize = 8;

    /// Construct an empty PagedArray whose rows start with `default_row_capacity` slots and grow
    /// by that much at a time.
    pub fn new(default_row_capacity: usize) -> Self {
        Self {
            storage: Vec::new(),
            rows: Vec::new(),
            current: None,
            default_row_capacity,
            orphaned: 0,
        }
    }

    /// Construct an empty PagedArray with room for `rows` rows of the default capacity.
    pub fn with_capacity(rows: usize, default_row_capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(rows * default_row_capacity),
            rows: Vec::with_capacity(rows),
            current: None,
            default_row_capacity,
            orphaned: 0,
        }
    }

    #[inline(always)]
    pub fn default_row_capacity(&self) -> usize {
        self.default_row_capacity
    }

    /// Number of rows ever created.
    #[inline(always)]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The row targeted by [append](Self::append).
    #[inline(always)]
    pub fn current_row(&self) -> Option<usize> {
        self.current
    }

    /// Total length of the backing storage, including orphaned slices.
    #[inline(always)]
    pub fn storage_len(&self) -> usize {
        self.storage.len()
    }

    /// Number of storage slots no longer owned by any row.
    #[inline(always)]
    pub fn orphaned_len(&self) -> usize {
        self.orphaned
    }

    /// Allocate a new, empty row at the end of storage and make it the current row.
    ///
    /// Returns the id of the new row.
    pub fn create_row(&mut self, capacity: Option<usize>) -> usize {
        let capacity = capacity.unwrap_or(self.default_row_capacity);
        let offset = self.storage.len();
        self.storage.resize(offset + capacity, T::default());
        let id = self.rows.len();
        self.rows.push(RowDesc {
            offset,
            len: 0,
            capacity,
        });
        self.current = Some(id);
        id
    }

    /// Append `value` to the current row.
    ///
    /// Returns `false` if no row has been created.
    #[inline]
    pub fn append(&mut self, value: T) -> bool {
        match self.current {
            Some(row) => self.append_at(row, value),
            None => false,
        }
    }

    /// Append `value` to the end of `row`.
    ///
    /// A full row at the tail of storage grows in place. A full row anywhere else is relocated to
    /// a slice of twice its capacity at the tail, and becomes the current row.
    ///
    /// Returns `false` if `row` doesn't exist.
    pub fn append_at(&mut self, row: usize, value: T) -> bool {
        let Some(desc) = self.rows.get(row).copied() else {
            return false;
        };
        if desc.is_full() {
            if desc.end() == self.storage.len() {
                self.grow_tail(row);
            } else {
                self.relocate(row);
            }
        }
        let desc = &mut self.rows[row];
        self.storage[desc.offset + desc.len] = value;
        desc.len += 1;
        true
    }

    fn grow_tail(&mut self, row: usize) {
        let additional = self.default_row_capacity.max(1);
        let len = self.storage.len();
        self.storage.resize(len + additional, T::default());
        self.rows[row].capacity += additional;
    }

    fn relocate(&mut self, row: usize) {
        let old = self.rows[row];
        let capacity = (old.capacity * 2).max(self.default_row_capacity).max(1);
        let offset = self.storage.len();
        self.storage.extend_from_within(old.elements());
        self.storage.resize(offset + capacity, T::default());
        self.orphaned += old.capacity;
        self.rows[row] = RowDesc {
            offset,
            len: old.len,
            capacity,
        };
        self.current = Some(row);
        tracing::trace!(
            row,
            from = old.offset,
            to = offset,
            capacity,
            "relocated row"
        );
    }

    /// Remove the element at `element` from `row`, shifting everything after it left by one.
    ///
    /// Returns `false` if either index is out of range.
    pub fn remove_at(&mut self, row: usize, element: usize) -> bool {
        let Some(desc) = self.rows.get_mut(row) else {
            return false;
        };
        if element >= desc.len {
            return false;
        }
        let start = desc.offset + element;
        self.storage
            .copy_within(start + 1..desc.offset + desc.len, start);
        desc.len -= 1;
        true
    }

    /// Set the length of `row` to 0, keeping its slice for reuse.
    pub fn clear_row(&mut self, row: usize) -> bool {
        match self.rows.get_mut(row) {
            Some(desc) => {
                desc.len = 0;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn len_of(&self, row: usize) -> Option<usize> {
        self.rows.get(row).map(|d| d.len)
    }

    #[inline]
    pub fn capacity_of(&self, row: usize) -> Option<usize> {
        self.rows.get(row).map(|d| d.capacity)
    }

    /// The elements of `row`, in order.
    #[inline]
    pub fn row(&self, row: usize) -> Option<&[T]> {
        self.rows.get(row).map(|d| &self.storage[d.elements()])
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> Option<&mut [T]> {
        self.rows.get(row).map(|d| &mut self.storage[d.elements()])
    }

    #[inline]
    pub fn get(&self, row: usize, element: usize) -> Option<&T> {
        self.row(row)?.get(element)
    }

    /// Overwrite one element of `row`. Returns `false` if either index is out of range.
    pub fn set(&mut self, row: usize, element: usize, value: T) -> bool {
        match self.row_mut(row).and_then(|r| r.get_mut(element)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Iterate over all rows in id order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.rows.iter().map(|d| &self.storage[d.elements()])
    }

    /// Rebuild storage without orphaned slices.
    ///
    /// Row ids and capacities are preserved; the current row is placed last so that it stays
    /// at the tail.
    pub fn compact(&mut self) {
        if self.orphaned == 0 {
            return;
        }
        let mut storage = Vec::with_capacity(self.storage.len() - self.orphaned);
        let order = (0..self.rows.len())
            .filter(|&r| Some(r) != self.current)
            .chain(self.current);
        for row in order {
            let desc = &mut self.rows[row];
            let offset = storage.len();
            storage.extend_from_slice(&self.storage[desc.elements()]);
            storage.resize(offset + desc.capacity, T::default());
            desc.offset = offset;
        }
        tracing::debug!(
            reclaimed = self.orphaned,
            storage = storage.len(),
            "compacted paged array"
        );
        self.storage = storage;
        self.orphaned = 0;
    }

    /// Remove all rows and release storage.
    pub fn clear(&mut self) {
        self.storage = Vec::new();
        self.rows = Vec::new();
        self.current = None;
        self.orphaned = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_grows_in_place() {
        let mut arr = PagedArray::<u32>::new(2);
        let row = arr.create_row(None);
        for i in 0..5 {
            assert!(arr.append(i));
        }
        assert_eq!(arr.row(row), Some(&[0, 1, 2, 3, 4][..]));
        assert_eq!(arr.orphaned_len(), 0);
        assert_eq!(arr.capacity_of(row), Some(6));
        assert_eq!(arr.storage_len(), 6);
    }

    #[test]
    fn append_without_rows() {
        let mut arr = PagedArray::<u32>::default();
        assert!(!arr.append(1));
        assert!(!arr.append_at(0, 1));
        assert_eq!(arr.current_row(), None);
    }

    #[test]
    fn zero_capacity_rows() {
        let mut arr = PagedArray::<u8>::new(0);
        let a = arr.create_row(None);
        let b = arr.create_row(Some(0));
        // both rows start out empty at offset 0
        assert!(arr.append_at(a, 1));
        assert!(arr.append_at(b, 2));
        assert!(arr.append_at(a, 3));
        assert_eq!(arr.row(a), Some(&[1, 3][..]));
        assert_eq!(arr.row(b), Some(&[2][..]));
    }
}
