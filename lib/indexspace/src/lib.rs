#![doc = include_str!("../README.md")]

use bitvec::{slice::BitSlice, vec::BitVec};

/// Result of [IndexSpace::allocate].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub index: usize,
    /// The new capacity, if allocating `index` required growing the space.
    pub grown_to: Option<usize>,
}

/// A set of reusable element indices.
///
/// # Invariants
///
/// * `valid.len()` == `capacity`
/// * `len` <= `capacity`
/// * for every `i < len`, exactly one of `valid[i]` and `free.contains(&i)` holds
/// * for every `i >= len`, `valid[i]` is unset
/// * `count` == number of set bits in `valid`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSpace {
    valid: BitVec,
    free: Vec<usize>,
    count: usize,
    len: usize,
}

impl IndexSpace {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            valid: BitVec::repeat(false, capacity),
            ..Self::default()
        }
    }

    /// Number of valid indices.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.count
    }

    /// One past the highest index ever handed out since construction or the last [clear](Self::clear).
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.valid.len()
    }

    /// Number of released indices awaiting reuse.
    #[inline(always)]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// The index the next call to [allocate](Self::allocate) will return.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.free.last().copied().unwrap_or(self.len)
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        self.valid.get(index).is_some_and(|b| *b)
    }

    #[inline(always)]
    pub fn validity(&self) -> &BitSlice {
        &self.valid
    }

    /// Iterate over valid indices in ascending order.
    #[inline]
    pub fn iter_valid(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid.iter_ones()
    }

    /// Mark an index valid and return it.
    ///
    /// The most recently released index is reused first. Otherwise, the next fresh index is used,
    /// doubling capacity as many times as needed to fit it.
    pub fn allocate(&mut self) -> Allocation {
        if let Some(index) = self.free.pop() {
            self.valid.set(index, true);
            self.count += 1;
            return Allocation {
                index,
                grown_to: None,
            };
        }

        let index = self.len;
        let grown_to = (index >= self.capacity()).then(|| {
            let mut capacity = self.capacity().max(1);
            while capacity <= index {
                capacity *= 2;
            }
            tracing::debug!(from = self.capacity(), to = capacity, "growing index space");
            self.valid.resize(capacity, false);
            capacity
        });
        self.valid.set(index, true);
        self.len += 1;
        self.count += 1;
        Allocation { index, grown_to }
    }

    /// Mark an index invalid and queue it for reuse.
    ///
    /// Returns `false` if `index` wasn't valid.
    pub fn release(&mut self, index: usize) -> bool {
        if !self.is_valid(index) {
            return false;
        }
        self.valid.set(index, false);
        self.free.push(index);
        self.count -= 1;
        true
    }

    /// Invalidate every index without changing capacity.
    pub fn clear(&mut self) {
        self.valid.fill(false);
        self.free.clear();
        self.count = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_from_zero() {
        let mut space = IndexSpace::with_capacity(0);
        assert_eq!(
            space.allocate(),
            Allocation {
                index: 0,
                grown_to: Some(1)
            }
        );
        assert_eq!(space.allocate().grown_to, Some(2));
        assert_eq!(space.allocate().grown_to, Some(4));
        assert_eq!(space.allocate().grown_to, None);
        assert_eq!(space.allocate().grown_to, Some(8));
        assert_eq!(space.capacity(), 8);
        assert_eq!(space.len(), 5);
    }

    #[test]
    fn lifo_reuse() {
        let mut space = IndexSpace::with_capacity(4);
        for _ in 0..4 {
            space.allocate();
        }
        assert!(space.release(1));
        assert!(space.release(3));
        assert!(!space.release(3));
        assert_eq!(space.next_index(), 3);
        assert_eq!(space.allocate().index, 3);
        assert_eq!(space.allocate().index, 1);
        assert_eq!(space.allocate().index, 4);
    }
}
