use indexspace::IndexSpace;
use quickcheck_macros::quickcheck;

fn consistent(space: &IndexSpace) -> bool {
    let popcount = space.validity().count_ones();
    let valid = space.iter_valid().count();
    popcount == space.count()
        && valid == space.count()
        && space.count() + space.free_count() == space.len()
        && space.len() <= space.capacity()
        && (space.len()..space.capacity()).all(|i| !space.is_valid(i))
}

/// `true` allocates, `false` releases the `n`th valid index.
#[quickcheck]
fn count_matches_validity(ops: Vec<(bool, u8)>) -> bool {
    let mut space = IndexSpace::with_capacity(2);
    for (alloc, n) in ops {
        if alloc {
            let expected = space.next_index();
            if space.allocate().index != expected {
                return false;
            }
        } else {
            let nth = space.iter_valid().nth(n as usize % space.count().max(1));
            if let Some(i) = nth {
                if !space.release(i) {
                    return false;
                }
            }
        }
        if !consistent(&space) {
            return false;
        }
    }
    true
}

#[test]
fn reuse_after_release() {
    let mut space = IndexSpace::new();
    let a = space.allocate().index;
    let b = space.allocate().index;
    assert!(space.release(a));
    assert!(!space.is_valid(a));
    assert_eq!(space.allocate().index, a);
    assert!(space.is_valid(b));
    assert_eq!(space.count(), 2);
}

#[test]
fn clear_keeps_capacity() {
    let mut space = IndexSpace::with_capacity(3);
    for _ in 0..10 {
        space.allocate();
    }
    space.release(4);
    let capacity = space.capacity();
    space.clear();
    assert_eq!(space.capacity(), capacity);
    assert_eq!(space.count(), 0);
    assert_eq!(space.free_count(), 0);
    assert_eq!(space.iter_valid().count(), 0);
    assert_eq!(space.allocate().index, 0);
}
