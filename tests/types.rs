use polydetail::{GeometryStore, Position};

/// Ensure that GeometryStores can compile with any unsigned index type with width <= `size_of::`<usize>
#[test]
#[allow(clippy::just_underscores_and_digits)]
fn store_index() {
    let _8 = GeometryStore::<u8>::new(4);
    let _16 = GeometryStore::<u16>::new(4);
    #[cfg(not(target_pointer_width = "16"))]
    {
        // size_of::<usize>() > 16
        let _32 = GeometryStore::<u32>::new(4);
        #[cfg(not(target_pointer_width = "32"))]
        {
            // size_of::<usize>() > 32
            let _64 = GeometryStore::<u64>::new(4);
        }
    }
    let _size = GeometryStore::<usize>::new(4);
}

#[test]
fn narrow_index_exhaustion() {
    let mut store = GeometryStore::<u8>::new(0);
    for i in 0..=255u8 {
        assert_eq!(store.add_point(Position::new(i as f32, 0.0, 0.0)), Some(i));
    }
    assert_eq!(store.add_point(Position::origin()), None);
    assert_eq!(store.point_count(), 256);

    // a freed index is still representable
    assert!(store.remove_point(17));
    assert_eq!(store.add_point(Position::origin()), Some(17));
    assert_eq!(store.add_point(Position::origin()), None);
}
