use pagedarray::PagedArray;
use quickcheck_macros::quickcheck;

#[test]
fn relocation_keeps_order_and_id() {
    let mut arr = PagedArray::<i32>::new(4);
    let a = arr.create_row(None);
    for i in 0..4 {
        assert!(arr.append(i));
    }
    let b = arr.create_row(None);
    assert!(arr.append(100));
    assert_eq!(arr.current_row(), Some(b));

    // `a` is full and no longer at the tail
    assert!(arr.append_at(a, 4));
    assert_eq!(arr.row(a), Some(&[0, 1, 2, 3, 4][..]));
    assert_eq!(arr.capacity_of(a), Some(8));
    assert_eq!(arr.orphaned_len(), 4);
    assert_eq!(arr.current_row(), Some(a));
    assert_eq!(arr.row(b), Some(&[100][..]));

    // `append` now targets the relocated row
    assert!(arr.append(5));
    assert_eq!(arr.len_of(a), Some(6));
    assert_eq!(arr.len_of(b), Some(1));
}

#[test]
fn remove_shifts_left() {
    let mut arr = PagedArray::<u8>::default();
    let row = arr.create_row(None);
    for v in [10, 20, 30, 40] {
        arr.append(v);
    }
    assert!(arr.remove_at(row, 1));
    assert_eq!(arr.row(row), Some(&[10, 30, 40][..]));
    assert!(arr.remove_at(row, 2));
    assert_eq!(arr.row(row), Some(&[10, 30][..]));
    assert!(!arr.remove_at(row, 2));
    assert!(!arr.remove_at(row + 1, 0));
}

#[test]
fn out_of_range() {
    let mut arr = PagedArray::<u16>::default();
    assert_eq!(arr.len_of(0), None);
    assert_eq!(arr.row(0), None);
    assert_eq!(arr.get(0, 0), None);
    assert!(!arr.set(0, 0, 1));
    assert!(!arr.clear_row(0));

    let row = arr.create_row(Some(1));
    assert_eq!(arr.get(row, 0), None);
    assert!(arr.append(7));
    assert_eq!(arr.get(row, 0), Some(&7));
    assert!(arr.set(row, 0, 8));
    assert_eq!(arr.get(row, 0), Some(&8));
}

#[test]
fn cleared_rows_are_reused_in_place() {
    let mut arr = PagedArray::<u32>::new(3);
    let a = arr.create_row(None);
    arr.append_at(a, 1);
    arr.append_at(a, 2);
    let _b = arr.create_row(None);
    let storage = arr.storage_len();

    assert!(arr.clear_row(a));
    assert_eq!(arr.len_of(a), Some(0));
    for v in [7, 8, 9] {
        assert!(arr.append_at(a, v));
    }
    assert_eq!(arr.row(a), Some(&[7, 8, 9][..]));
    assert_eq!(arr.storage_len(), storage);
    assert_eq!(arr.orphaned_len(), 0);
}

#[test]
fn compact_drops_orphans() {
    let mut arr = PagedArray::<u32>::new(2);
    let rows: Vec<usize> = (0..4).map(|_| arr.create_row(None)).collect();
    for round in 0..5u32 {
        for &row in &rows {
            arr.append_at(row, round * 10 + row as u32);
        }
    }
    assert!(arr.orphaned_len() > 0);
    let before: Vec<Vec<u32>> = arr.rows().map(<[u32]>::to_vec).collect();
    let current = arr.current_row();

    arr.compact();
    assert_eq!(arr.orphaned_len(), 0);
    assert_eq!(arr.current_row(), current);
    let after: Vec<Vec<u32>> = arr.rows().map(<[u32]>::to_vec).collect();
    assert_eq!(before, after);

    // the current row sits at the tail, so it grows without relocating
    let orphaned = arr.orphaned_len();
    let current = current.unwrap();
    while arr.len_of(current) < arr.capacity_of(current) {
        arr.append(0);
    }
    arr.append(0);
    assert_eq!(arr.orphaned_len(), orphaned);
}

#[test]
fn clone_is_deep() {
    let mut arr = PagedArray::<u8>::default();
    let row = arr.create_row(None);
    arr.append(1);
    let copy = arr.clone();
    arr.set(row, 0, 2);
    arr.clear();
    assert_eq!(arr.row_count(), 0);
    assert_eq!(copy.row(row), Some(&[1][..]));
}

/// Any interleaving of appends and removals across rows matches a `Vec<Vec<_>>` model.
#[quickcheck]
fn matches_nested_vecs(ops: Vec<(u8, u8, bool)>) -> bool {
    const ROWS: usize = 5;
    let mut arr = PagedArray::<u8>::new(2);
    let mut model: Vec<Vec<u8>> = vec![Vec::new(); ROWS];
    for _ in 0..ROWS {
        arr.create_row(Some(1));
    }
    for (row, value, remove) in ops {
        let row = row as usize % ROWS;
        if remove {
            let len = model[row].len();
            let expected = len > 0;
            if expected {
                model[row].remove(value as usize % len);
            }
            let element = if expected { value as usize % len } else { 0 };
            if arr.remove_at(row, element) != expected {
                return false;
            }
        } else {
            model[row].push(value);
            if !arr.append_at(row, value) {
                return false;
            }
        }
    }
    arr.rows().eq(model.iter().map(Vec::as_slice))
}
