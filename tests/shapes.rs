use polydetail::{
    export::TriangleMesh,
    generate::{self, CubeOptions},
    AttributeId, GeometryStore, Normal, NormalSolver, Position,
};

#[test]
fn quad_fan() {
    let mut store = GeometryStore::<u32>::new(4);
    let v: Vec<u32> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| {
            let p = store.add_point(Position::new(x, y, 0.0)).unwrap();
            store.add_vertex(p).unwrap()
        })
        .collect();
    store.add_primitive(&v).unwrap();

    let mesh = TriangleMesh::from_store(&store).unwrap();
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(mesh.positions.len(), 4);
    assert_eq!(mesh.positions[2], Position::new(1.0, 1.0, 0.0));
    // no vertex normals yet
    assert!(mesh.normals.iter().all(|n| *n == Normal::zeros()));

    NormalSolver::default().solve(&mut store);
    let mesh = TriangleMesh::from_store(&store).unwrap();
    assert!(mesh.normals.iter().all(|n| (n - Normal::z()).norm() < 1e-5));
    assert_eq!(
        mesh.triangles().collect::<Vec<_>>(),
        vec![[0, 1, 2], [0, 2, 3]]
    );
}

#[test]
fn short_primitives_are_skipped() {
    let mut store = GeometryStore::<u32>::new(4);
    let p = store.add_point(Position::origin()).unwrap();
    let v = [store.add_vertex(p).unwrap(), store.add_vertex(p).unwrap()];
    store.add_primitive(&v).unwrap();
    let mesh = TriangleMesh::from_store(&store).unwrap();
    assert_eq!(mesh.triangle_count(), 0);
    assert!(mesh.positions.is_empty());
}

#[test]
fn cube_counts() {
    let mut store = GeometryStore::<u16>::new(0);
    generate::cube(&mut store, 1.0, CubeOptions::default()).unwrap();
    assert_eq!(store.point_count(), 8);
    assert_eq!(store.vertex_count(), 24);
    assert_eq!(store.primitive_count(), 6);
    assert!(!store.has_vertex_attribute(AttributeId::NORMAL));

    // regenerating replaces the previous shape
    let options = CubeOptions {
        normals: true,
        hard_edges: true,
    };
    generate::cube(&mut store, 1.0, options).unwrap();
    assert_eq!(store.point_count(), 24);
    assert_eq!(store.vertex_count(), 24);
    assert_eq!(store.primitive_count(), 6);
    for prim in store.valid_primitives().collect::<Vec<_>>() {
        let normal = store.primitive_attribute::<Normal>(prim, AttributeId::NORMAL);
        assert_eq!(normal.norm(), 1.0);
        for &v in store.primitive_vertices(prim).unwrap() {
            assert_eq!(store.vertex_attribute::<Normal>(v, AttributeId::NORMAL), normal);
        }
    }

    let mesh = TriangleMesh::from_store(&store).unwrap();
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.positions.len(), 24);
}

#[test]
fn cube_rejects_mistyped_normals() {
    let mut store = GeometryStore::<u32>::new(8);
    store
        .add_vertex_attribute::<[f32; 3]>(AttributeId::NORMAL)
        .unwrap();
    let options = CubeOptions {
        normals: true,
        hard_edges: false,
    };
    assert!(generate::cube(&mut store, 1.0, options).is_err());
}

#[test]
fn icosphere_counts() {
    for (subdivisions, points, triangles) in [(0, 12, 20), (1, 42, 80), (2, 162, 320)] {
        let mut store = GeometryStore::<u32>::new(16);
        generate::icosphere(&mut store, 3.0, subdivisions).unwrap();
        assert_eq!(store.point_count(), points);
        assert_eq!(store.primitive_count(), triangles);
        assert_eq!(store.vertex_count(), triangles * 3);
        for p in store.valid_points().collect::<Vec<_>>() {
            let r = store.point_position(p).coords.norm();
            assert!((r - 3.0).abs() < 1e-4);
        }
    }
}

#[test]
fn icosphere_exhausts_narrow_indices() {
    // 320 triangles need 960 vertices
    let mut store = GeometryStore::<u8>::new(16);
    assert!(generate::icosphere(&mut store, 1.0, 2).is_err());
}
