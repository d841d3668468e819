//! Procedural shapes built through the public [GeometryStore] API.

use std::collections::HashMap;

use attrmap::{AttributeId, Normal, Position};
use nalgebra::Vector3;
use polydetail_common::ArrayIndex;

use crate::{error::GenerateError, GeometryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CubeOptions {
    /// Write face normals to the vertex and primitive [Normal](AttributeId::NORMAL) attributes.
    pub normals: bool,
    /// Give each face its own 4 points instead of sharing 8 corner points.
    pub hard_edges: bool,
}

/// Corners of the unit cube centered on the origin, scaled by 2.
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Corner indices of each face, wound so that `cross(c1 - c0, c2 - c0)` points outwards, and
/// the matching outward normal.
const CUBE_FACES: [([usize; 4], [f32; 3]); 6] = [
    ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([3, 7, 6, 2], [0.0, 1.0, 0.0]),
    ([0, 4, 7, 3], [-1.0, 0.0, 0.0]),
    ([1, 2, 6, 5], [1.0, 0.0, 0.0]),
];

/// Replace the contents of `store` with an axis-aligned cube of edge length `size`, centered on the
/// origin, made of 6 quads.
pub fn cube<Idx: ArrayIndex>(
    store: &mut GeometryStore<Idx>,
    size: f32,
    options: CubeOptions,
) -> Result<(), GenerateError> {
    store.clear();
    if options.normals {
        ensure_normals(store)?;
    }
    let half = size * 0.5;
    let add_corner = |store: &mut GeometryStore<Idx>, c: usize| {
        let [x, y, z] = CUBE_CORNERS[c];
        store
            .add_point(Position::new(x * half, y * half, z * half))
            .ok_or(GenerateError::IndexExhausted)
    };

    let shared = if options.hard_edges {
        None
    } else {
        let mut points = [Idx::zero(); 8];
        for (c, point) in points.iter_mut().enumerate() {
            *point = add_corner(store, c)?;
        }
        Some(points)
    };

    for (corners, normal) in CUBE_FACES {
        let normal = Normal::from(normal);
        let mut vertices = [Idx::zero(); 4];
        for (vertex, c) in vertices.iter_mut().zip(corners) {
            let point = match shared {
                Some(points) => points[c],
                None => add_corner(store, c)?,
            };
            *vertex = store
                .add_vertex(point)
                .ok_or(GenerateError::IndexExhausted)?;
            if options.normals {
                store.set_vertex_attribute(*vertex, AttributeId::NORMAL, normal);
            }
        }
        let prim = store
            .add_primitive(&vertices)
            .ok_or(GenerateError::IndexExhausted)?;
        if options.normals {
            store.set_primitive_attribute(prim, AttributeId::NORMAL, normal);
        }
    }
    tracing::debug!(
        points = store.point_count(),
        vertices = store.vertex_count(),
        "generated cube"
    );
    Ok(())
}

/// Register vertex and primitive normals, unless they already exist.
fn ensure_normals<Idx: ArrayIndex>(store: &mut GeometryStore<Idx>) -> Result<(), GenerateError> {
    if !store.has_vertex_attribute(AttributeId::NORMAL) {
        store.add_vertex_attribute::<Normal>(AttributeId::NORMAL)?;
    }
    if !store.has_primitive_attribute(AttributeId::NORMAL) {
        store.add_primitive_attribute::<Normal>(AttributeId::NORMAL)?;
    }
    // fail early if either exists with another type
    store.vertex_attribute_accessor::<Normal>(AttributeId::NORMAL)?;
    store.primitive_attribute_accessor::<Normal>(AttributeId::NORMAL)?;
    Ok(())
}

/// Replace the contents of `store` with a geodesic sphere of `radius`, centered on the origin.
///
/// Starts from an icosahedron and splits every triangle into 4, `subdivisions` times. Points are
/// shared between neighbouring triangles; every triangle has its own 3 vertices.
pub fn icosphere<Idx: ArrayIndex>(
    store: &mut GeometryStore<Idx>,
    radius: f32,
    subdivisions: u32,
) -> Result<(), GenerateError> {
    store.clear();

    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let mut positions: Vec<Vector3<f32>> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(|p| Vector3::from(p).normalize())
    .collect();

    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |a: usize, b: usize| {
            *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                positions.push(((positions[a] + positions[b]) * 0.5).normalize());
                positions.len() - 1
            })
        };
        faces = faces
            .iter()
            .flat_map(|&[x, y, z]| {
                let a = midpoint(x, y);
                let b = midpoint(y, z);
                let c = midpoint(z, x);
                [[x, a, c], [y, b, a], [z, c, b], [a, b, c]]
            })
            .collect();
    }

    let mut points = Vec::with_capacity(positions.len());
    for p in &positions {
        let point = store
            .add_point(Position::from(p * radius))
            .ok_or(GenerateError::IndexExhausted)?;
        points.push(point);
    }
    for face in &faces {
        let mut vertices = [Idx::zero(); 3];
        for (vertex, &corner) in vertices.iter_mut().zip(face) {
            *vertex = store
                .add_vertex(points[corner])
                .ok_or(GenerateError::IndexExhausted)?;
        }
        store
            .add_primitive(&vertices)
            .ok_or(GenerateError::IndexExhausted)?;
    }
    tracing::debug!(
        subdivisions,
        points = points.len(),
        triangles = faces.len(),
        "generated icosphere"
    );
    Ok(())
}
