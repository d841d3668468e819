//! Flattening a [GeometryStore] into an indexed triangle list.

use attrmap::{AttributeId, Normal, Position};
use polydetail_common::ArrayIndex;

use crate::{error::ExportError, GeometryStore};

/// An indexed triangle list with one corner per primitive vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<Position>,
    /// Parallel to `positions`; zero where the store has no vertex normals.
    pub normals: Vec<Normal>,
    /// Three corners per triangle.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Fan-triangulate every valid primitive of `store`.
    ///
    /// Each primitive contributes its own copy of every corner, and a primitive `[v0, v1, ... vn]`
    /// becomes the triangles `[v0, vi, vi+1]` for `i` in `1..n`. Primitives with fewer than 3
    /// vertices are skipped.
    pub fn from_store<Idx: ArrayIndex>(store: &GeometryStore<Idx>) -> Result<Self, ExportError> {
        let positions = store
            .point_attribute_accessor::<Position>(AttributeId::POSITION)
            .map_err(ExportError::Positions)?;
        let normals = store
            .vertex_attribute_accessor::<Normal>(AttributeId::NORMAL)
            .ok();

        let mut res = Self::default();
        for prim in store.valid_primitives() {
            let vertices = store.primitive_vertices(prim).unwrap_or_default();
            if vertices.len() < 3 {
                continue;
            }
            let base = res.positions.len();
            if u32::try_from(base + vertices.len()).is_err() {
                return Err(ExportError::TooManyCorners);
            }
            for &v in vertices {
                let point = store.vertex_point_unchecked(v).to_index();
                res.positions.push(positions.get(point));
                res.normals.push(
                    normals
                        .and_then(|n| n.try_get(v.to_index()))
                        .unwrap_or_else(Normal::zeros),
                );
            }
            let base = base as u32;
            for i in 1..vertices.len() as u32 - 1 {
                res.indices.extend([base, base + i, base + i + 1]);
            }
        }
        tracing::debug!(
            corners = res.positions.len(),
            triangles = res.triangle_count(),
            "exported triangle mesh"
        );
        Ok(res)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over the corner indices of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
    }
}
