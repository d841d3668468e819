//! Per-vertex normals from primitive geometry.

use attrmap::{AttributeId, Normal, Position};
use polydetail_common::ArrayIndex;
use rayon::prelude::*;

use crate::{GeometryStore, JobHandle};

/// Squared cross-product length below which a face is considered degenerate.
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Normal given to vertices without any usable face.
#[inline]
pub fn default_normal() -> Normal {
    Normal::y()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Face {
    /// Unit length, or zero if the face is degenerate.
    normal: Normal,
    area: f32,
}

impl Face {
    #[inline]
    fn degenerate() -> Self {
        Self {
            normal: Normal::zeros(),
            area: 0.0,
        }
    }

    #[inline]
    fn is_degenerate(&self) -> bool {
        self.area == 0.0
    }
}

/// Computes smoothed per-vertex normals, writing them to the [Normal](AttributeId::NORMAL)
/// vertex attribute.
///
/// Each vertex takes its normal from the first primitive (in index order) containing it. Where
/// several vertices share a point, their face normals are clustered into smoothing groups: faces
/// whose normals are within `smoothing_angle` of a group's first face join that group, and every
/// vertex of the group receives the area-weighted average of the group's normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalSolver {
    /// In radians.
    pub smoothing_angle: f32,
}

impl Default for NormalSolver {
    fn default() -> Self {
        Self {
            smoothing_angle: std::f32::consts::FRAC_PI_3,
        }
    }
}

impl NormalSolver {
    #[inline]
    pub fn new(smoothing_angle: f32) -> Self {
        Self { smoothing_angle }
    }

    #[inline]
    pub fn from_degrees(smoothing_angle: f32) -> Self {
        Self::new(smoothing_angle.to_radians())
    }

    /// Wait for `dependency`, then [solve](Self::solve).
    ///
    /// Returns `dependency` itself if there was nothing to do.
    pub fn schedule<Idx: ArrayIndex>(
        &self,
        store: &mut GeometryStore<Idx>,
        dependency: JobHandle,
    ) -> JobHandle {
        dependency.complete();
        match self.solve(store) {
            0 => dependency,
            _ => JobHandle::completed(),
        }
    }

    /// Compute and store vertex normals, returning the number of vertices written.
    ///
    /// Does nothing if the store has no valid primitives or vertices, if point positions are
    /// missing, or if an existing normal attribute isn't a [Normal].
    #[tracing::instrument(skip_all, fields(angle = self.smoothing_angle))]
    pub fn solve<Idx: ArrayIndex>(&self, store: &mut GeometryStore<Idx>) -> usize {
        if store.primitive_count() == 0 || store.vertex_count() == 0 {
            tracing::trace!("nothing to solve");
            return 0;
        }
        let Some(normals) = self.compute(store) else {
            return 0;
        };
        if !store.has_vertex_attribute(AttributeId::NORMAL) {
            if let Err(e) = store.add_vertex_attribute::<Normal>(AttributeId::NORMAL) {
                tracing::warn!(%e, "couldn't add vertex normals");
                return 0;
            }
        }
        let mut output = match store.vertex_attribute_accessor_mut::<Normal>(AttributeId::NORMAL) {
            Ok(acc) => acc,
            Err(e) => {
                tracing::warn!(%e, "couldn't access vertex normals");
                return 0;
            }
        };
        for &(v, normal) in &normals {
            output.set(v, normal);
        }
        tracing::debug!(vertices = normals.len(), "solved vertex normals");
        normals.len()
    }

    /// Returns `(vertex, normal)` pairs for every vertex that should be written.
    fn compute<Idx: ArrayIndex>(&self, store: &GeometryStore<Idx>) -> Option<Vec<(usize, Normal)>> {
        let positions = match store.point_attribute_accessor::<Position>(AttributeId::POSITION) {
            Ok(acc) => acc,
            Err(e) => {
                tracing::warn!(%e, "couldn't access point positions");
                return None;
            }
        };

        // face normals, in parallel
        let primitives: Vec<Idx> = store.valid_primitives().collect();
        let faces: Vec<Face> = primitives
            .par_iter()
            .map(|&prim| {
                let vertices = store.primitive_vertices(prim).unwrap_or_default();
                let [a, b, c] = match vertices {
                    [a, b, c, ..] => [a, b, c],
                    _ => return Face::degenerate(),
                }
                .map(|&v| positions.get(store.vertex_point_unchecked(v).to_index()));
                let cross = (b - a).cross(&(c - a));
                let len2 = cross.norm_squared();
                if len2 < DEGENERATE_EPSILON {
                    return Face::degenerate();
                }
                let len = len2.sqrt();
                Face {
                    normal: cross / len,
                    area: 0.5 * len,
                }
            })
            .collect();

        // vertex -> face of its first owning primitive
        let mut owner: Vec<Option<usize>> = vec![None; store.vertex_capacity()];
        for (slot, &prim) in primitives.iter().enumerate() {
            for &v in store.primitive_vertices(prim).unwrap_or_default() {
                owner[v.to_index()].get_or_insert(slot);
            }
        }

        // point -> referencing vertices; count, then fill
        let point_capacity = store.point_capacity();
        let mut offsets = vec![0usize; point_capacity + 1];
        for v in store.valid_vertices() {
            offsets[store.vertex_point_unchecked(v).to_index() + 1] += 1;
        }
        for p in 0..point_capacity {
            offsets[p + 1] += offsets[p];
        }
        let mut cursor = offsets.clone();
        let mut by_point = vec![0usize; offsets[point_capacity]];
        for v in store.valid_vertices() {
            let p = store.vertex_point_unchecked(v).to_index();
            by_point[cursor[p]] = v.to_index();
            cursor[p] += 1;
        }

        // smoothing groups, in parallel across points
        let threshold = self.smoothing_angle.cos();
        let res: Vec<(usize, Normal)> = (0..point_capacity)
            .into_par_iter()
            .flat_map_iter(|p| {
                let vertices = &by_point[offsets[p]..offsets[p + 1]];
                smooth_point(vertices, &owner, &faces, threshold)
            })
            .collect();
        Some(res)
    }
}

/// Normals for the vertices of one point.
fn smooth_point(
    vertices: &[usize],
    owner: &[Option<usize>],
    faces: &[Face],
    threshold: f32,
) -> Vec<(usize, Normal)> {
    let face_of = |v: usize| {
        owner[v]
            .map(|slot| faces[slot])
            .filter(|f| !f.is_degenerate())
    };

    if let [v] = *vertices {
        let normal = face_of(v).map_or_else(default_normal, |f| f.normal);
        return vec![(v, normal)];
    }

    let usable: Vec<(usize, Face)> = vertices
        .iter()
        .filter_map(|&v| face_of(v).map(|f| (v, f)))
        .collect();
    match usable.as_slice() {
        [] => vertices.iter().map(|&v| (v, default_normal())).collect(),
        [(_, face)] => vertices.iter().map(|&v| (v, face.normal)).collect(),
        _ => {
            let mut res = Vec::with_capacity(usable.len());
            let mut grouped = vec![false; usable.len()];
            for leader in 0..usable.len() {
                if grouped[leader] {
                    continue;
                }
                let lead = usable[leader].1.normal;
                let members: Vec<usize> = (leader..usable.len())
                    .filter(|&i| !grouped[i] && (i == leader || lead.dot(&usable[i].1.normal) >= threshold))
                    .collect();
                let mut sum = Normal::zeros();
                let mut area = 0.0;
                for &i in &members {
                    grouped[i] = true;
                    let face = usable[i].1;
                    sum += face.normal * face.area;
                    area += face.area;
                }
                let normal = if area > DEGENERATE_EPSILON && sum.norm_squared() > DEGENERATE_EPSILON {
                    sum.normalize()
                } else {
                    lead
                };
                res.extend(members.iter().map(|&i| (usable[i].0, normal)));
            }
            res
        }
    }
}
