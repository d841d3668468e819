use attrmap::{AttributeId, Position};
use polydetail_common::ArrayIndex;

use super::{GeometryStore, Space};

/// Points
impl<Idx: ArrayIndex> GeometryStore<Idx> {
    /// Add a point at `position`, returning its index.
    ///
    /// Fails if the store is disposed or `Idx` can't represent another point.
    pub fn add_point(&mut self, position: Position) -> Option<Idx> {
        let (index, i) = self.allocate(Space::Point)?;
        if let Ok(mut positions) = self
            .point_attributes
            .accessor_mut::<Position>(AttributeId::POSITION)
        {
            positions.set(i, position);
        }
        tracing::trace!(point = i, "added point");
        Some(index)
    }

    /// Remove a point, along with every vertex referencing it.
    ///
    /// Returns `false` if `point` wasn't valid.
    pub fn remove_point(&mut self, point: Idx) -> bool {
        let p = point.to_index();
        if !self.points.is_valid(p) {
            return false;
        }
        let referencing: Vec<Idx> = self
            .valid_vertices()
            .filter(|&v| self.vertex_to_point[v.to_index()] == point)
            .collect();
        for &v in &referencing {
            self.remove_vertex_at(v);
        }
        self.points.release(p);
        tracing::debug!(
            point = p,
            vertices = referencing.len(),
            "removed point"
        );
        true
    }

    /// The position of a point, or the origin if `point` isn't valid.
    pub fn point_position(&self, point: Idx) -> Position {
        self.point_attribute::<Position>(point, AttributeId::POSITION)
    }

    pub fn set_point_position(&mut self, point: Idx, position: Position) -> bool {
        self.set_point_attribute(point, AttributeId::POSITION, position)
    }

    #[inline]
    pub fn is_point_valid(&self, point: Idx) -> bool {
        self.points.is_valid(point.to_index())
    }

    /// Iterate over valid points in ascending order.
    pub fn valid_points(&self) -> impl Iterator<Item = Idx> + '_ {
        self.points.iter_valid().filter_map(Idx::from_index)
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.count()
    }

    #[inline]
    pub fn point_capacity(&self) -> usize {
        self.points.capacity()
    }
}

/// Vertices
impl<Idx: ArrayIndex> GeometryStore<Idx> {
    /// Add a vertex referencing `point`, returning its index.
    ///
    /// Fails if `point` isn't valid.
    pub fn add_vertex(&mut self, point: Idx) -> Option<Idx> {
        if !self.is_point_valid(point) {
            return None;
        }
        let (index, v) = self.allocate(Space::Vertex)?;
        self.vertex_to_point[v] = point;
        tracing::trace!(vertex = v, point = point.to_index(), "added vertex");
        Some(index)
    }

    /// Remove a vertex from every primitive containing it, then invalidate it.
    ///
    /// Primitives left with fewer than 3 vertices are removed as well. Returns `false` if `vertex`
    /// wasn't valid.
    pub fn remove_vertex(&mut self, vertex: Idx) -> bool {
        let v = vertex.to_index();
        if !self.vertices.is_valid(v) {
            return false;
        }
        self.remove_vertex_at(vertex);
        true
    }

    /// `vertex` must be valid.
    fn remove_vertex_at(&mut self, vertex: Idx) {
        let v = vertex.to_index();
        let mut dropped = 0usize;
        for prim in 0..self.primitives.len() {
            if !self.primitives.is_valid(prim) {
                continue;
            }
            let mut touched = false;
            while let Some(pos) = self
                .topology
                .row(prim)
                .and_then(|row| row.iter().position(|&x| x == vertex))
            {
                self.topology.remove_at(prim, pos);
                touched = true;
            }
            if touched && self.topology.len_of(prim).unwrap_or(0) < 3 {
                self.remove_primitive_at(prim);
                dropped += 1;
            }
        }
        self.vertices.release(v);
        if dropped > 0 {
            tracing::debug!(vertex = v, primitives = dropped, "removed vertex");
        } else {
            tracing::trace!(vertex = v, "removed vertex");
        }
    }

    /// The point referenced by a vertex, or `None` if `vertex` isn't valid.
    #[inline]
    pub fn vertex_point(&self, vertex: Idx) -> Option<Idx> {
        self.is_vertex_valid(vertex)
            .then(|| self.vertex_to_point[vertex.to_index()])
    }

    /// The point referenced by a vertex, without checking its validity.
    ///
    /// The result is meaningless for invalid vertices.
    ///
    /// # Panics
    ///
    /// * `vertex` >= `self.vertex_capacity()`
    #[inline(always)]
    pub fn vertex_point_unchecked(&self, vertex: Idx) -> Idx {
        self.vertex_to_point[vertex.to_index()]
    }

    #[inline]
    pub fn is_vertex_valid(&self, vertex: Idx) -> bool {
        self.vertices.is_valid(vertex.to_index())
    }

    pub fn valid_vertices(&self) -> impl Iterator<Item = Idx> + '_ {
        self.vertices.iter_valid().filter_map(Idx::from_index)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.count()
    }

    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.capacity()
    }
}

/// Primitives
impl<Idx: ArrayIndex> GeometryStore<Idx> {
    /// Add a primitive made of `vertices`, in order, returning its index.
    ///
    /// Any number of vertices is accepted. Fails if any vertex isn't valid.
    pub fn add_primitive(&mut self, vertices: &[Idx]) -> Option<Idx> {
        if !vertices.iter().all(|&v| self.is_vertex_valid(v)) {
            return None;
        }
        let (index, p) = self.allocate(Space::Primitive)?;
        if p < self.topology.row_count() {
            // reuse the row of a released primitive
            self.topology.clear_row(p);
            for &v in vertices {
                self.topology.append_at(p, v);
            }
        } else {
            let row = self
                .topology
                .create_row(Some(vertices.len().max(self.options.row_capacity)));
            debug_assert_eq!(row, p);
            for &v in vertices {
                self.topology.append(v);
            }
        }
        tracing::trace!(primitive = p, vertices = vertices.len(), "added primitive");
        Some(index)
    }

    /// Returns `false` if `primitive` wasn't valid.
    pub fn remove_primitive(&mut self, primitive: Idx) -> bool {
        let p = primitive.to_index();
        if !self.primitives.is_valid(p) {
            return false;
        }
        self.remove_primitive_at(p);
        true
    }

    fn remove_primitive_at(&mut self, p: usize) {
        self.topology.clear_row(p);
        self.primitives.release(p);
        tracing::trace!(primitive = p, "removed primitive");
    }

    /// The vertices of a primitive, in order.
    #[inline]
    pub fn primitive_vertices(&self, primitive: Idx) -> Option<&[Idx]> {
        if !self.is_primitive_valid(primitive) {
            return None;
        }
        self.topology.row(primitive.to_index())
    }

    #[inline]
    pub fn primitive_vertex_count(&self, primitive: Idx) -> Option<usize> {
        self.primitive_vertices(primitive).map(<[Idx]>::len)
    }

    #[inline]
    pub fn primitive_vertex(&self, primitive: Idx, element: usize) -> Option<Idx> {
        self.primitive_vertices(primitive)?.get(element).copied()
    }

    /// Append a vertex to the end of a primitive.
    pub fn add_vertex_to_primitive(&mut self, primitive: Idx, vertex: Idx) -> bool {
        if !self.is_primitive_valid(primitive) || !self.is_vertex_valid(vertex) {
            return false;
        }
        self.topology.append_at(primitive.to_index(), vertex)
    }

    /// Remove the vertex at position `element` of a primitive.
    ///
    /// The vertex itself stays valid. If fewer than 3 vertices remain, the primitive is removed.
    pub fn remove_vertex_from_primitive(&mut self, primitive: Idx, element: usize) -> bool {
        let p = primitive.to_index();
        if !self.primitives.is_valid(p) || !self.topology.remove_at(p, element) {
            return false;
        }
        if self.topology.len_of(p).unwrap_or(0) < 3 {
            self.remove_primitive_at(p);
        }
        true
    }

    #[inline]
    pub fn is_primitive_valid(&self, primitive: Idx) -> bool {
        self.primitives.is_valid(primitive.to_index())
    }

    pub fn valid_primitives(&self) -> impl Iterator<Item = Idx> + '_ {
        self.primitives.iter_valid().filter_map(Idx::from_index)
    }

    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.primitives.count()
    }

    #[inline]
    pub fn primitive_capacity(&self) -> usize {
        self.primitives.capacity()
    }
}
