mod attributes;
mod elements;

use attrmap::{AttributeId, AttributeStore, Position};
use indexspace::{Allocation, IndexSpace};
use pagedarray::PagedArray;
use polydetail_common::ArrayIndex;

/// One of the three element spaces of a [GeometryStore].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    Point,
    Vertex,
    Primitive,
}

impl std::fmt::Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Space::Point => "point",
            Space::Vertex => "vertex",
            Space::Primitive => "primitive",
        })
    }
}

/// Construction parameters for a [GeometryStore].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryOptions {
    /// Initial capacity of each element space.
    pub initial_capacity: usize,
    /// Initial capacity of each primitive's vertex list, and the amount it grows by.
    pub row_capacity: usize,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            row_capacity: PagedArray::<u32>::DEFAULT_ROW_CAPACITY,
        }
    }
}

/// A variable-topology mesh with arbitrary per-element attributes.
///
/// Geometry is described by three element spaces:
///
/// * **points**, which carry a mandatory [Position] and may be shared between vertices
/// * **vertices**, each referencing exactly one point, which carry per-corner data
/// * **primitives**, each an ordered list of vertices forming one polygon
///
/// Each space hands out stable indices of type `Idx`, reusing released indices last-freed-first,
/// and owns an [AttributeStore] whose entries are always sized to the space's capacity.
///
/// # Invariants
///
/// * the point of every valid vertex is valid
/// * every vertex referenced by a valid primitive is valid
/// * `vertex_to_point.len()` == vertex capacity
/// * every attribute entry of a space holds exactly `capacity` elements of that space
/// * for every valid primitive `p`, row `p` of `topology` holds its vertices
#[derive(Debug, Clone)]
pub struct GeometryStore<Idx: ArrayIndex = u32> {
    points: IndexSpace,
    vertices: IndexSpace,
    primitives: IndexSpace,
    point_attributes: AttributeStore,
    vertex_attributes: AttributeStore,
    primitive_attributes: AttributeStore,
    vertex_to_point: Vec<Idx>,
    topology: PagedArray<Idx>,
    options: GeometryOptions,
    disposed: bool,
}

impl<Idx: ArrayIndex> Default for GeometryStore<Idx> {
    fn default() -> Self {
        Self::with_options(GeometryOptions::default())
    }
}

impl<Idx: ArrayIndex> GeometryStore<Idx> {
    /// Construct an empty store with room for `initial_capacity` elements in each space.
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_options(GeometryOptions {
            initial_capacity,
            ..Default::default()
        })
    }

    pub fn with_options(options: GeometryOptions) -> Self {
        let capacity = options.initial_capacity;
        let mut point_attributes = AttributeStore::new();
        let registered = point_attributes.register::<Position>(AttributeId::POSITION, capacity);
        debug_assert!(registered.is_ok());
        Self {
            points: IndexSpace::with_capacity(capacity),
            vertices: IndexSpace::with_capacity(capacity),
            primitives: IndexSpace::with_capacity(capacity),
            point_attributes,
            vertex_attributes: AttributeStore::new(),
            primitive_attributes: AttributeStore::new(),
            vertex_to_point: vec![Idx::zero(); capacity],
            topology: PagedArray::with_capacity(capacity, options.row_capacity),
            options,
            disposed: false,
        }
    }

    #[inline(always)]
    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    /// Invalidate every element and reset the free lists.
    ///
    /// Capacities and registered attributes are kept.
    pub fn clear(&mut self) {
        self.points.clear();
        self.vertices.clear();
        self.primitives.clear();
        self.topology.clear();
        self.vertex_to_point.fill(Idx::zero());
        tracing::debug!("cleared geometry store");
    }

    /// Release every owned buffer, including the attributes of each space.
    ///
    /// Once disposed, the store is empty and all `add_*` calls fail. Disposing twice does
    /// nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.points = IndexSpace::new();
        self.vertices = IndexSpace::new();
        self.primitives = IndexSpace::new();
        self.point_attributes.clear();
        self.vertex_attributes.clear();
        self.primitive_attributes.clear();
        self.vertex_to_point = Vec::new();
        self.topology = PagedArray::new(self.options.row_capacity);
        self.disposed = true;
        tracing::debug!("disposed geometry store");
    }

    #[inline(always)]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[inline]
    fn space(&self, space: Space) -> &IndexSpace {
        match space {
            Space::Point => &self.points,
            Space::Vertex => &self.vertices,
            Space::Primitive => &self.primitives,
        }
    }

    #[inline]
    fn attributes(&self, space: Space) -> &AttributeStore {
        match space {
            Space::Point => &self.point_attributes,
            Space::Vertex => &self.vertex_attributes,
            Space::Primitive => &self.primitive_attributes,
        }
    }

    #[inline]
    fn attributes_mut(&mut self, space: Space) -> &mut AttributeStore {
        match space {
            Space::Point => &mut self.point_attributes,
            Space::Vertex => &mut self.vertex_attributes,
            Space::Primitive => &mut self.primitive_attributes,
        }
    }

    /// Reserve the next index of `space`, growing its per-element buffers if necessary.
    ///
    /// Returns `None`, leaving the store untouched, if the store is disposed or the index isn't
    /// representable as `Idx`.
    fn allocate(&mut self, space: Space) -> Option<(Idx, usize)> {
        if self.disposed {
            return None;
        }
        let Some(index) = Idx::from_index(self.space(space).next_index()) else {
            tracing::warn!(%space, "index type exhausted");
            return None;
        };
        let Allocation { index: i, grown_to } = match space {
            Space::Point => self.points.allocate(),
            Space::Vertex => self.vertices.allocate(),
            Space::Primitive => self.primitives.allocate(),
        };
        if let Some(capacity) = grown_to {
            tracing::debug!(%space, capacity, "growing element space");
            self.attributes_mut(space).resize_all(capacity);
            if space == Space::Vertex {
                self.vertex_to_point.resize(capacity, Idx::zero());
            }
        }
        self.attributes_mut(space).reset_element(i);
        Some((index, i))
    }
}
