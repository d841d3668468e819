use attrmap::{
    Attribute, AttributeAccessor, AttributeAccessorMut, AttributeError, AttributeId,
};
use polydetail_common::ArrayIndex;

use super::{GeometryStore, Space};

impl<Idx: ArrayIndex> GeometryStore<Idx> {
    /// Register a new attribute on every element of `space`, zero-initialized.
    pub fn add_attribute<T: Attribute>(
        &mut self,
        space: Space,
        id: AttributeId,
    ) -> Result<(), AttributeError> {
        let capacity = self.space(space).capacity();
        self.attributes_mut(space).register::<T>(id, capacity)?;
        tracing::debug!(%space, %id, "added attribute");
        Ok(())
    }

    /// Remove an attribute from `space`.
    ///
    /// Point positions can't be removed.
    pub fn remove_attribute(&mut self, space: Space, id: AttributeId) -> Result<(), AttributeError> {
        if space == Space::Point && id == AttributeId::POSITION {
            return Err(AttributeError::ReservedAttribute(id));
        }
        self.attributes_mut(space).remove(id)
    }

    #[inline]
    pub fn has_attribute(&self, space: Space, id: AttributeId) -> bool {
        self.attributes(space).contains(id)
    }

    /// Get the attribute value of one element, or [zeroed](Attribute::zeroed) if the element isn't
    /// valid or the attribute is missing or of another type.
    pub fn attribute<T: Attribute>(&self, space: Space, index: Idx, id: AttributeId) -> T {
        let i = index.to_index();
        if !self.space(space).is_valid(i) {
            return T::zeroed();
        }
        self.attributes(space)
            .get::<T>(id, i)
            .unwrap_or_else(|_| T::zeroed())
    }

    /// Set the attribute value of one element.
    ///
    /// Returns `false` if the element isn't valid or the attribute is missing or of another type.
    pub fn set_attribute<T: Attribute>(
        &mut self,
        space: Space,
        index: Idx,
        id: AttributeId,
        value: T,
    ) -> bool {
        let i = index.to_index();
        if !self.space(space).is_valid(i) {
            return false;
        }
        self.attributes_mut(space).set(id, i, value).is_ok()
    }

    /// A typed view of one attribute over the whole capacity of `space`.
    ///
    /// Elements at invalid indices hold stale or zeroed data.
    pub fn attribute_accessor<T: Attribute>(
        &self,
        space: Space,
        id: AttributeId,
    ) -> Result<AttributeAccessor<'_, T>, AttributeError> {
        self.attributes(space).accessor::<T>(id)
    }

    pub fn attribute_accessor_mut<T: Attribute>(
        &mut self,
        space: Space,
        id: AttributeId,
    ) -> Result<AttributeAccessorMut<'_, T>, AttributeError> {
        self.attributes_mut(space).accessor_mut::<T>(id)
    }

    /// Ids of the attributes registered on `space`, in ascending order.
    pub fn attribute_ids(&self, space: Space) -> Vec<AttributeId> {
        self.attributes(space).ids()
    }
}

macro_rules! space_attributes {
    (
        $space:expr, $name:literal,
        $add:ident, $remove:ident, $has:ident, $get:ident, $set:ident,
        $acc:ident, $acc_mut:ident, $ids:ident
    ) => {
        impl<Idx: ArrayIndex> GeometryStore<Idx> {
            #[doc = concat!("See [add_attribute](Self::add_attribute); operates on the ", $name, " space.")]
            #[inline]
            pub fn $add<T: Attribute>(&mut self, id: AttributeId) -> Result<(), AttributeError> {
                self.add_attribute::<T>($space, id)
            }

            #[doc = concat!("See [remove_attribute](Self::remove_attribute); operates on the ", $name, " space.")]
            #[inline]
            pub fn $remove(&mut self, id: AttributeId) -> Result<(), AttributeError> {
                self.remove_attribute($space, id)
            }

            #[inline]
            pub fn $has(&self, id: AttributeId) -> bool {
                self.has_attribute($space, id)
            }

            #[doc = concat!("See [attribute](Self::attribute); operates on the ", $name, " space.")]
            #[inline]
            pub fn $get<T: Attribute>(&self, index: Idx, id: AttributeId) -> T {
                self.attribute::<T>($space, index, id)
            }

            #[doc = concat!("See [set_attribute](Self::set_attribute); operates on the ", $name, " space.")]
            #[inline]
            pub fn $set<T: Attribute>(&mut self, index: Idx, id: AttributeId, value: T) -> bool {
                self.set_attribute($space, index, id, value)
            }

            #[inline]
            pub fn $acc<T: Attribute>(
                &self,
                id: AttributeId,
            ) -> Result<AttributeAccessor<'_, T>, AttributeError> {
                self.attribute_accessor::<T>($space, id)
            }

            #[inline]
            pub fn $acc_mut<T: Attribute>(
                &mut self,
                id: AttributeId,
            ) -> Result<AttributeAccessorMut<'_, T>, AttributeError> {
                self.attribute_accessor_mut::<T>($space, id)
            }

            #[inline]
            pub fn $ids(&self) -> Vec<AttributeId> {
                self.attribute_ids($space)
            }
        }
    };
}

space_attributes!(
    Space::Point, "point",
    add_point_attribute, remove_point_attribute, has_point_attribute,
    point_attribute, set_point_attribute,
    point_attribute_accessor, point_attribute_accessor_mut, point_attribute_ids
);
space_attributes!(
    Space::Vertex, "vertex",
    add_vertex_attribute, remove_vertex_attribute, has_vertex_attribute,
    vertex_attribute, set_vertex_attribute,
    vertex_attribute_accessor, vertex_attribute_accessor_mut, vertex_attribute_ids
);
space_attributes!(
    Space::Primitive, "primitive",
    add_primitive_attribute, remove_primitive_attribute, has_primitive_attribute,
    primitive_attribute, set_primitive_attribute,
    primitive_attribute_accessor, primitive_attribute_accessor_mut, primitive_attribute_ids
);
