use std::{any::TypeId, fmt};

use nalgebra::{
    Matrix2, Matrix3, Matrix4, Point2, Point3, Point4, Vector2, Vector3, Vector4,
};

/// Stable identifier of a per-element data channel.
///
/// Ids are plain integers; [`AttributeId::BUILTIN`] lists the ones every registry knows about
/// from construction onwards, so that they can be used as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeId(pub u32);

impl AttributeId {
    pub const POSITION: Self = Self(0);
    pub const NORMAL: Self = Self(1);
    pub const TANGENT: Self = Self(2);
    pub const COLOR: Self = Self(3);
    pub const UV0: Self = Self(4);
    pub const UV1: Self = Self(5);
    pub const UV2: Self = Self(6);
    pub const UV3: Self = Self(7);
    pub const UV4: Self = Self(8);
    pub const UV5: Self = Self(9);
    pub const UV6: Self = Self(10);
    pub const UV7: Self = Self(11);
    pub const BONE_WEIGHTS: Self = Self(12);
    pub const BLEND_INDICES: Self = Self(13);

    /// Names of the built-in attributes, indexed by id.
    pub const BUILTIN: [&'static str; 14] = [
        "Position",
        "Normal",
        "Tangent",
        "Color",
        "UV0",
        "UV1",
        "UV2",
        "UV3",
        "UV4",
        "UV5",
        "UV6",
        "UV7",
        "BoneWeights",
        "BlendIndices",
    ];

    #[inline(always)]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is one of the [built-in](Self::BUILTIN) ids.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        (self.0 as usize) < Self::BUILTIN.len()
    }
}

impl From<u32> for AttributeId {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::BUILTIN.get(self.0 as usize) {
            Some(name) => write!(f, "#{} ({name})", self.0),
            None => write!(f, "#{}", self.0),
        }
    }
}

/// Trait for types which can be stored in an [AttributeStore](crate::AttributeStore).
///
/// Values are copied in and out of untyped byte buffers, so implementors must be plain data.
///
/// # Safety
///
/// Implementing types must:
///
/// * contain no padding bytes,
/// * contain no pointers, references, or other values whose validity depends on anything but their bytes,
/// * be valid for *every* bit pattern; in particular, all-zeroes must be a valid value.
#[allow(unsafe_code)]
pub unsafe trait Attribute: Copy + Send + Sync + 'static {
    /// The value of a newly allocated element, and the value returned in place of a missing one.
    #[inline]
    fn zeroed() -> Self {
        // all-zeroes is valid for `Self` by the trait contract
        unsafe { std::mem::zeroed() }
    }
}

/// Runtime type information recorded alongside type-erased attribute data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
    size: usize,
}

impl TypeTag {
    #[inline]
    pub fn of<T: Attribute>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            size: std::mem::size_of::<T>(),
        }
    }

    #[inline]
    pub fn is<T: Attribute>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The name of the tagged type, as given by [std::any::type_name].
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Size of one element in bytes.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub type Position = Point3<f32>;
pub type Normal = Vector3<f32>;
/// xyz direction; w is the handedness (±1) of the bitangent
pub type Tangent = Vector4<f32>;
pub type Texcoord = Point2<f32>;
pub type Rgba = Vector4<f32>;

mod _impl_attr {
    #![allow(unsafe_code)]

    use super::*;

    macro_rules! impl_attr_shapes {
        ($C:ident) => {
            unsafe impl Attribute for $C {}
            unsafe impl Attribute for [$C; 1] {}
            unsafe impl Attribute for [$C; 2] {}
            unsafe impl Attribute for [$C; 3] {}
            unsafe impl Attribute for [$C; 4] {}
            unsafe impl Attribute for [$C; 9] {}
            unsafe impl Attribute for [$C; 16] {}

            // nalgebra's statically-sized types are `repr(C)` over their component arrays
            static_assertions::assert_eq_size!(Vector2<$C>, [$C; 2]);
            static_assertions::assert_eq_size!(Vector3<$C>, [$C; 3]);
            static_assertions::assert_eq_size!(Vector4<$C>, [$C; 4]);
            static_assertions::assert_eq_size!(Point2<$C>, [$C; 2]);
            static_assertions::assert_eq_size!(Point3<$C>, [$C; 3]);
            static_assertions::assert_eq_size!(Point4<$C>, [$C; 4]);
            static_assertions::assert_eq_size!(Matrix2<$C>, [$C; 4]);
            static_assertions::assert_eq_size!(Matrix3<$C>, [$C; 9]);
            static_assertions::assert_eq_size!(Matrix4<$C>, [$C; 16]);

            unsafe impl Attribute for Vector2<$C> {}
            unsafe impl Attribute for Vector3<$C> {}
            unsafe impl Attribute for Vector4<$C> {}
            unsafe impl Attribute for Point2<$C> {}
            unsafe impl Attribute for Point3<$C> {}
            unsafe impl Attribute for Point4<$C> {}
            unsafe impl Attribute for Matrix2<$C> {}
            unsafe impl Attribute for Matrix3<$C> {}
            unsafe impl Attribute for Matrix4<$C> {}
        };
    }

    polydetail_common::item_with! {C: u8, u16, u32, u64, i8, i16, i32, i64, f32, f64 => impl_attr_shapes!(C);}
}
