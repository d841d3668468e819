#![doc = include_str!("../README.md")]

mod detail;
pub mod error;
pub mod export;
pub mod generate;
mod job;
pub mod normals;
mod registry;

pub use attrmap;
pub use attrmap::{Attribute, AttributeAccessor, AttributeAccessorMut, AttributeId, Normal, Position};
pub use detail::*;
pub use job::*;
pub use normals::NormalSolver;
pub use polydetail_common::ArrayIndex;
pub use registry::*;
