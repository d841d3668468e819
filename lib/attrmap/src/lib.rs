#![doc = include_str!("../README.md")]

mod accessor;
mod attribute;
mod error;
mod store;

pub use accessor::*;
pub use attribute::*;
pub use error::*;
pub use store::*;
