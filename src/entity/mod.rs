pub mod catalog;
pub mod contracts;
pub mod macros;
pub mod validate;

pub use contracts::{EntityDescriptor, EntityRecord};
