//! Descriptors
//!
//! Passive metadata nodes owned by a [`Type`](crate::types::Type):
//! - [`Function`]: a callable with its parameter list, return type and an invocation thunk,
//! - [`Property`]: a logical value exposed through a getter and/or a setter,
//! - [`Field`]: a property synthesized from a data member at a known byte offset.
mod documented;
mod field;
mod function;
mod property;

pub use documented::{Documented, DocumentedObject};
pub use field::{EnumValue, Field, FieldAccessor, PropertyBinding};
pub use function::{Function, Parameter};
pub use property::Property;
