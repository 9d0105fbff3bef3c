//! Runtime reflection for Rust types.
//!
//! Types are described once at startup by their [`Reflect`] implementation and
//! stored as [`Type`] nodes in a registry arena, along with their functions,
//! properties, fields and attributes. Consumers then look types up by name or by
//! Rust type, walk inheritance and modifier chains, and call accessors through
//! type-erased thunks.
//!
//! ```
//! use srefl::{RegistryBuilder, initialize_reflection};
//!
//! let mut builder = RegistryBuilder::new();
//! initialize_reflection(&mut builder).unwrap();
//! let registry = builder.finish().unwrap();
//!
//! let float = registry.get_global_type("f32").unwrap();
//! assert_eq!(registry.get(float).unwrap().allocated_size(), 4);
//! ```

pub mod attributes;
pub mod binding;
pub mod builtins;
pub mod descriptors;
pub mod magic;
pub mod reflect;
pub mod types;
pub mod utils;

pub use attributes::{Attribute, AttributeTarget, CustomAttribute, Serializable};
pub use binding::builder::{FunctionBuilder, PropertyBuilder, TypeBuilder};
pub use builtins::initialize_reflection;
pub use descriptors::{
    Documented, DocumentedObject, EnumValue, Field, FieldAccessor, Function, Parameter, Property,
    PropertyBinding,
};
pub use reflect::Reflect;
pub use types::{
    Modifier, RegistrationState, Type, TypeDecl, TypeRef, TypeSizes,
    registry::{RegistryBuilder, TypeRegistry},
};
pub use utils::{
    conf::{DuplicateMemberPolicy, RegistryConfig},
    error::{InvocationError, MemberKind, ReflError, ReflResult},
};
