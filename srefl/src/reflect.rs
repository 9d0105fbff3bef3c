use std::any::Any;

use crate::{binding::builder::TypeBuilder, utils::error::ReflResult};

/// A Rust type that can be registered in a [`RegistryBuilder`](crate::types::registry::RegistryBuilder).
///
/// ```
/// use srefl::{Reflect, TypeBuilder, ReflResult};
///
/// struct Counter {
///     count: u32,
/// }
///
/// impl Reflect for Counter {
///     const NAME: &'static str = "Counter";
///
///     fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
///         builder.getter_property("Count", |counter: &Counter| counter.count)?;
///         builder
///             .method_mut("Bump", |counter: &mut Counter, by: u32| counter.count += by)?
///             .set_parameter_names(["by"])?;
///         Ok(())
///     }
/// }
/// ```
pub trait Reflect: Any + Sized {
    /// Name entered in the global table.
    const NAME: &'static str;

    /// Describe the members of the type. Runs once, while the type is registering.
    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        let _ = builder;
        Ok(())
    }
}
