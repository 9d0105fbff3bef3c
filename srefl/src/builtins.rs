//! Built-in types
//!
//! Primitives and the reflection meta types. [`initialize_reflection`] must run
//! before any user type is registered: every type gets a `GetStaticType` function
//! returning a [`TypeRef`], and most accessors mention `()` or a primitive.
use log::debug;

use crate::{
    attributes::{Attribute, Serializable},
    binding::builder::TypeBuilder,
    descriptors::{DocumentedObject, Field, Function, Property},
    reflect::Reflect,
    types::{Type, TypeRef, registry::RegistryBuilder},
    utils::error::ReflResult,
};

macro_rules! reflect_primitive {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                const NAME: &'static str = $name;
            }
        )+
    };
}

reflect_primitive! {
    () => "()",
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
}

impl Reflect for TypeRef {
    const NAME: &'static str = "TypeRef";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_documentation("Handle of a type inside its registry.");
        Ok(())
    }
}

impl Reflect for DocumentedObject {
    const NAME: &'static str = "DocumentedObject";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_documentation("Anything carrying a documentation string.");
        builder.property(
            "Documentation",
            |object: &DocumentedObject| object.documentation().to_owned(),
            |object: &mut DocumentedObject, documentation: String| {
                object.set_documentation(documentation)
            },
        )?;
        Ok(())
    }
}

impl Reflect for Attribute {
    const NAME: &'static str = "Attribute";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.getter_property("Name", |attribute: &Attribute| attribute.name().to_owned())?;
        Ok(())
    }
}

impl Reflect for Serializable {
    const NAME: &'static str = Serializable::NAME;

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder
            .set_base::<Attribute>()?
            .set_documentation("Marks a readable and writable property for serialization.");
        Ok(())
    }
}

impl Reflect for Function {
    const NAME: &'static str = "Function";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_base::<DocumentedObject>()?;
        builder.getter_property("Name", |function: &Function| function.name().to_owned())?;
        builder.getter_property("OwningType", Function::owning_type)?;
        builder.getter_property("ReturnType", Function::return_type)?;
        builder.getter_property("Arity", Function::arity)?;
        Ok(())
    }
}

impl Reflect for Property {
    const NAME: &'static str = "Property";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_base::<DocumentedObject>()?;
        builder.getter_property("Name", |property: &Property| property.name().to_owned())?;
        builder.getter_property("OwningType", Property::owning_type)?;
        builder.getter_property("PropertyType", Property::property_type)?;
        builder.getter_property("IsSerializable", Property::is_serializable)?;
        Ok(())
    }
}

impl Reflect for Field {
    const NAME: &'static str = "Field";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_base::<Property>()?;
        builder
            .getter_property("Offset", Field::offset)?
            .set_documentation("Byte offset of the member from the start of its type.");
        Ok(())
    }
}

impl Reflect for Type {
    const NAME: &'static str = "Type";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_base::<DocumentedObject>()?;
        builder.getter_property("Id", Type::id)?;
        builder.getter_property("Name", |ty: &Type| ty.name().to_owned())?;
        builder.getter_property("Hash", Type::hash)?;
        builder.getter_property("AllocatedSize", Type::allocated_size)?;
        builder.getter_property("StoredSize", Type::stored_size)?;
        builder
            .getter_property("UnqualifiedSize", Type::unqualified_size)?
            .set_documentation("Size of the type once every modifier is stripped.");
        builder.getter_property("IsQualified", Type::is_qualified)?;
        Ok(())
    }
}

/// Register the primitives and the meta types, in dependency order.
pub fn initialize_reflection(registry: &mut RegistryBuilder) -> ReflResult<()> {
    registry.register::<TypeRef>()?;
    registry.register::<()>()?;
    registry.register::<bool>()?;
    registry.register::<i8>()?;
    registry.register::<i16>()?;
    registry.register::<i32>()?;
    registry.register::<i64>()?;
    registry.register::<isize>()?;
    registry.register::<u8>()?;
    registry.register::<u16>()?;
    registry.register::<u32>()?;
    registry.register::<u64>()?;
    registry.register::<usize>()?;
    registry.register::<f32>()?;
    registry.register::<f64>()?;
    registry.register::<String>()?;

    registry.register::<DocumentedObject>()?;
    registry.register::<Attribute>()?;
    registry.register::<Serializable>()?;
    registry.register::<Function>()?;
    registry.register::<Property>()?;
    registry.register::<Field>()?;
    registry.register::<Type>()?;

    debug!("Reflection initialized with {} type(s)", registry.len());
    Ok(())
}
