//! Registration routines
//!
//! A [`TypeBuilder`] is handed to [`Reflect::register`](crate::reflect::Reflect)
//! while the type is in the `Registering` state. Each `function`, `property` or
//! `field` call binds the native accessors right away, so a parameter or return
//! type that is not registered yet fails at the call that mentions it.
use std::{any::Any, marker::PhantomData};

use log::debug;

use crate::{
    attributes::{Attribute, AttributeTarget},
    binding::{NativeFunction, NativeMethod, NativeMethodMut},
    descriptors::{
        Documented, EnumValue, Field, FieldAccessor, Function, Property, PropertyBinding,
    },
    magic::{GETTER_FN_NAME, SETTER_FN_NAME},
    reflect::Reflect,
    types::{TypeRef, registry::RegistryBuilder},
    utils::error::ReflResult,
};

pub struct TypeBuilder<'r, T> {
    registry: &'r mut RegistryBuilder,
    ty: TypeRef,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: Reflect> TypeBuilder<'r, T> {
    pub(crate) fn new(registry: &'r mut RegistryBuilder, ty: TypeRef) -> Self {
        Self {
            registry,
            ty,
            _marker: PhantomData,
        }
    }

    /// Handle of the type being registered.
    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    pub fn registry(&mut self) -> &mut RegistryBuilder {
        self.registry
    }

    /// Make `B` the base type. `B` must be fully registered.
    pub fn set_base<B: Reflect>(&mut self) -> ReflResult<&mut Self> {
        let base = self.registry.type_of::<B>()?;
        self.registry.set_base(self.ty, base)?;
        debug!("Type `{}` now derives from `{}`", T::NAME, B::NAME);
        Ok(self)
    }

    pub fn set_documentation(&mut self, documentation: impl Into<String>) -> &mut Self {
        self.registry
            .node_mut(self.ty)
            .set_documentation(documentation);
        self
    }

    pub fn add_attribute(&mut self, attribute: impl Into<Attribute>) -> ReflResult<&mut Self> {
        let attribute = attribute.into();
        attribute.validate(AttributeTarget::Type(self.registry.node(self.ty)))?;
        self.registry.node_mut(self.ty).push_attribute(attribute);
        Ok(self)
    }

    /// Bind a free function without adding it to the type.
    pub fn bind_function<M, F: NativeFunction<M>>(
        &mut self,
        name: impl Into<String>,
        func: F,
    ) -> ReflResult<Function> {
        let signature = func.signature();
        Function::bind(name, self.ty, signature, func.into_thunk(), self.registry)
    }

    /// Bind a `&self` method without adding it to the type.
    pub fn bind_method<M, F: NativeMethod<T, M>>(
        &mut self,
        name: impl Into<String>,
        func: F,
    ) -> ReflResult<Function> {
        let signature = func.signature();
        Function::bind(name, self.ty, signature, func.into_thunk(), self.registry)
    }

    /// Bind a `&mut self` method without adding it to the type.
    pub fn bind_method_mut<M, F: NativeMethodMut<T, M>>(
        &mut self,
        name: impl Into<String>,
        func: F,
    ) -> ReflResult<Function> {
        let signature = func.signature();
        Function::bind(name, self.ty, signature, func.into_thunk(), self.registry)
    }

    pub fn function<M, F: NativeFunction<M>>(
        &mut self,
        name: impl Into<String>,
        func: F,
    ) -> ReflResult<FunctionBuilder<'_>> {
        let function = self.bind_function(name, func)?;
        self.insert_function(function)
    }

    pub fn method<M, F: NativeMethod<T, M>>(
        &mut self,
        name: impl Into<String>,
        func: F,
    ) -> ReflResult<FunctionBuilder<'_>> {
        let function = self.bind_method(name, func)?;
        self.insert_function(function)
    }

    pub fn method_mut<M, F: NativeMethodMut<T, M>>(
        &mut self,
        name: impl Into<String>,
        func: F,
    ) -> ReflResult<FunctionBuilder<'_>> {
        let function = self.bind_method_mut(name, func)?;
        self.insert_function(function)
    }

    fn insert_function(&mut self, function: Function) -> ReflResult<FunctionBuilder<'_>> {
        let policy = self.registry.config().duplicate_members;
        let node = self.registry.node_mut(self.ty);
        let owner_name = node.name().to_owned();
        let function = node.add_function(function, policy)?;

        Ok(FunctionBuilder {
            owner_name,
            function,
        })
    }

    /// Property read through `getter` and written through `setter`.
    pub fn property<MG, MS, G, S>(
        &mut self,
        name: impl Into<String>,
        getter: G,
        setter: S,
    ) -> ReflResult<PropertyBuilder<'_>>
    where
        G: NativeMethod<T, MG>,
        S: NativeMethodMut<T, MS>,
    {
        let getter = self.bind_method(GETTER_FN_NAME, getter)?;
        let setter = self.bind_method_mut(SETTER_FN_NAME, setter)?;
        self.property_from(name, Some(getter), Some(setter))
    }

    pub fn getter_property<M, G: NativeMethod<T, M>>(
        &mut self,
        name: impl Into<String>,
        getter: G,
    ) -> ReflResult<PropertyBuilder<'_>> {
        let getter = self.bind_method(GETTER_FN_NAME, getter)?;
        self.property_from(name, Some(getter), None)
    }

    pub fn setter_property<M, S: NativeMethodMut<T, M>>(
        &mut self,
        name: impl Into<String>,
        setter: S,
    ) -> ReflResult<PropertyBuilder<'_>> {
        let setter = self.bind_method_mut(SETTER_FN_NAME, setter)?;
        self.property_from(name, None, Some(setter))
    }

    /// Property over already bound accessors, see [`Self::bind_function`] and friends.
    pub fn property_from(
        &mut self,
        name: impl Into<String>,
        getter: Option<Function>,
        setter: Option<Function>,
    ) -> ReflResult<PropertyBuilder<'_>> {
        let property = Property::new(name, getter, setter, self.registry)?;

        let policy = self.registry.config().duplicate_members;
        let node = self.registry.node_mut(self.ty);
        let owner_name = node.name().to_owned();
        let property = node.add_property(property, policy)?;

        Ok(PropertyBuilder {
            owner_name,
            property,
        })
    }

    /// Property backed by the data member located by `accessor`.
    ///
    /// Only the accessors named by `binding` are generated. The getter returns a
    /// clone of the member.
    pub fn field<V: Any + Clone>(
        &mut self,
        name: impl Into<String>,
        accessor: FieldAccessor<T, V>,
        binding: PropertyBinding,
    ) -> ReflResult<PropertyBuilder<'_>> {
        let FieldAccessor {
            offset,
            get,
            get_mut,
        } = accessor;

        let getter = if binding.has_getter() {
            Some(self.bind_method(GETTER_FN_NAME, move |object: &T| get(object).clone())?)
        } else {
            None
        };
        let setter = if binding.has_setter() {
            Some(self.bind_method_mut(SETTER_FN_NAME, move |object: &mut T, value: V| {
                *get_mut(object) = value;
            })?)
        } else {
            None
        };

        let property = Property::new(name, getter, setter, self.registry)?;
        let field = Field::new(property, offset, binding);

        let policy = self.registry.config().duplicate_members;
        let node = self.registry.node_mut(self.ty);
        let owner_name = node.name().to_owned();
        let field = node.add_field(field, policy)?;

        Ok(PropertyBuilder {
            owner_name,
            property: field.property_mut(),
        })
    }

    /// Read-only property holding the value of an enumerator.
    ///
    /// The getter takes no receiver and returns the value as `i64` or `u64`
    /// depending on the signedness of `value`.
    pub fn enumerator(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnumValue>,
    ) -> ReflResult<PropertyBuilder<'_>> {
        let getter = match value.into() {
            EnumValue::Signed(value) => self.bind_function(GETTER_FN_NAME, move || value)?,
            EnumValue::Unsigned(value) => self.bind_function(GETTER_FN_NAME, move || value)?,
        };

        self.property_from(name, Some(getter), None)
    }
}

/// Fluent access to a [`Function`] just added to its type.
pub struct FunctionBuilder<'a> {
    owner_name: String,
    function: &'a mut Function,
}

impl<'a> FunctionBuilder<'a> {
    pub fn set_parameter_names<I, S>(self, names: I) -> ReflResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.function.set_parameter_names(names)?;
        Ok(self)
    }

    pub fn set_documentation(self, documentation: impl Into<String>) -> Self {
        self.function.set_documentation(documentation);
        self
    }

    pub fn add_attribute(self, attribute: impl Into<Attribute>) -> ReflResult<Self> {
        let attribute = attribute.into();
        attribute.validate(AttributeTarget::Function {
            owner: &self.owner_name,
            function: self.function,
        })?;
        self.function.push_attribute(attribute);
        Ok(self)
    }

    pub fn function(&self) -> &Function {
        self.function
    }
}

/// Fluent access to a [`Property`] (or the property of a [`Field`]) just added
/// to its type.
pub struct PropertyBuilder<'a> {
    owner_name: String,
    property: &'a mut Property,
}

impl<'a> PropertyBuilder<'a> {
    pub fn set_documentation(self, documentation: impl Into<String>) -> Self {
        self.property.set_documentation(documentation);
        self
    }

    pub fn add_attribute(self, attribute: impl Into<Attribute>) -> ReflResult<Self> {
        let attribute = attribute.into();
        attribute.validate(AttributeTarget::Property {
            owner: &self.owner_name,
            property: self.property,
        })?;
        self.property.push_attribute(attribute);
        Ok(self)
    }

    pub fn property(&self) -> &Property {
        self.property
    }
}
