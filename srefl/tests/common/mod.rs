#![allow(dead_code)]

use srefl::{
    Function, Reflect, RegistryBuilder, RegistryConfig, ReflResult, TypeDecl, TypeRef, TypeSizes,
    binding::{NativeFunction, NativeMethod, NativeMethodMut},
    initialize_reflection,
};

/// Builder with every built-in type registered.
pub fn builder() -> RegistryBuilder {
    builder_with(RegistryConfig::default())
}

pub fn builder_with(config: RegistryConfig) -> RegistryBuilder {
    let mut builder = RegistryBuilder::with_config(config);
    initialize_reflection(&mut builder).expect("built-in types should register");
    builder
}

pub fn lenient() -> RegistryConfig {
    RegistryConfig {
        strict_properties: false,
        ..Default::default()
    }
}

/// Declare a type of `size` bytes deriving from `base`.
pub fn declare(builder: &mut RegistryBuilder, name: &str, base: Option<TypeRef>) -> TypeRef {
    let mut decl = TypeDecl::new(name, TypeSizes::uniform(8));
    if let Some(base) = base {
        decl = decl.with_base(base);
    }
    builder.declare_type(decl).expect("declaration should succeed")
}

pub fn bind_function<S: Reflect, M, F: NativeFunction<M>>(
    builder: &mut RegistryBuilder,
    name: &str,
    func: F,
) -> ReflResult<Function> {
    let owner = builder.type_of::<S>()?;
    let signature = func.signature();
    Function::bind(name, owner, signature, func.into_thunk(), builder)
}

pub fn bind_method<S: Reflect, M, F: NativeMethod<S, M>>(
    builder: &mut RegistryBuilder,
    name: &str,
    func: F,
) -> ReflResult<Function> {
    let owner = builder.type_of::<S>()?;
    let signature = func.signature();
    Function::bind(name, owner, signature, func.into_thunk(), builder)
}

pub fn bind_method_mut<S: Reflect, M, F: NativeMethodMut<S, M>>(
    builder: &mut RegistryBuilder,
    name: &str,
    func: F,
) -> ReflResult<Function> {
    let owner = builder.type_of::<S>()?;
    let signature = func.signature();
    Function::bind(name, owner, signature, func.into_thunk(), builder)
}
