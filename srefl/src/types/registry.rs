//! The type registry
//!
//! Registration happens through a [`RegistryBuilder`], which owns the arena while
//! registration routines run. [`RegistryBuilder::finish`] turns it into a
//! [`TypeRegistry`] that only offers `&self` queries: once startup is over the whole
//! graph is read-only and can be shared between threads without synchronization.
use std::{
    any::{TypeId, type_name},
    collections::BTreeMap,
    ops::Deref,
};

use log::{debug, warn};

use crate::{
    binding::{RustType, builder::TypeBuilder},
    magic::GET_STATIC_TYPE_FN_NAME,
    reflect::Reflect,
    types::{Modifier, RegistrationState, Type, TypeDecl, TypeRef, TypeSizes},
    utils::{
        conf::RegistryConfig,
        error::{ReflError, ReflResult},
    },
};

/// Read-only view of every registered [`Type`].
///
/// Holds three tables over the same arena:
/// - the global name table, first registration wins,
/// - the Rust [`TypeId`] table used to resolve native signatures,
/// - a cache of the modifier types built around each node.
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<Type>,
    global: BTreeMap<String, TypeRef>,
    rust_types: BTreeMap<TypeId, TypeRef>,
    modifiers: BTreeMap<(Modifier, TypeRef), TypeRef>,
    config: RegistryConfig,
}

impl TypeRegistry {
    fn with_config(config: RegistryConfig) -> Self {
        Self {
            types: Vec::new(),
            global: BTreeMap::new(),
            rust_types: BTreeMap::new(),
            modifiers: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of nodes in the arena, including modifier types and types whose
    /// name lost against an earlier registration.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, ty: TypeRef) -> Option<&Type> {
        self.types.get(ty.index())
    }

    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.types.iter()
    }

    pub fn name_of(&self, ty: TypeRef) -> Option<&str> {
        self.get(ty).map(Type::name)
    }

    pub(crate) fn describe(&self, ty: TypeRef) -> String {
        match self.name_of(ty) {
            Some(name) => name.to_owned(),
            None => format!("<unknown type {}>", ty),
        }
    }

    /// Look up a type by its registered name.
    ///
    /// A miss is common while types are being brought up one by one, so it is not
    /// an error: a warning is logged (see [`RegistryConfig::log_lookup_misses`]) and
    /// `None` is returned.
    pub fn get_global_type(&self, name: &str) -> Option<TypeRef> {
        let found = self.global.get(name).copied();

        if found.is_none() && self.config.log_lookup_misses {
            warn!(
                "Could not find a type named `{}`, was it renamed, misspelled or never registered?",
                name
            );
        }

        found
    }

    /// Same lookup as [`Self::get_global_type`], surfaced as an error.
    pub fn find_type(&self, name: &str) -> ReflResult<TypeRef> {
        self.global
            .get(name)
            .copied()
            .ok_or_else(|| ReflError::UnknownTypeName {
                name: name.to_owned(),
            })
    }

    /// Handle of the node registered for the Rust type `T`.
    pub fn type_of<T: 'static>(&self) -> ReflResult<TypeRef> {
        self.resolve(&RustType::of::<T>())
    }

    pub(crate) fn resolve(&self, rust_type: &RustType) -> ReflResult<TypeRef> {
        self.rust_types
            .get(&rust_type.id)
            .copied()
            .ok_or(ReflError::UnregisteredType {
                rust_name: rust_type.name,
            })
    }

    /// Resolve a type named in the signature of a routine of `owner`.
    ///
    /// Only `owner` itself may still be `Registering`. Any other type must have
    /// completed its own routine.
    pub(crate) fn resolve_for(&self, owner: TypeRef, rust_type: &RustType) -> ReflResult<TypeRef> {
        let ty = self.resolve(rust_type)?;

        if ty != owner && !self.types[ty.index()].state().is_registered() {
            warn!(
                "`{}` refers to `{}`, which has not finished registering",
                self.describe(owner),
                self.describe(ty)
            );
            return Err(ReflError::UnregisteredType {
                rust_name: rust_type.name,
            });
        }

        Ok(ty)
    }

    pub fn registration_state<T: 'static>(&self) -> RegistrationState {
        self.rust_types
            .get(&TypeId::of::<T>())
            .and_then(|ty| self.get(*ty))
            .map_or(RegistrationState::Unregistered, Type::state)
    }

    /// The modifier type wrapping `inner`, if it was ever created.
    pub fn qualified(&self, modifier: Modifier, inner: TypeRef) -> Option<TypeRef> {
        self.modifiers.get(&(modifier, inner)).copied()
    }

    /// `ty` followed by each of its base types, up to the root.
    pub fn base_chain(&self, ty: TypeRef) -> impl Iterator<Item = TypeRef> + '_ {
        std::iter::successors(Some(ty), |current| {
            self.get(*current).and_then(Type::base_type)
        })
    }

    /// Whether `target` is `ty` or one of its base types.
    pub fn is_a(&self, ty: TypeRef, target: TypeRef) -> bool {
        self.base_chain(ty).any(|current| current == target)
    }

    /// Same walk as [`Self::is_a`], but stopping before `stop_at` is tested.
    ///
    /// `stop_at` is exclusive: reaching it ends the walk with `false`, even when it is
    /// also `target`. It must be `ty` itself or one of its base types, anything else
    /// fails with [`ReflError::InvalidAncestor`].
    pub fn is_a_bounded(&self, ty: TypeRef, target: TypeRef, stop_at: TypeRef) -> ReflResult<bool> {
        if !self.is_a(ty, stop_at) {
            return Err(ReflError::InvalidAncestor {
                ty: self.describe(ty),
                stop_at: self.describe(stop_at),
            });
        }

        Ok(self
            .base_chain(ty)
            .take_while(|current| *current != stop_at)
            .any(|current| current == target))
    }

    /// Strip every pointer, reference and const layer around `ty`.
    ///
    /// One layer is removed per step, pointer-to first, then reference-to, then
    /// const-of, so a node carrying several links always unwinds the same way.
    pub fn most_basic_type(&self, ty: TypeRef) -> TypeRef {
        let mut current = ty;

        while let Some((_, inner)) = self.get(current).and_then(Type::modifier) {
            current = inner;
        }

        current
    }
}

/// Mutable registry used during startup.
///
/// Dereferences to [`TypeRegistry`] for every query, so registration routines can
/// look at types registered before them.
#[derive(Debug)]
pub struct RegistryBuilder {
    registry: TypeRegistry,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for RegistryBuilder {
    type Target = TypeRegistry;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            registry: TypeRegistry::with_config(config),
        }
    }

    pub(crate) fn node(&self, ty: TypeRef) -> &Type {
        // Handles passed here were minted by this registry.
        &self.registry.types[ty.index()]
    }

    pub(crate) fn node_mut(&mut self, ty: TypeRef) -> &mut Type {
        &mut self.registry.types[ty.index()]
    }

    fn alloc(&mut self, decl: TypeDecl, rust_name: Option<&'static str>, state: RegistrationState) -> TypeRef {
        let ty = TypeRef::from_index(self.registry.types.len());
        self.registry.types.push(Type::new(ty, decl, rust_name, state));
        ty
    }

    /// Enter `ty` in the global table under `name`.
    ///
    /// The first registration of a name wins: a second one logs a warning, leaves the
    /// table untouched and returns [`ReflError::DuplicateTypeName`], which callers are
    /// free to ignore.
    pub fn add_global_type(&mut self, name: &str, ty: TypeRef) -> ReflResult<()> {
        if self.registry.global.contains_key(name) {
            warn!("Type of the name `{}` already exists, not adding.", name);
            return Err(ReflError::DuplicateTypeName {
                name: name.to_owned(),
            });
        }

        self.registry.global.insert(name.to_owned(), ty);
        Ok(())
    }

    /// Run the registration routine of `T`.
    ///
    /// Registering an already registered type returns its existing handle. Every
    /// type `T` refers to (base type, parameter and return types) must have been
    /// registered first, [`TypeRef`] included since each type gets a
    /// `GetStaticType` function returning one.
    pub fn register<T: Reflect>(&mut self) -> ReflResult<TypeRef> {
        if let Some(&existing) = self.registry.rust_types.get(&TypeId::of::<T>()) {
            if self.node(existing).state().is_registered() {
                debug!("Type `{}` is already registered", T::NAME);
                return Ok(existing);
            }

            return Err(ReflError::IncompleteRegistration {
                name: T::NAME.to_owned(),
            });
        }

        let ty = self.alloc(
            TypeDecl::new(T::NAME, TypeSizes::of::<T>()),
            Some(type_name::<T>()),
            RegistrationState::Registering,
        );
        self.registry.rust_types.insert(TypeId::of::<T>(), ty);
        self.add_global_type(T::NAME, ty).ok();

        let mut builder = TypeBuilder::<T>::new(self, ty);
        builder
            .function(GET_STATIC_TYPE_FN_NAME, move || ty)?
            .set_documentation("Reflected type of this object.");
        T::register(&mut builder)?;

        let node = self.node_mut(ty);
        node.set_state(RegistrationState::Registered);
        debug!(
            "Registered type `{}` as {} ({} function(s), {} propert(ies), {} field(s))",
            node.name(),
            ty,
            node.functions().count(),
            node.properties().count(),
            node.fields().count(),
        );

        Ok(ty)
    }

    /// Declare a type that has no Rust counterpart.
    ///
    /// Base and modifier links must name types of this registry, and the base type
    /// must be fully registered. The node is registered right away; its name is
    /// entered in the global table unless already taken.
    pub fn declare_type(&mut self, decl: TypeDecl) -> ReflResult<TypeRef> {
        if let Some(dangling) = decl.links().find(|link| self.get(*link).is_none()) {
            return Err(ReflError::UnknownTypeRef(dangling));
        }

        if let Some(base) = decl.base_type
            && !self.node(base).state().is_registered()
        {
            return Err(ReflError::BaseNotRegistered {
                ty: decl.name.clone(),
                base: self.describe(base),
            });
        }

        let name = decl.name.clone();
        let ty = self.alloc(decl, None, RegistrationState::Registered);
        self.add_global_type(&name, ty).ok();
        debug!("Declared type `{}` as {}", name, ty);

        Ok(ty)
    }

    /// Get or create the type adding `modifier` around `inner`.
    pub fn qualify(&mut self, modifier: Modifier, inner: TypeRef) -> ReflResult<TypeRef> {
        if let Some(existing) = self.registry.qualified(modifier, inner) {
            return Ok(existing);
        }

        let inner_node = self.get(inner).ok_or(ReflError::UnknownTypeRef(inner))?;
        let name = modifier.qualified_name(inner_node.name());
        let sizes = match modifier {
            Modifier::ConstOf => inner_node.sizes(),
            Modifier::PointerTo | Modifier::ReferenceTo => TypeSizes {
                allocated: size_of::<usize>(),
                stored: size_of::<usize>(),
                unqualified: inner_node.unqualified_size(),
            },
        };

        let ty = self.alloc(
            TypeDecl::new(name.clone(), sizes).with_modifier(modifier, inner),
            None,
            RegistrationState::Registered,
        );
        self.registry.modifiers.insert((modifier, inner), ty);
        self.add_global_type(&name, ty).ok();
        debug!("New modifier type `{}` registered as {}", name, ty);

        Ok(ty)
    }

    pub fn pointer_to(&mut self, inner: TypeRef) -> ReflResult<TypeRef> {
        self.qualify(Modifier::PointerTo, inner)
    }

    pub fn reference_to(&mut self, inner: TypeRef) -> ReflResult<TypeRef> {
        self.qualify(Modifier::ReferenceTo, inner)
    }

    pub fn const_of(&mut self, inner: TypeRef) -> ReflResult<TypeRef> {
        self.qualify(Modifier::ConstOf, inner)
    }

    pub(crate) fn set_base(&mut self, ty: TypeRef, base: TypeRef) -> ReflResult<()> {
        let registered = self.get(base).is_some_and(|node| node.state().is_registered());
        if !registered {
            return Err(ReflError::BaseNotRegistered {
                ty: self.describe(ty),
                base: self.describe(base),
            });
        }

        self.node_mut(ty).set_base_type(base);
        Ok(())
    }

    /// End the registration phase.
    pub fn finish(self) -> ReflResult<TypeRegistry> {
        if let Some(pending) = self.registry.types().find(|ty| !ty.state().is_registered()) {
            return Err(ReflError::IncompleteRegistration {
                name: pending.name().to_owned(),
            });
        }

        Ok(self.registry)
    }
}
