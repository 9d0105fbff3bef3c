//! Types module
//!
//! A [`Type`] node describes one type identity: a concrete type, or a pointer,
//! reference or const qualification of another type. Nodes live in the arena of a
//! [`TypeRegistry`](registry::TypeRegistry) and refer to each other through
//! [`TypeRef`] handles, never through owned pointers:
//!
//! - `base_type` forms the inheritance chain queried by `is_a`,
//! - `pointer_to` / `reference_to` / `const_of` form the modifier chain stripped by
//!   `most_basic_type`,
//! - every [`Function`], [`Property`] and [`Field`] records its owning type.
//!
//! A link can only be created towards a node that already exists, so both chains
//! always terminate.
use std::{
    collections::{BTreeMap, btree_map::Entry},
    hash::{DefaultHasher, Hash, Hasher},
};

use log::warn;
use strum::{Display, EnumIs};

use crate::{
    attributes::Attribute,
    descriptors::{Documented, DocumentedObject, Field, Function, Property},
    utils::{
        conf::DuplicateMemberPolicy,
        error::{MemberKind, ReflError, ReflResult},
    },
};

pub mod registry;

/// A stable reference to a type stored inside a [`TypeRegistry`](registry::TypeRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeRef(u32);

impl TypeRef {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in the registry arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// One layer of qualification wrapped around another type.
///
/// The declaration order is the order in which [`Type::modifier`] peels layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIs)]
pub enum Modifier {
    PointerTo,
    ReferenceTo,
    ConstOf,
}

impl Modifier {
    /// Name of the qualified type built from the name of the inner one.
    pub fn qualified_name(self, inner: &str) -> String {
        match self {
            Modifier::PointerTo => format!("{inner}*"),
            Modifier::ReferenceTo => format!("{inner}&"),
            Modifier::ConstOf => format!("const {inner}"),
        }
    }
}

/// Progress of a type through its registration routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIs)]
pub enum RegistrationState {
    Unregistered,
    Registering,
    Registered,
}

/// Byte sizes recorded for a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeSizes {
    pub allocated: usize,
    pub stored: usize,
    pub unqualified: usize,
}

impl TypeSizes {
    /// Sizes of a concrete Rust type.
    pub const fn of<T>() -> Self {
        Self::uniform(std::mem::size_of::<T>())
    }

    pub const fn uniform(size: usize) -> Self {
        Self {
            allocated: size,
            stored: size,
            unqualified: size,
        }
    }
}

/// Declaration of a type without a Rust counterpart, see
/// [`RegistryBuilder::declare_type`](registry::RegistryBuilder::declare_type).
#[derive(Debug, Clone, Default)]
pub struct TypeDecl {
    pub name: String,
    pub sizes: TypeSizes,
    pub base_type: Option<TypeRef>,
    pub pointer_to: Option<TypeRef>,
    pub reference_to: Option<TypeRef>,
    pub const_of: Option<TypeRef>,
    pub documentation: String,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, sizes: TypeSizes) -> Self {
        Self {
            name: name.into(),
            sizes,
            ..Default::default()
        }
    }

    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base_type = Some(base);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier, inner: TypeRef) -> Self {
        match modifier {
            Modifier::PointerTo => self.pointer_to = Some(inner),
            Modifier::ReferenceTo => self.reference_to = Some(inner),
            Modifier::ConstOf => self.const_of = Some(inner),
        }
        self
    }

    pub(crate) fn links(&self) -> impl Iterator<Item = TypeRef> + '_ {
        [
            self.base_type,
            self.pointer_to,
            self.reference_to,
            self.const_of,
        ]
        .into_iter()
        .flatten()
    }
}

/// Metadata node for one type identity.
#[derive(Debug)]
pub struct Type {
    id: TypeRef,
    name: String,
    hash: u64,
    sizes: TypeSizes,
    rust_name: Option<&'static str>,
    state: RegistrationState,

    base_type: Option<TypeRef>,
    pointer_to: Option<TypeRef>,
    reference_to: Option<TypeRef>,
    const_of: Option<TypeRef>,

    doc: DocumentedObject,
    attributes: Vec<Attribute>,

    functions: BTreeMap<String, Function>,
    properties: BTreeMap<String, Property>,
    fields: BTreeMap<String, Field>,
}

/// Stable identifier of a type name.
pub fn hash_name(name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

impl Type {
    pub(crate) fn new(
        id: TypeRef,
        decl: TypeDecl,
        rust_name: Option<&'static str>,
        state: RegistrationState,
    ) -> Self {
        Self {
            id,
            hash: hash_name(&decl.name),
            name: decl.name,
            sizes: decl.sizes,
            rust_name,
            state,
            base_type: decl.base_type,
            pointer_to: decl.pointer_to,
            reference_to: decl.reference_to,
            const_of: decl.const_of,
            doc: DocumentedObject::new(decl.documentation),
            attributes: Vec::new(),
            functions: BTreeMap::new(),
            properties: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> TypeRef {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn allocated_size(&self) -> usize {
        self.sizes.allocated
    }

    pub fn stored_size(&self) -> usize {
        self.sizes.stored
    }

    pub fn unqualified_size(&self) -> usize {
        self.sizes.unqualified
    }

    pub fn sizes(&self) -> TypeSizes {
        self.sizes
    }

    /// [`std::any::type_name`] of the Rust type this node was registered from.
    pub fn rust_name(&self) -> Option<&'static str> {
        self.rust_name
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: RegistrationState) {
        self.state = state;
    }

    pub fn base_type(&self) -> Option<TypeRef> {
        self.base_type
    }

    pub(crate) fn set_base_type(&mut self, base: TypeRef) {
        self.base_type = Some(base);
    }

    pub fn pointer_to(&self) -> Option<TypeRef> {
        self.pointer_to
    }

    pub fn reference_to(&self) -> Option<TypeRef> {
        self.reference_to
    }

    pub fn const_of(&self) -> Option<TypeRef> {
        self.const_of
    }

    /// Outermost modifier layer, by priority pointer-to, reference-to, const-of.
    pub fn modifier(&self) -> Option<(Modifier, TypeRef)> {
        self.pointer_to
            .map(|inner| (Modifier::PointerTo, inner))
            .or_else(|| self.reference_to.map(|inner| (Modifier::ReferenceTo, inner)))
            .or_else(|| self.const_of.map(|inner| (Modifier::ConstOf, inner)))
    }

    pub fn is_qualified(&self) -> bool {
        self.modifier().is_some()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub(crate) fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// First field registered under `name`.
    pub fn first_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn add_function(
        &mut self,
        function: Function,
        policy: DuplicateMemberPolicy,
    ) -> ReflResult<&mut Function> {
        let name = function.name().to_owned();
        insert_member(&self.name, MemberKind::Function, &mut self.functions, name, function, policy)
    }

    pub fn add_property(
        &mut self,
        property: Property,
        policy: DuplicateMemberPolicy,
    ) -> ReflResult<&mut Property> {
        let name = property.name().to_owned();
        insert_member(&self.name, MemberKind::Property, &mut self.properties, name, property, policy)
    }

    pub fn add_field(&mut self, field: Field, policy: DuplicateMemberPolicy) -> ReflResult<&mut Field> {
        let name = field.name().to_owned();
        insert_member(&self.name, MemberKind::Field, &mut self.fields, name, field, policy)
    }
}

fn insert_member<'a, D>(
    owner: &str,
    kind: MemberKind,
    members: &'a mut BTreeMap<String, D>,
    name: String,
    member: D,
    policy: DuplicateMemberPolicy,
) -> ReflResult<&'a mut D> {
    match members.entry(name) {
        Entry::Vacant(entry) => Ok(entry.insert(member)),
        Entry::Occupied(mut entry) => match policy {
            DuplicateMemberPolicy::Reject => Err(ReflError::DuplicateMember {
                owner: owner.to_owned(),
                kind,
                name: entry.key().clone(),
            }),
            DuplicateMemberPolicy::Overwrite => {
                warn!("Overwriting {} `{}::{}`", kind, owner, entry.key());
                entry.insert(member);
                Ok(entry.into_mut())
            }
        },
    }
}

impl Documented for Type {
    fn documented(&self) -> &DocumentedObject {
        &self.doc
    }

    fn documented_mut(&mut self) -> &mut DocumentedObject {
        &mut self.doc
    }
}
