//! Attributes
//!
//! Markers attached to types, functions, properties and fields. An attribute
//! checks the descriptor it is attached to and refuses targets it cannot apply
//! to, so an attached attribute always holds for its target.
use std::fmt::Debug;

use downcast_rs::{DowncastSync, impl_downcast};
use strum::EnumIs;

use crate::{
    descriptors::{Function, Property},
    types::Type,
    utils::error::{ReflError, ReflResult},
};

/// Descriptor an attribute is being attached to.
#[derive(Debug, Clone, Copy)]
pub enum AttributeTarget<'a> {
    Type(&'a Type),
    Function { owner: &'a str, function: &'a Function },
    Property { owner: &'a str, property: &'a Property },
}

impl AttributeTarget<'_> {
    /// Human readable description, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            AttributeTarget::Type(ty) => format!("type `{}`", ty.name()),
            AttributeTarget::Function { owner, function } => {
                format!("function `{}::{}`", owner, function.name())
            }
            AttributeTarget::Property { owner, property } => {
                format!("property `{}::{}`", owner, property.name())
            }
        }
    }
}

/// Extension point for attributes defined outside of this crate.
pub trait CustomAttribute: DowncastSync + Debug {
    fn name(&self) -> &str;

    fn validate(&self, target: AttributeTarget<'_>) -> ReflResult<()> {
        let _ = target;
        Ok(())
    }
}
impl_downcast!(sync CustomAttribute);

/// Marks a property as taking part in serialization.
///
/// Only properties (fields included) can be serializable, and only when they can
/// be both read and written with the same value type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Serializable;

impl Serializable {
    pub const NAME: &'static str = "Serializable";

    fn validate(self, target: AttributeTarget<'_>) -> ReflResult<()> {
        let (owner, property) = match target {
            AttributeTarget::Property { owner, property } => (owner, property),
            other => {
                return Err(ReflError::InvalidAttributeTarget {
                    attribute: Self::NAME.to_owned(),
                    target: other.describe(),
                });
            }
        };

        let malformed = |reason: &str| ReflError::MalformedProperty {
            owner: owner.to_owned(),
            property: property.name().to_owned(),
            reason: format!("cannot be serializable, {}", reason),
        };

        let Some(getter_type) = property.getter_type() else {
            return Err(malformed("it has no getter"));
        };

        let Some(setter) = property.setter() else {
            return Err(malformed("it has no setter"));
        };

        if setter.arity() != 1 {
            return Err(malformed("its setter must take exactly one value parameter"));
        }

        if property.setter_type() != Some(getter_type) {
            return Err(malformed("its setter and getter disagree on the value type"));
        }

        Ok(())
    }
}

#[derive(Debug, EnumIs)]
pub enum Attribute {
    Serializable(Serializable),
    /// Plain named marker, valid on any target.
    Tag(String),
    Custom(Box<dyn CustomAttribute>),
}

impl Attribute {
    pub fn tag(name: impl Into<String>) -> Self {
        Attribute::Tag(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Serializable(_) => Serializable::NAME,
            Attribute::Tag(name) => name,
            Attribute::Custom(custom) => custom.name(),
        }
    }

    /// Check that this attribute can be attached to `target`.
    pub fn validate(&self, target: AttributeTarget<'_>) -> ReflResult<()> {
        match self {
            Attribute::Serializable(serializable) => serializable.validate(target),
            Attribute::Tag(_) => Ok(()),
            Attribute::Custom(custom) => custom.validate(target),
        }
    }

    pub fn downcast_ref<A: CustomAttribute>(&self) -> Option<&A> {
        match self {
            Attribute::Custom(custom) => custom.downcast_ref::<A>(),
            _ => None,
        }
    }
}

impl From<Serializable> for Attribute {
    fn from(value: Serializable) -> Self {
        Attribute::Serializable(value)
    }
}

impl<A: CustomAttribute> From<A> for Attribute {
    fn from(value: A) -> Self {
        Attribute::Custom(Box::new(value))
    }
}
