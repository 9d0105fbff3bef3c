use std::any::{Any, type_name};

use log::warn;
use smallvec::smallvec;

use crate::{
    attributes::Attribute,
    binding::{Receiver, ReceiverKind},
    descriptors::{Documented, DocumentedObject, Function},
    types::{TypeRef, registry::TypeRegistry},
    utils::error::{InvocationError, ReflError, ReflResult},
};

/// A named value exposed through a getter, a setter, or both.
///
/// The owning type and the property type are derived from the accessors: the
/// getter gives its owner and the most basic form of its return type, the setter
/// gives its owner and the most basic form of its value parameter. The setter
/// wins when both are present.
#[derive(Debug)]
pub struct Property {
    name: String,
    owning_type: TypeRef,
    property_type: TypeRef,
    getter_type: Option<TypeRef>,
    setter_type: Option<TypeRef>,
    getter: Option<Function>,
    setter: Option<Function>,
    doc: DocumentedObject,
    attributes: Vec<Attribute>,
}

fn malformed(owner: &str, property: &str, reason: impl Into<String>) -> ReflError {
    ReflError::MalformedProperty {
        owner: owner.to_owned(),
        property: property.to_owned(),
        reason: reason.into(),
    }
}

impl Property {
    /// Build a property from bound accessors.
    ///
    /// At least one accessor is required, and a setter needs a value parameter. With
    /// [`RegistryConfig::strict_properties`](crate::utils::conf::RegistryConfig) the
    /// getter must take no explicit parameter and borrow its receiver immutably, the
    /// setter must take exactly one, and both must agree on the owning type and on the
    /// value type.
    pub fn new(
        name: impl Into<String>,
        getter: Option<Function>,
        setter: Option<Function>,
        registry: &TypeRegistry,
    ) -> ReflResult<Self> {
        let name = name.into();
        let strict = registry.config().strict_properties;

        let getter_side = getter
            .as_ref()
            .map(|getter| (getter.owning_type(), registry.most_basic_type(getter.return_type())));

        let setter_side = match &setter {
            Some(setter) => {
                let owner = registry.describe(setter.owning_type());
                let value = setter.explicit_parameters().first().ok_or_else(|| {
                    malformed(&owner, &name, "the setter does not take a value parameter")
                })?;
                Some((setter.owning_type(), registry.most_basic_type(value.ty)))
            }
            None => None,
        };

        let (owning_type, property_type) = match (getter_side, setter_side) {
            (_, Some(side)) | (Some(side), None) => side,
            (None, None) => {
                return Err(malformed(
                    "<unbound>",
                    &name,
                    "at least one of the getter and setter must be set",
                ));
            }
        };

        let owner = registry.describe(owning_type);
        let mut problems = Vec::new();

        if let Some(getter) = &getter
            && getter.arity() != 0
        {
            problems.push(format!(
                "the getter takes {} explicit parameter(s) instead of none",
                getter.arity()
            ));
        }

        if let Some(getter) = &getter
            && getter.receiver().is_mut()
        {
            problems.push("the getter takes its receiver mutably".to_owned());
        }

        if let Some(setter) = &setter
            && setter.arity() != 1
        {
            problems.push(format!(
                "the setter takes {} explicit parameter(s) instead of one",
                setter.arity()
            ));
        }

        if let (Some((getter_owner, getter_value)), Some((setter_owner, setter_value))) =
            (getter_side, setter_side)
        {
            if getter_owner != setter_owner {
                problems.push(format!(
                    "the getter belongs to `{}` but the setter to `{}`",
                    registry.describe(getter_owner),
                    registry.describe(setter_owner)
                ));
            }

            if getter_value != setter_value {
                problems.push(format!(
                    "the setter takes `{}` but the getter returns `{}`",
                    registry.describe(setter_value),
                    registry.describe(getter_value)
                ));
            }
        }

        if !problems.is_empty() {
            let reason = problems.join(", ");
            if strict {
                return Err(malformed(&owner, &name, reason));
            }

            warn!("Property `{}::{}` is inconsistent: {}", owner, name, reason);
        }

        Ok(Self {
            name,
            owning_type,
            property_type,
            getter_type: getter_side.map(|(_, value)| value),
            setter_type: setter_side.map(|(_, value)| value),
            getter,
            setter,
            doc: DocumentedObject::default(),
            attributes: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owning_type(&self) -> TypeRef {
        self.owning_type
    }

    pub fn property_type(&self) -> TypeRef {
        self.property_type
    }

    /// Most basic form of the getter return type.
    pub fn getter_type(&self) -> Option<TypeRef> {
        self.getter_type
    }

    /// Most basic form of the setter value parameter type.
    pub fn setter_type(&self) -> Option<TypeRef> {
        self.setter_type
    }

    pub fn getter(&self) -> Option<&Function> {
        self.getter.as_ref()
    }

    pub fn setter(&self) -> Option<&Function> {
        self.setter.as_ref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub(crate) fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn is_serializable(&self) -> bool {
        self.attributes.iter().any(Attribute::is_serializable)
    }

    /// Read the property on `target` through the getter.
    ///
    /// Getters without a receiver (enumerators) ignore `target`.
    pub fn get(&self, target: &dyn Any) -> ReflResult<Box<dyn Any>> {
        let getter = self.getter.as_ref().ok_or_else(|| self.missing("getter"))?;

        let receiver = match getter.receiver() {
            ReceiverKind::None => Receiver::None,
            ReceiverKind::Ref | ReceiverKind::Mut => Receiver::Ref(target),
        };

        getter.invoke(receiver, smallvec![])
    }

    pub fn get_as<V: Any>(&self, target: &dyn Any) -> ReflResult<V> {
        let value = self.get(target)?;

        value.downcast::<V>().map(|value| *value).map_err(|_| {
            self.invocation_error(InvocationError::ReturnType {
                expected: type_name::<V>(),
            })
        })
    }

    /// Write `value` on `target` through the setter.
    pub fn set(&self, target: &mut dyn Any, value: Box<dyn Any>) -> ReflResult<()> {
        let setter = self.setter.as_ref().ok_or_else(|| self.missing("setter"))?;

        let receiver = match setter.receiver() {
            ReceiverKind::None => Receiver::None,
            ReceiverKind::Ref => Receiver::Ref(target),
            ReceiverKind::Mut => Receiver::Mut(target),
        };

        setter.invoke(receiver, smallvec![value]).map(|_| ())
    }

    pub fn set_value<V: Any>(&self, target: &mut dyn Any, value: V) -> ReflResult<()> {
        self.set(target, Box::new(value))
    }

    fn missing(&self, accessor: &'static str) -> ReflError {
        self.invocation_error(InvocationError::MissingAccessor { accessor })
    }

    fn invocation_error(&self, source: InvocationError) -> ReflError {
        ReflError::Invocation {
            function: self.name.clone(),
            source,
        }
    }
}

impl Documented for Property {
    fn documented(&self) -> &DocumentedObject {
        &self.doc
    }

    fn documented_mut(&mut self) -> &mut DocumentedObject {
        &mut self.doc
    }
}
