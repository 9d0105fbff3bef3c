use std::any::Any;

use smallvec::SmallVec;

use crate::{
    attributes::Attribute,
    binding::{ArgList, Receiver, ReceiverKind, Signature, Thunk},
    descriptors::{Documented, DocumentedObject},
    magic::RECEIVER_PARAM_NAME,
    types::{TypeRef, registry::RegistryBuilder},
    utils::error::{InvocationError, ReflError, ReflResult},
};

/// One parameter of a [`Function`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeRef,
    pub name: Option<String>,
}

/// A callable bound to a type.
///
/// Parameters are fixed when the function is bound. For methods, parameter 0 is
/// the implicit receiver (`const S&` for `&self`, `S&` for `&mut self`), always
/// named `self`; the remaining ones are the explicit parameters.
pub struct Function {
    name: String,
    owning_type: TypeRef,
    return_type: TypeRef,
    receiver: ReceiverKind,
    parameters: SmallVec<[Parameter; 4]>,
    doc: DocumentedObject,
    attributes: Vec<Attribute>,
    thunk: Thunk,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("owning_type", &self.owning_type)
            .field("return_type", &self.return_type)
            .field("receiver", &self.receiver)
            .field("parameters", &self.parameters)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl Function {
    /// Resolve `signature` against `registry` and build the descriptor.
    ///
    /// Every type in the signature must be registered, except `owning_type` which
    /// may still be running its registration routine.
    pub fn bind(
        name: impl Into<String>,
        owning_type: TypeRef,
        signature: Signature,
        thunk: Thunk,
        registry: &mut RegistryBuilder,
    ) -> ReflResult<Self> {
        let return_type = registry.resolve_for(owning_type, &signature.return_type)?;

        let mut parameters = SmallVec::new();
        let receiver_type = match signature.receiver {
            ReceiverKind::None => None,
            ReceiverKind::Ref => {
                let constant = registry.const_of(owning_type)?;
                Some(registry.reference_to(constant)?)
            }
            ReceiverKind::Mut => Some(registry.reference_to(owning_type)?),
        };
        if let Some(ty) = receiver_type {
            parameters.push(Parameter {
                ty,
                name: Some(RECEIVER_PARAM_NAME.to_owned()),
            });
        }

        for parameter in &signature.parameters {
            parameters.push(Parameter {
                ty: registry.resolve_for(owning_type, parameter)?,
                name: None,
            });
        }

        Ok(Self {
            name: name.into(),
            owning_type,
            return_type,
            receiver: signature.receiver,
            parameters,
            doc: DocumentedObject::default(),
            attributes: Vec::new(),
            thunk,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owning_type(&self) -> TypeRef {
        self.owning_type
    }

    pub fn return_type(&self) -> TypeRef {
        self.return_type
    }

    pub fn receiver(&self) -> ReceiverKind {
        self.receiver
    }

    /// Every parameter, receiver included.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Parameters following the receiver.
    pub fn explicit_parameters(&self) -> &[Parameter] {
        match self.receiver {
            ReceiverKind::None => &self.parameters,
            ReceiverKind::Ref | ReceiverKind::Mut => &self.parameters[1..],
        }
    }

    pub fn arity(&self) -> usize {
        self.explicit_parameters().len()
    }

    /// Name the explicit parameters.
    ///
    /// Either no name at all (clearing any previous names) or exactly one name per
    /// explicit parameter must be given.
    pub fn set_parameter_names<I, S>(&mut self, names: I) -> ReflResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let expected = self.arity();

        if !names.is_empty() && names.len() != expected {
            return Err(ReflError::ParameterNameArityMismatch {
                function: self.name.clone(),
                expected,
                found: names.len(),
            });
        }

        let offset = self.parameters.len() - expected;
        let mut names = names.into_iter();
        for parameter in &mut self.parameters[offset..] {
            parameter.name = names.next();
        }

        Ok(())
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub(crate) fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Call the bound native function.
    pub fn invoke(&self, receiver: Receiver<'_>, args: ArgList) -> ReflResult<Box<dyn Any>> {
        (self.thunk)(receiver, args).map_err(|source| self.invocation_error(source))
    }

    pub(crate) fn invocation_error(&self, source: InvocationError) -> ReflError {
        ReflError::Invocation {
            function: self.name.clone(),
            source,
        }
    }
}

impl Documented for Function {
    fn documented(&self) -> &DocumentedObject {
        &self.doc
    }

    fn documented_mut(&mut self) -> &mut DocumentedObject {
        &mut self.doc
    }
}
