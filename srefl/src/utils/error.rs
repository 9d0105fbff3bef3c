use strum::Display;
use thiserror::Error;

use crate::types::TypeRef;

/// Collection of a [`Type`](crate::types::Type) a member lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    Function,
    Property,
    Field,
}

/// Failure raised while calling a type-erased [`Thunk`](crate::binding::Thunk).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("expected {expected} argument(s), got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("argument {index} should be a `{expected}`")]
    ArgumentType { index: usize, expected: &'static str },

    #[error("a receiver of type `{expected}` is required")]
    MissingReceiver { expected: &'static str },

    #[error("the receiver is not a `{expected}`")]
    ReceiverType { expected: &'static str },

    #[error("the receiver of type `{expected}` must be passed mutably")]
    ImmutableReceiver { expected: &'static str },

    #[error("the function does not take a receiver")]
    UnexpectedReceiver,

    #[error("the returned value is not a `{expected}`")]
    ReturnType { expected: &'static str },

    #[error("the property has no {accessor}")]
    MissingAccessor { accessor: &'static str },
}

#[derive(Debug, Error)]
pub enum ReflError {
    #[error("A type named `{name}` already exists, keeping the first registration.")]
    DuplicateTypeName { name: String },

    #[error(
        "Could not find a type named `{name}`, was it renamed, misspelled or never registered?"
    )]
    UnknownTypeName { name: String },

    #[error(
        "The Rust type `{rust_name}` is not registered. Register it before any type that refers to it."
    )]
    UnregisteredType { rust_name: &'static str },

    #[error("The handle `{0}` does not belong to this registry.")]
    UnknownTypeRef(TypeRef),

    #[error("`{base}` cannot be used as the base of `{ty}`, it has not finished registering.")]
    BaseNotRegistered { ty: String, base: String },

    #[error("Property `{owner}::{property}` is malformed: {reason}.")]
    MalformedProperty {
        owner: String,
        property: String,
        reason: String,
    },

    #[error(
        "Function `{function}` takes {expected} explicit parameter(s) but {found} name(s) were given. Pass either none or exactly one name per parameter."
    )]
    ParameterNameArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("`{stop_at}` is not `{ty}` nor one of its base types, it cannot bound an IsA query.")]
    InvalidAncestor { ty: String, stop_at: String },

    #[error("Type `{owner}` already has a {kind} named `{name}`.")]
    DuplicateMember {
        owner: String,
        kind: MemberKind,
        name: String,
    },

    #[error("Attribute `{attribute}` cannot be attached to {target}.")]
    InvalidAttributeTarget { attribute: String, target: String },

    #[error("Registration of type `{name}` never completed.")]
    IncompleteRegistration { name: String },

    #[error("Call to `{function}` failed: {source}")]
    Invocation {
        function: String,
        source: InvocationError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParse {
        source: toml::de::Error,
        file: String,
    },
}

pub type ReflResult<T> = Result<T, ReflError>;
