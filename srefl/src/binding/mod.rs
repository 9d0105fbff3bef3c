//! Binding engine
//!
//! Turns native callables into data. Each of the three traits below is
//! implemented for every `Fn` closure or fn item taking up to six explicit
//! arguments, and produces:
//! - a [`Signature`], the receiver kind plus the Rust types of the return value and
//!   of each explicit argument, later resolved to [`TypeRef`](crate::types::TypeRef)s,
//! - a [`Thunk`], a type-erased entry point that downcasts its receiver and
//!   arguments back to the original types before calling.
//!
//! The `Marker` parameter is the `fn` pointer type of the explicit arguments. It
//! only exists so that one closure matches exactly one impl.
use std::any::{Any, TypeId, type_name};

use smallvec::{SmallVec, smallvec};
use strum::{Display, EnumIs};

use crate::utils::error::InvocationError;

pub mod builder;

/// Owned, boxed arguments of a call, in declaration order.
pub type ArgList = SmallVec<[Box<dyn Any>; 4]>;

/// Type-erased invocation entry point of a [`Function`](crate::descriptors::Function).
pub type Thunk =
    Box<dyn Fn(Receiver<'_>, ArgList) -> Result<Box<dyn Any>, InvocationError> + Send + Sync>;

/// Identity of a Rust type before it is resolved against a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RustType {
    pub id: TypeId,
    pub name: &'static str,
}

impl RustType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// How a callable receives the object it is called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIs)]
pub enum ReceiverKind {
    /// Free function, no implicit receiver.
    None,
    /// `&self`.
    Ref,
    /// `&mut self`.
    Mut,
}

/// Deduced shape of a native callable.
#[derive(Debug, Clone)]
pub struct Signature {
    pub receiver: ReceiverKind,
    pub return_type: RustType,
    pub parameters: SmallVec<[RustType; 4]>,
}

/// Object a [`Thunk`] is invoked on.
pub enum Receiver<'a> {
    None,
    Ref(&'a dyn Any),
    Mut(&'a mut dyn Any),
}

impl<'a> Receiver<'a> {
    pub fn kind(&self) -> ReceiverKind {
        match self {
            Receiver::None => ReceiverKind::None,
            Receiver::Ref(_) => ReceiverKind::Ref,
            Receiver::Mut(_) => ReceiverKind::Mut,
        }
    }

    fn expect_none(&self) -> Result<(), InvocationError> {
        match self {
            Receiver::None => Ok(()),
            _ => Err(InvocationError::UnexpectedReceiver),
        }
    }

    fn into_ref<S: Any>(self) -> Result<&'a S, InvocationError> {
        let target: &'a dyn Any = match self {
            Receiver::None => {
                return Err(InvocationError::MissingReceiver {
                    expected: type_name::<S>(),
                });
            }
            Receiver::Ref(target) => target,
            Receiver::Mut(target) => target,
        };

        target.downcast_ref::<S>().ok_or(InvocationError::ReceiverType {
            expected: type_name::<S>(),
        })
    }

    fn into_mut<S: Any>(self) -> Result<&'a mut S, InvocationError> {
        match self {
            Receiver::None => Err(InvocationError::MissingReceiver {
                expected: type_name::<S>(),
            }),
            Receiver::Ref(_) => Err(InvocationError::ImmutableReceiver {
                expected: type_name::<S>(),
            }),
            Receiver::Mut(target) => target.downcast_mut::<S>().ok_or(InvocationError::ReceiverType {
                expected: type_name::<S>(),
            }),
        }
    }
}

/// Pops the arguments of a call one by one, checking their types.
struct ArgReader {
    args: smallvec::IntoIter<[Box<dyn Any>; 4]>,
    index: usize,
    expected: usize,
}

impl ArgReader {
    fn new(args: ArgList, expected: usize) -> Result<Self, InvocationError> {
        if args.len() != expected {
            return Err(InvocationError::ArgumentCount {
                expected,
                found: args.len(),
            });
        }

        Ok(Self {
            args: args.into_iter(),
            index: 0,
            expected,
        })
    }

    fn next<T: Any>(&mut self) -> Result<T, InvocationError> {
        let index = self.index;
        self.index += 1;

        let arg = self.args.next().ok_or(InvocationError::ArgumentCount {
            expected: self.expected,
            found: index,
        })?;

        arg.downcast::<T>()
            .map(|arg| *arg)
            .map_err(|_| InvocationError::ArgumentType {
                index,
                expected: type_name::<T>(),
            })
    }
}

/// A free function, or a closure that does not take a receiver.
pub trait NativeFunction<Marker>: Send + Sync + 'static {
    fn signature(&self) -> Signature;

    fn into_thunk(self) -> Thunk;
}

/// A callable taking `&S` as implicit receiver.
pub trait NativeMethod<S, Marker>: Send + Sync + 'static {
    fn signature(&self) -> Signature;

    fn into_thunk(self) -> Thunk;
}

/// A callable taking `&mut S` as implicit receiver.
pub trait NativeMethodMut<S, Marker>: Send + Sync + 'static {
    fn signature(&self) -> Signature;

    fn into_thunk(self) -> Thunk;
}

macro_rules! count_args {
    () => { 0usize };
    ($head:ident $(, $tail:ident)*) => { 1usize + count_args!($($tail),*) };
}

macro_rules! impl_native_bindings {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg,)*> NativeFunction<fn($($arg),*) -> Ret> for Func
        where
            Func: Fn($($arg),*) -> Ret + Send + Sync + 'static,
            Ret: Any,
            $($arg: Any,)*
        {
            fn signature(&self) -> Signature {
                Signature {
                    receiver: ReceiverKind::None,
                    return_type: RustType::of::<Ret>(),
                    parameters: smallvec![$(RustType::of::<$arg>()),*],
                }
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_thunk(self) -> Thunk {
                let func = self;
                Box::new(move |receiver: Receiver<'_>, args: ArgList| {
                    receiver.expect_none()?;
                    let mut reader = ArgReader::new(args, count_args!($($arg),*))?;
                    $(let $arg = reader.next::<$arg>()?;)*
                    Ok(Box::new(func($($arg),*)) as Box<dyn Any>)
                })
            }
        }

        impl<Func, Recv, Ret, $($arg,)*> NativeMethod<Recv, fn($($arg),*) -> Ret> for Func
        where
            Func: Fn(&Recv $(, $arg)*) -> Ret + Send + Sync + 'static,
            Recv: Any,
            Ret: Any,
            $($arg: Any,)*
        {
            fn signature(&self) -> Signature {
                Signature {
                    receiver: ReceiverKind::Ref,
                    return_type: RustType::of::<Ret>(),
                    parameters: smallvec![$(RustType::of::<$arg>()),*],
                }
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_thunk(self) -> Thunk {
                let func = self;
                Box::new(move |receiver: Receiver<'_>, args: ArgList| {
                    let target = receiver.into_ref::<Recv>()?;
                    let mut reader = ArgReader::new(args, count_args!($($arg),*))?;
                    $(let $arg = reader.next::<$arg>()?;)*
                    Ok(Box::new(func(target $(, $arg)*)) as Box<dyn Any>)
                })
            }
        }

        impl<Func, Recv, Ret, $($arg,)*> NativeMethodMut<Recv, fn($($arg),*) -> Ret> for Func
        where
            Func: Fn(&mut Recv $(, $arg)*) -> Ret + Send + Sync + 'static,
            Recv: Any,
            Ret: Any,
            $($arg: Any,)*
        {
            fn signature(&self) -> Signature {
                Signature {
                    receiver: ReceiverKind::Mut,
                    return_type: RustType::of::<Ret>(),
                    parameters: smallvec![$(RustType::of::<$arg>()),*],
                }
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_thunk(self) -> Thunk {
                let func = self;
                Box::new(move |receiver: Receiver<'_>, args: ArgList| {
                    let target = receiver.into_mut::<Recv>()?;
                    let mut reader = ArgReader::new(args, count_args!($($arg),*))?;
                    $(let $arg = reader.next::<$arg>()?;)*
                    Ok(Box::new(func(target $(, $arg)*)) as Box<dyn Any>)
                })
            }
        }
    };
}

impl_native_bindings!();
impl_native_bindings!(A1);
impl_native_bindings!(A1, A2);
impl_native_bindings!(A1, A2, A3);
impl_native_bindings!(A1, A2, A3, A4);
impl_native_bindings!(A1, A2, A3, A4, A5);
impl_native_bindings!(A1, A2, A3, A4, A5, A6);
