mod common;

use srefl::{
    DuplicateMemberPolicy, Reflect, RegistrationState, RegistryBuilder, RegistryConfig, ReflError,
    ReflResult, TypeBuilder, TypeDecl, TypeRef, TypeRegistry, TypeSizes,
    binding::Receiver,
    magic::GET_STATIC_TYPE_FN_NAME,
};
use smallvec::smallvec;

struct Widget;

impl Reflect for Widget {
    const NAME: &'static str = "Widget";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.function("Create", || 3u32)?;
        Ok(())
    }
}

struct Echo;

impl Reflect for Echo {
    const NAME: &'static str = "Echo";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.function("Ping", || 1u8)?;
        builder.function("Ping", || 2u8)?;
        Ok(())
    }
}

struct SelfParent;

impl Reflect for SelfParent {
    const NAME: &'static str = "SelfParent";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_base::<SelfParent>()?;
        Ok(())
    }
}

struct NeverRegistered;

struct Outer;

impl Reflect for Outer {
    const NAME: &'static str = "Outer";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.registry().register::<Inner>()?;
        Ok(())
    }
}

struct Inner;

impl Reflect for Inner {
    const NAME: &'static str = "Inner";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.function("MakeOuter", || Outer)?;
        Ok(())
    }
}

struct Node;

impl Reflect for Node {
    const NAME: &'static str = "Node";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.function("Make", || Node)?;
        Ok(())
    }
}

struct Declarer;

impl Reflect for Declarer {
    const NAME: &'static str = "Declarer";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        let this = builder.type_ref();
        builder
            .registry()
            .declare_type(TypeDecl::new("Declared", TypeSizes::uniform(1)).with_base(this))?;
        Ok(())
    }
}

struct Clock;

impl Reflect for Clock {
    const NAME: &'static str = "Clock";
}

mod legacy {
    use srefl::Reflect;

    pub struct Clock;

    impl Reflect for Clock {
        const NAME: &'static str = "Clock";
    }
}

#[test]
fn duplicate_global_name_keeps_first() {
    let mut builder = common::builder();
    let first = builder
        .declare_type(TypeDecl::new("Gadget", TypeSizes::uniform(4)))
        .unwrap();
    let second = builder
        .declare_type(TypeDecl::new("Gadget", TypeSizes::uniform(16)))
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(builder.get_global_type("Gadget"), Some(first));

    let err = builder.add_global_type("Gadget", second).unwrap_err();
    assert!(matches!(err, ReflError::DuplicateTypeName { ref name } if name == "Gadget"));
    assert_eq!(builder.get_global_type("Gadget"), Some(first));
}

#[test]
fn builtin_names_resolve_to_themselves() {
    let builder = common::builder();

    for name in [
        "TypeRef", "()", "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64",
        "usize", "f32", "f64", "String", "DocumentedObject", "Attribute", "Serializable",
        "Function", "Property", "Field", "Type",
    ] {
        let ty = builder.get_global_type(name).unwrap();
        let node = builder.get(ty).unwrap();
        assert_eq!(node.name(), name);
        assert_eq!(node.id(), ty);
        assert!(node.state().is_registered());
        assert!(builder.is_a(ty, ty), "`{}` should be a `{}`", name, name);
    }

    assert_eq!(builder.type_of::<f64>().unwrap(), builder.find_type("f64").unwrap());
    assert_eq!(builder.get(builder.type_of::<u16>().unwrap()).unwrap().allocated_size(), 2);
}

#[test]
fn lookup_miss_does_not_panic() {
    let builder = common::builder();

    assert_eq!(builder.get_global_type("DoesNotExist"), None);
    assert!(matches!(
        builder.find_type("DoesNotExist"),
        Err(ReflError::UnknownTypeName { .. })
    ));
    assert!(matches!(
        builder.type_of::<NeverRegistered>(),
        Err(ReflError::UnregisteredType { .. })
    ));
    assert_eq!(
        builder.registration_state::<NeverRegistered>(),
        RegistrationState::Unregistered
    );
}

#[test]
fn register_is_idempotent() {
    let mut builder = common::builder();
    let first = builder.register::<Widget>().unwrap();
    let count = builder.len();

    assert_eq!(builder.register::<Widget>().unwrap(), first);
    assert_eq!(builder.len(), count);
    assert_eq!(builder.registration_state::<Widget>(), RegistrationState::Registered);
}

#[test]
fn every_type_returns_itself_from_get_static_type() {
    let mut builder = common::builder();
    let widget = builder.register::<Widget>().unwrap();
    let registry = builder.finish().unwrap();

    let function = registry
        .get(widget)
        .unwrap()
        .function(GET_STATIC_TYPE_FN_NAME)
        .unwrap();
    assert_eq!(function.return_type(), registry.type_of::<TypeRef>().unwrap());
    assert_eq!(function.arity(), 0);

    let result = function.invoke(Receiver::None, smallvec![]).unwrap();
    assert_eq!(*result.downcast::<TypeRef>().unwrap(), widget);
}

#[test]
fn registering_before_builtins_is_detected() {
    let mut builder = RegistryBuilder::new();

    let err = builder.register::<Widget>().unwrap_err();
    assert!(matches!(err, ReflError::UnregisteredType { rust_name } if rust_name.ends_with("TypeRef")));
    assert_eq!(builder.registration_state::<Widget>(), RegistrationState::Registering);

    // Stuck in `Registering`, so neither a second attempt nor finishing succeeds.
    assert!(matches!(
        builder.register::<Widget>(),
        Err(ReflError::IncompleteRegistration { .. })
    ));
    assert!(matches!(
        builder.finish(),
        Err(ReflError::IncompleteRegistration { ref name }) if name == "Widget"
    ));
}

#[test]
fn base_must_be_registered() {
    let mut builder = common::builder();

    let err = builder.register::<SelfParent>().unwrap_err();
    assert!(matches!(err, ReflError::BaseNotRegistered { .. }));
}

#[test]
fn signature_cannot_use_a_type_still_registering() {
    let mut builder = common::builder();

    let err = builder.register::<Outer>().unwrap_err();
    assert!(matches!(err, ReflError::UnregisteredType { rust_name } if rust_name.ends_with("Outer")));
    assert_eq!(builder.registration_state::<Inner>(), RegistrationState::Registering);
    assert_eq!(builder.registration_state::<Outer>(), RegistrationState::Registering);

    // A routine may still refer to its own type.
    let node = builder.register::<Node>().unwrap();
    let make = builder.get(node).unwrap().function("Make").unwrap();
    assert_eq!(make.return_type(), node);
}

#[test]
fn declared_base_must_be_registered() {
    let mut builder = common::builder();

    let err = builder.register::<Declarer>().unwrap_err();
    assert!(matches!(err, ReflError::BaseNotRegistered { ref ty, ref base } if ty == "Declared" && base == "Declarer"));
    assert_eq!(builder.get_global_type("Declared"), None);
}

#[test]
fn duplicate_reflect_name_keeps_first() {
    let mut builder = common::builder();

    let first = builder.register::<Clock>().unwrap();
    let second = builder.register::<legacy::Clock>().unwrap();

    assert_ne!(first, second);
    assert_eq!(builder.get_global_type("Clock"), Some(first));
    assert_eq!(builder.type_of::<legacy::Clock>().unwrap(), second);
    assert_eq!(builder.name_of(second), Some("Clock"));
    assert_eq!(
        builder.registration_state::<legacy::Clock>(),
        RegistrationState::Registered
    );
    assert!(builder.get(second).unwrap().function(GET_STATIC_TYPE_FN_NAME).is_some());
}

#[test]
fn duplicate_members_follow_configured_policy() {
    let mut builder = common::builder();
    let err = builder.register::<Echo>().unwrap_err();
    assert!(matches!(err, ReflError::DuplicateMember { ref name, .. } if name == "Ping"));

    let config = RegistryConfig {
        duplicate_members: DuplicateMemberPolicy::Overwrite,
        ..Default::default()
    };
    let mut builder = common::builder_with(config);
    let echo = builder.register::<Echo>().unwrap();

    let ping = builder.get(echo).unwrap().function("Ping").unwrap();
    let value = ping.invoke(Receiver::None, smallvec![]).unwrap();
    assert_eq!(*value.downcast::<u8>().unwrap(), 2);
}

#[test]
fn declared_links_must_exist() {
    // Handles minted by a larger registry do not exist in an empty one.
    let big = common::builder();
    let last = big.types().last().unwrap().id();

    let mut empty = RegistryBuilder::new();
    let err = empty
        .declare_type(TypeDecl::new("Orphan", TypeSizes::uniform(1)).with_base(last))
        .unwrap_err();
    assert!(matches!(err, ReflError::UnknownTypeRef(ty) if ty == last));
}

#[test]
fn finished_registry_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TypeRegistry>();

    let registry = common::builder().finish().unwrap();
    let names: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["bool", "f32", "Type"]
            .into_iter()
            .map(|name| {
                let registry = &registry;
                scope.spawn(move || {
                    let ty = registry.find_type(name).unwrap();
                    registry.name_of(ty).unwrap().to_owned()
                })
            })
            .collect();

        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(names, ["bool", "f32", "Type"]);
}
