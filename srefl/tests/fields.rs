mod common;

use srefl::{PropertyBinding, Reflect, ReflResult, TypeBuilder, TypeRegistry, field_accessor};

#[repr(C)]
#[derive(Debug, Default, Clone)]
struct Packed {
    tag: u8,
    length: u32,
    checksum: u16,
}

impl Reflect for Packed {
    const NAME: &'static str = "Packed";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.field("Tag", field_accessor!(Packed, tag), PropertyBinding::Get)?;
        builder.field("Length", field_accessor!(Packed, length), PropertyBinding::Set)?;
        builder.field("Checksum", field_accessor!(Packed, checksum), PropertyBinding::GetSet)?;
        Ok(())
    }
}

/// Layout left to the compiler.
#[derive(Debug, Default)]
struct Loose {
    flag: bool,
    ratio: f64,
    count: i16,
}

impl Reflect for Loose {
    const NAME: &'static str = "Loose";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.field("Flag", field_accessor!(Loose, flag), PropertyBinding::GetSet)?;
        builder.field("Ratio", field_accessor!(Loose, ratio), PropertyBinding::GetSet)?;
        builder.field("Count", field_accessor!(Loose, count), PropertyBinding::Get)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Entity {
    id: u64,
}

impl Reflect for Entity {
    const NAME: &'static str = "Entity";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.field("Id", field_accessor!(Entity, id), PropertyBinding::GetSet)?;
        Ok(())
    }
}

/// Extends `Entity` by embedding it.
#[derive(Debug, Default)]
struct Player {
    score: i32,
    entity: Entity,
    health: f32,
}

impl Reflect for Player {
    const NAME: &'static str = "Player";

    fn register(builder: &mut TypeBuilder<'_, Self>) -> ReflResult<()> {
        builder.set_base::<Entity>()?;
        builder.field("Id", field_accessor!(Player, entity.id), PropertyBinding::GetSet)?;
        builder.field("Score", field_accessor!(Player, score), PropertyBinding::GetSet)?;
        builder.field("Health", field_accessor!(Player, health), PropertyBinding::Get)?;
        Ok(())
    }
}

fn registry() -> TypeRegistry {
    let mut builder = common::builder();
    builder.register::<Packed>().unwrap();
    builder.register::<Loose>().unwrap();
    builder.register::<Entity>().unwrap();
    builder.register::<Player>().unwrap();
    builder.finish().unwrap()
}

fn distance<S, V>(object: &S, member: &V) -> usize {
    member as *const V as usize - object as *const S as usize
}

#[test]
fn binding_mode_selects_accessors() {
    let registry = registry();
    let packed = registry.get(registry.type_of::<Packed>().unwrap()).unwrap();

    let tag = packed.first_field("Tag").unwrap();
    assert_eq!(tag.binding(), PropertyBinding::Get);
    assert!(tag.getter().is_some() && tag.setter().is_none());

    let length = packed.first_field("Length").unwrap();
    assert_eq!(length.binding(), PropertyBinding::Set);
    assert!(length.getter().is_none() && length.setter().is_some());

    let checksum = packed.first_field("Checksum").unwrap();
    assert!(checksum.getter().is_some() && checksum.setter().is_some());

    assert_eq!(tag.property_type(), registry.type_of::<u8>().unwrap());
    assert_eq!(length.property_type(), registry.type_of::<u32>().unwrap());
    assert_eq!(checksum.property_type(), registry.type_of::<u16>().unwrap());
    assert_eq!(checksum.owning_type(), packed.id());

    // Fields do not show up as plain properties.
    assert!(packed.property("Tag").is_none());
    assert_eq!(packed.fields().count(), 3);
}

#[test]
fn repr_c_offsets() {
    let registry = registry();
    let packed = registry.get(registry.type_of::<Packed>().unwrap()).unwrap();

    assert_eq!(packed.first_field("Tag").unwrap().offset(), 0);
    assert_eq!(packed.first_field("Length").unwrap().offset(), 4);
    assert_eq!(packed.first_field("Checksum").unwrap().offset(), 8);
}

#[test]
fn offsets_match_member_addresses() {
    let registry = registry();
    let loose = registry.get(registry.type_of::<Loose>().unwrap()).unwrap();
    let value = Loose::default();

    assert_eq!(loose.first_field("Flag").unwrap().offset(), distance(&value, &value.flag));
    assert_eq!(loose.first_field("Ratio").unwrap().offset(), distance(&value, &value.ratio));
    assert_eq!(loose.first_field("Count").unwrap().offset(), distance(&value, &value.count));
}

#[test]
fn composed_offsets_and_values() {
    let registry = registry();
    let entity = registry.type_of::<Entity>().unwrap();
    let player_ty = registry.type_of::<Player>().unwrap();
    let player = registry.get(player_ty).unwrap();
    assert!(registry.is_a(player_ty, entity));

    let mut value = Player {
        score: 7,
        entity: Entity { id: 99 },
        health: 0.5,
    };

    let id = player.first_field("Id").unwrap();
    assert_eq!(id.offset(), distance(&value, &value.entity.id));
    assert_eq!(
        id.offset(),
        core::mem::offset_of!(Player, entity) + core::mem::offset_of!(Entity, id)
    );
    assert_eq!(id.get_as::<u64>(&value).unwrap(), 99);

    id.set_value(&mut value, 1234u64).unwrap();
    assert_eq!(value.entity.id, 1234);
    assert_eq!(value.score, 7);

    let score = player.first_field("Score").unwrap();
    score.set_value(&mut value, -3i32).unwrap();
    assert_eq!(score.get_as::<i32>(&value).unwrap(), -3);

    let health = player.first_field("Health").unwrap();
    assert_eq!(health.get_as::<f32>(&value).unwrap(), 0.5);
    assert!(health.set_value(&mut value, 1.0f32).is_err());
}

#[test]
fn field_accessor_reads_and_writes() {
    let registry = registry();
    let packed = registry.get(registry.type_of::<Packed>().unwrap()).unwrap();
    let mut value = Packed {
        tag: 3,
        length: 10,
        checksum: 0xbeef,
    };

    let length = packed.first_field("Length").unwrap();
    length.set_value(&mut value, 64u32).unwrap();
    assert_eq!(value.length, 64);

    let tag = packed.first_field("Tag").unwrap();
    assert_eq!(tag.get_as::<u8>(&value).unwrap(), 3);

    // Wrong target type.
    assert!(tag.get(&Loose::default()).is_err());
}
