use std::ops::Deref;

use strum::{Display, EnumIs};

use crate::descriptors::Property;

/// Accessors a [`Field`] exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIs)]
pub enum PropertyBinding {
    Get,
    Set,
    GetSet,
}

impl PropertyBinding {
    pub fn has_getter(self) -> bool {
        matches!(self, PropertyBinding::Get | PropertyBinding::GetSet)
    }

    pub fn has_setter(self) -> bool {
        matches!(self, PropertyBinding::Set | PropertyBinding::GetSet)
    }
}

/// Location of a data member of type `V` inside an `S`.
///
/// Built with [`field_accessor!`](crate::field_accessor), which measures the byte
/// offset with [`core::mem::offset_of!`] and derives the projections from the same
/// field path, so the two always agree.
pub struct FieldAccessor<S, V> {
    pub(crate) offset: usize,
    pub(crate) get: fn(&S) -> &V,
    pub(crate) get_mut: fn(&mut S) -> &mut V,
}

impl<S, V> FieldAccessor<S, V> {
    pub fn new(offset: usize, get: fn(&S) -> &V, get_mut: fn(&mut S) -> &mut V) -> Self {
        Self {
            offset,
            get,
            get_mut,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Build a [`FieldAccessor`] for `$owner.$field`.
///
/// The path may go through nested members, in which case the offset is the one
/// of the innermost member from the start of `$owner`:
///
/// ```
/// # use srefl::field_accessor;
/// struct Inner { a: u8, b: u32 }
/// struct Outer { head: u64, inner: Inner }
///
/// let accessor = field_accessor!(Outer, inner.b);
/// assert_eq!(
///     accessor.offset(),
///     core::mem::offset_of!(Outer, inner) + core::mem::offset_of!(Inner, b)
/// );
/// ```
#[macro_export]
macro_rules! field_accessor {
    ($owner:ty, $($field:tt).+) => {
        $crate::descriptors::FieldAccessor::<$owner, _>::new(
            ::core::mem::offset_of!($owner, $($field).+),
            |object| &object.$($field).+,
            |object| &mut object.$($field).+,
        )
    };
}

/// A [`Property`] synthesized from a data member.
///
/// The getter returns a copy of the member, the setter overwrites it. The offset is
/// measured from the start of the containing type.
#[derive(Debug)]
pub struct Field {
    property: Property,
    offset: usize,
    binding: PropertyBinding,
}

impl Field {
    pub fn new(property: Property, offset: usize, binding: PropertyBinding) -> Self {
        Self {
            property,
            offset,
            binding,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn binding(&self) -> PropertyBinding {
        self.binding
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub(crate) fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }
}

impl Deref for Field {
    type Target = Property;

    fn deref(&self) -> &Self::Target {
        &self.property
    }
}

/// Value of an enumerator, kept in the signedness of its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValue {
    Signed(i64),
    Unsigned(u64),
}

macro_rules! impl_enum_value_from {
    ($variant:ident as $wide:ty: $($int:ty),+) => {
        $(
            impl From<$int> for EnumValue {
                fn from(value: $int) -> Self {
                    EnumValue::$variant(value as $wide)
                }
            }
        )+
    };
}

impl_enum_value_from!(Signed as i64: i8, i16, i32, i64, isize);
impl_enum_value_from!(Unsigned as u64: u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct Header {
        tag: u8,
        length: u32,
    }

    #[repr(C)]
    struct Packet {
        id: u16,
        header: Header,
        payload: [u8; 3],
    }

    #[test]
    fn accessor_offset_matches_layout() {
        let accessor = crate::field_accessor!(Packet, header.length);
        assert_eq!(accessor.offset(), 8);

        let mut packet = Packet {
            id: 1,
            header: Header { tag: 2, length: 3 },
            payload: [0; 3],
        };

        *(accessor.get_mut)(&mut packet) = 40;
        assert_eq!(*(accessor.get)(&packet), 40);
        assert_eq!(packet.header.tag, 2);
        assert_eq!(packet.id, 1);
        assert_eq!(packet.payload, [0; 3]);
    }

    #[test]
    fn binding_accessors() {
        assert!(PropertyBinding::Get.has_getter());
        assert!(!PropertyBinding::Get.has_setter());
        assert!(PropertyBinding::Set.has_setter());
        assert!(PropertyBinding::GetSet.has_getter() && PropertyBinding::GetSet.has_setter());
    }

    #[test]
    fn enum_values_keep_signedness() {
        assert_eq!(EnumValue::from(-3i8), EnumValue::Signed(-3));
        assert_eq!(EnumValue::from(7usize), EnumValue::Unsigned(7));
    }
}
