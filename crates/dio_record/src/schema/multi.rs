use core::any::{Any, TypeId};

use super::{RecordSchema, TagValue};
use crate::io::RecordType;
use crate::value::Value;

/// Default key under which a member's type id is stored.
pub const DEFAULT_TAG: &str = "_dciotype";

/// One member record of a multi-type family.
#[derive(Debug, Clone, Copy)]
pub struct MemberSchema {
    variant: &'static str,
    id: TagValue,
    record: fn() -> &'static RecordSchema,
}

impl MemberSchema {
    /// Registers record type `R` as the family variant `variant` under `id`.
    #[inline]
    pub fn new<R: RecordType>(variant: &'static str, id: TagValue) -> Self {
        Self {
            variant,
            id,
            record: R::schema,
        }
    }

    #[inline]
    pub fn variant(&self) -> &'static str {
        self.variant
    }

    #[inline]
    pub fn id(&self) -> TagValue {
        self.id
    }

    #[inline]
    pub fn record(&self) -> &'static RecordSchema {
        (self.record)()
    }
}

/// Static description of a multi-type family: the tag key and the
/// registry mapping type ids to member records.
#[derive(Debug)]
pub struct MultiTypeSchema {
    type_id: TypeId,
    type_path: &'static str,
    tag: &'static str,
    members: Vec<MemberSchema>,
    fallback: Option<&'static str>,
}

impl MultiTypeSchema {
    pub fn new<T: Any>(tag: &'static str, members: Vec<MemberSchema>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>(),
            tag,
            members,
            fallback: None,
        }
    }

    /// Names the variant substituted for unknown type ids.
    #[inline]
    pub fn with_fallback(mut self, variant: &'static str) -> Self {
        self.fallback = Some(variant);
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[inline]
    pub fn members(&self) -> &[MemberSchema] {
        &self.members
    }

    #[inline]
    pub fn fallback(&self) -> Option<&'static str> {
        self.fallback
    }

    /// Finds the member registered under `id`.
    pub fn member_by_id(&self, id: TagValue) -> Option<&MemberSchema> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Finds the position of the member whose id is exactly `value`.
    pub fn member_index(&self, value: &Value) -> Option<usize> {
        self.members.iter().position(|m| m.id.matches(value))
    }
}
