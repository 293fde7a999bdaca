use core::any::{Any, TypeId};

use super::{MultiTypeSchema, Shape, TagValue};
use crate::attrs::IoAttrs;
use crate::io::IoType;
use crate::value::ValueMap;

// -----------------------------------------------------------------------------
// FieldSchema

/// One declared field of a record.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: &'static str,
    shape: Shape,
    attrs: IoAttrs,
}

impl FieldSchema {
    /// A field named `name` holding values of type `T`.
    #[inline]
    pub fn new<T: IoType>(name: &'static str) -> Self {
        Self {
            name,
            shape: T::shape(),
            attrs: IoAttrs::new(),
        }
    }

    #[inline]
    pub fn with_attrs(mut self, attrs: IoAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// The Rust field name. Used in error paths.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The key this field is stored under.
    #[inline]
    pub fn storage_name(&self) -> &'static str {
        self.attrs.storage_name().unwrap_or(self.name)
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn attrs(&self) -> &IoAttrs {
        &self.attrs
    }
}

// -----------------------------------------------------------------------------
// Membership

/// A record's self-reported membership of a multi-type family.
#[derive(Debug, Clone, Copy)]
pub struct Membership {
    family: fn() -> &'static MultiTypeSchema,
    type_id: TagValue,
}

impl Membership {
    #[inline]
    pub fn family(&self) -> &'static MultiTypeSchema {
        (self.family)()
    }

    /// The type id this record reports for itself.
    #[inline]
    pub fn type_id(&self) -> TagValue {
        self.type_id
    }
}

// -----------------------------------------------------------------------------
// RecordSchema

/// Static description of a record type.
///
/// Usually built by `#[derive(Record)]`:
///
/// ```
/// use dio_record::{Record, RecordType, Shape};
///
/// #[derive(Record)]
/// struct Point {
///     x: i32,
///     #[io(storage_name = "why")]
///     y: i32,
/// }
///
/// let schema = Point::schema();
/// assert_eq!(schema.fields().len(), 2);
/// assert_eq!(schema.fields()[1].storage_name(), "why");
/// assert!(matches!(schema.fields()[0].shape(), Shape::Int));
/// ```
pub struct RecordSchema {
    type_id: TypeId,
    type_path: &'static str,
    fields: Vec<FieldSchema>,
    extra_slot: Option<&'static str>,
    membership: Option<Membership>,
    will_input: Option<fn(&mut ValueMap)>,
}

impl RecordSchema {
    pub fn new<T: Any>(fields: Vec<FieldSchema>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>(),
            fields,
            extra_slot: None,
            membership: None,
            will_input: None,
        }
    }

    /// Names the field holding [`ExtraAttrs`](crate::ExtraAttrs).
    #[inline]
    pub fn with_extra_slot(mut self, field_name: &'static str) -> Self {
        self.extra_slot = Some(field_name);
        self
    }

    /// Declares membership of a multi-type family under `type_id`.
    #[inline]
    pub fn with_membership(
        mut self,
        family: fn() -> &'static MultiTypeSchema,
        type_id: TagValue,
    ) -> Self {
        self.membership = Some(Membership { family, type_id });
        self
    }

    /// Installs a hook that may rewrite the raw map before decoding.
    #[inline]
    pub fn with_will_input(mut self, hook: fn(&mut ValueMap)) -> Self {
        self.will_input = Some(hook);
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
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldSchema> {
        self.fields.get(index)
    }

    /// Looks up a field by the key it is stored under.
    pub fn field_by_storage_name(&self, key: &str) -> Option<(usize, &FieldSchema)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.storage_name() == key)
    }

    #[inline]
    pub fn extra_slot(&self) -> Option<&'static str> {
        self.extra_slot
    }

    #[inline]
    pub fn membership(&self) -> Option<&Membership> {
        self.membership.as_ref()
    }

    #[inline]
    pub fn will_input(&self) -> Option<fn(&mut ValueMap)> {
        self.will_input
    }
}

impl core::fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordSchema")
            .field("type_path", &self.type_path)
            .field("fields", &self.fields)
            .field("extra_slot", &self.extra_slot)
            .field("membership", &self.membership.map(|m| m.type_id))
            .finish_non_exhaustive()
    }
}
