//! One-time validation of a type's schema.
//!
//! Before a type is first encoded or decoded, [`PrepSession`] walks its
//! [`Shape`] and every schema reachable from it, rejecting declarations the
//! encoder and decoder cannot handle. The result is cached per [`TypeId`] in
//! a process-global map, so later calls only pay for a read lock.

use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use dio_utils::TypeIdMap;
use dio_utils::hash::{FixedHashState, HashSet};

use crate::error::SchemaError;
use crate::io::IoType;
use crate::schema::{EnumSchema, FieldSchema, KeyShape, MultiTypeSchema, RecordSchema, Shape};

static PREPPED: RwLock<TypeIdMap<Result<(), SchemaError>>> = RwLock::new(TypeIdMap::new());

/// Walks the schemas reachable from one root type.
///
/// # Examples
///
/// ```
/// use dio_record::{PrepSession, Record, SchemaError};
///
/// #[derive(Record)]
/// struct Good {
///     a: Option<i64>,
/// }
///
/// #[derive(Record)]
/// struct Bad {
///     a: Option<Option<i64>>,
/// }
///
/// #[derive(Record)]
/// struct Loose {
///     a: Option<dio_record::Value>,
/// }
///
/// assert!(PrepSession::prep::<Good>().is_ok());
/// assert!(matches!(
///     PrepSession::prep::<Bad>(),
///     Err(SchemaError::NestedOptional { field: "a", .. })
/// ));
/// assert!(matches!(
///     PrepSession::prep::<Loose>(),
///     Err(SchemaError::OptionalAny { field: "a", .. })
/// ));
/// ```
pub struct PrepSession {
    visited: HashSet<TypeId>,
}

impl PrepSession {
    /// Validates `T` and everything reachable from it, once per process.
    pub fn prep<T: IoType>() -> Result<(), SchemaError> {
        let type_id = TypeId::of::<T>();

        if let Some(result) = PREPPED
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return result.clone();
        }

        let mut session = PrepSession {
            visited: HashSet::with_hasher(FixedHashState),
        };
        let result = session.check_shape(&T::shape(), core::any::type_name::<T>(), "");

        match &result {
            Ok(()) => log::debug!(
                "prepped `{}` ({} schema(s) checked)",
                core::any::type_name::<T>(),
                session.visited.len()
            ),
            Err(e) => log::debug!("prep of `{}` failed: {e}", core::any::type_name::<T>()),
        }

        let mut prepped = PREPPED.write().unwrap_or_else(PoisonError::into_inner);
        if result.is_ok() {
            // Everything reachable from a valid type is valid on its own.
            for id in &session.visited {
                prepped.get_or_insert(*id, || Ok(()));
            }
        }
        prepped.get_or_insert(type_id, || result).clone()
    }

    /// Validates a shape without caching the result.
    pub fn prep_shape(shape: &Shape) -> Result<(), SchemaError> {
        PrepSession {
            visited: HashSet::with_hasher(FixedHashState),
        }
        .check_shape(shape, "", "")
    }

    fn check_shape(
        &mut self,
        shape: &Shape,
        owner: &'static str,
        field: &'static str,
    ) -> Result<(), SchemaError> {
        match shape {
            Shape::Optional(inner) => {
                match **inner {
                    Shape::Optional(_) => {
                        return Err(SchemaError::NestedOptional {
                            type_path: owner,
                            field,
                        });
                    }
                    Shape::Any => {
                        return Err(SchemaError::OptionalAny {
                            type_path: owner,
                            field,
                        });
                    }
                    _ => {}
                }
                self.check_shape(inner, owner, field)
            }
            Shape::Tuple(items) => items
                .iter()
                .try_for_each(|item| self.check_shape(item, owner, field)),
            Shape::List(inner) => self.check_shape(inner, owner, field),
            Shape::Set(inner) => {
                if !inner.is_set_element() {
                    return Err(SchemaError::UnsupportedSetElement {
                        type_path: owner,
                        field,
                        shape: inner.to_string(),
                    });
                }
                if !inner.is_natively_ordered() {
                    log::debug!(
                        "`{owner}.{field}`: elements of `set[{inner}]` are ordered by their JSON text"
                    );
                }
                self.check_shape(inner, owner, field)
            }
            Shape::Dict(key, value) => {
                if let KeyShape::Enum(schema) = key {
                    self.check_enum(schema())?;
                }
                self.check_shape(value, owner, field)
            }
            Shape::Record(schema) => self.check_record(schema()),
            Shape::Enum(schema) => self.check_enum(schema()),
            Shape::Multi(schema) => self.check_multi(schema()),
            Shape::Any
            | Shape::Bool
            | Shape::Int
            | Shape::Float
            | Shape::Str
            | Shape::Bytes
            | Shape::DateTime
            | Shape::TimeDelta => Ok(()),
        }
    }

    fn check_field(
        &mut self,
        schema: &'static RecordSchema,
        field: &'static FieldSchema,
    ) -> Result<(), SchemaError> {
        let attrs = field.attrs();

        if !attrs.store_default() && attrs.default_source().is_none() {
            return Err(SchemaError::MissingDefault {
                type_path: schema.type_path(),
                field: field.name(),
            });
        }

        if let Some(granularity) = attrs.granularity()
            && !field.shape().contains_datetime()
        {
            return Err(SchemaError::MisplacedDateTimeAttr {
                type_path: schema.type_path(),
                field: field.name(),
                attr: granularity.attr_name(),
            });
        }

        self.check_shape(field.shape(), schema.type_path(), field.name())
    }

    fn check_record(&mut self, schema: &'static RecordSchema) -> Result<(), SchemaError> {
        if !self.visited.insert(schema.type_id()) {
            return Ok(());
        }

        let mut storage_names =
            HashSet::with_capacity_and_hasher(schema.fields().len(), FixedHashState);
        for field in schema.fields() {
            if !storage_names.insert(field.storage_name()) {
                return Err(SchemaError::DuplicateStorageName {
                    type_path: schema.type_path(),
                    storage_name: field.storage_name(),
                });
            }
        }

        for field in schema.fields() {
            self.check_field(schema, field)?;
        }

        if let Some(membership) = schema.membership() {
            let family = membership.family();
            self.check_multi(family)?;

            let registered = family
                .members()
                .iter()
                .find(|m| m.record().type_id() == schema.type_id());

            match registered {
                Some(member) if member.id() == membership.type_id() => {}
                Some(member) => {
                    return Err(SchemaError::MemberIdMismatch {
                        family: family.type_path(),
                        member: schema.type_path(),
                        reported: membership.type_id().to_string(),
                        registered: member.id().to_string(),
                    });
                }
                None => {
                    return Err(SchemaError::UnregisteredMember {
                        family: family.type_path(),
                        member: schema.type_path(),
                        id: membership.type_id().to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn check_enum(&mut self, schema: &'static EnumSchema) -> Result<(), SchemaError> {
        if !self.visited.insert(schema.type_id()) {
            return Ok(());
        }

        let variants = schema.variants();
        let Some(first) = variants.first() else {
            return Err(SchemaError::EmptyEnum {
                type_path: schema.type_path(),
            });
        };

        if variants.iter().any(|v| v.value().is_str() != first.value().is_str()) {
            return Err(SchemaError::MixedEnumValues {
                type_path: schema.type_path(),
            });
        }

        let mut seen = HashSet::with_capacity_and_hasher(variants.len(), FixedHashState);
        for variant in variants {
            if !seen.insert(variant.value()) {
                return Err(SchemaError::DuplicateEnumValue {
                    type_path: schema.type_path(),
                    value: variant.value().to_string(),
                });
            }
        }

        Ok(())
    }

    fn check_multi(&mut self, family: &'static MultiTypeSchema) -> Result<(), SchemaError> {
        if !self.visited.insert(family.type_id()) {
            return Ok(());
        }

        let members = family.members();
        let Some(first) = members.first() else {
            return Err(SchemaError::EmptyMultiType {
                family: family.type_path(),
            });
        };

        if members.iter().any(|m| m.id().is_str() != first.id().is_str()) {
            return Err(SchemaError::MixedTypeIds {
                family: family.type_path(),
            });
        }

        let mut seen = HashSet::with_capacity_and_hasher(members.len(), FixedHashState);
        for member in members {
            if !seen.insert(member.id()) {
                return Err(SchemaError::DuplicateTypeId {
                    family: family.type_path(),
                    id: member.id().to_string(),
                });
            }
        }

        for member in members {
            let record = member.record();

            let Some(membership) = record.membership() else {
                return Err(SchemaError::MemberNotInFamily {
                    family: family.type_path(),
                    member: record.type_path(),
                });
            };
            if membership.family().type_id() != family.type_id() {
                return Err(SchemaError::MemberNotInFamily {
                    family: family.type_path(),
                    member: record.type_path(),
                });
            }
            if membership.type_id() != member.id() {
                return Err(SchemaError::MemberIdMismatch {
                    family: family.type_path(),
                    member: record.type_path(),
                    reported: membership.type_id().to_string(),
                    registered: member.id().to_string(),
                });
            }

            if let Some(field) = record
                .fields()
                .iter()
                .find(|f| f.storage_name() == family.tag())
            {
                return Err(SchemaError::TagCollision {
                    family: family.type_path(),
                    member: record.type_path(),
                    field: field.name(),
                    tag: family.tag(),
                });
            }

            self.check_record(record)?;
        }

        Ok(())
    }
}
