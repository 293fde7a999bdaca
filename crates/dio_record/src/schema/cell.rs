//! Containers for static storage of schemas.
//!
//! ## SchemaCell
//!
//! For non-generic types. Internally an [`OnceLock<T>`].
//!
//! ## GenericSchemaCell
//!
//! For generic types the `static CELL` inside a function is shared by every
//! instantiation, so the container maps [`TypeId`]s to leaked schemas.

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use dio_utils::TypeIdMap;

use super::{EnumSchema, MultiTypeSchema, RecordSchema};

mod sealed {
    use super::{EnumSchema, MultiTypeSchema, RecordSchema};

    pub trait SchemaProperty: Send + Sync + 'static {}

    impl SchemaProperty for RecordSchema {}
    impl SchemaProperty for EnumSchema {}
    impl SchemaProperty for MultiTypeSchema {}
}

use sealed::SchemaProperty;

/// Container for the schema of a non-generic type.
///
/// ```
/// use dio_record::schema::{FieldSchema, RecordSchema, SchemaCell};
///
/// struct Unit;
///
/// fn schema() -> &'static RecordSchema {
///     static CELL: SchemaCell<RecordSchema> = SchemaCell::new();
///     CELL.get_or_init(|| RecordSchema::new::<Unit>(vec![FieldSchema::new::<i64>("n")]))
/// }
///
/// assert!(core::ptr::eq(schema(), schema()));
/// ```
pub struct SchemaCell<T: SchemaProperty>(OnceLock<T>);

impl<T: SchemaProperty> SchemaCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored schema, building it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.0.get_or_init(f)
    }
}

/// Container for the schemas of a generic type.
///
/// Schemas are leaked: each lives for the rest of the program, exactly like
/// the non-generic [`SchemaCell`] contents.
pub struct GenericSchemaCell<T: SchemaProperty>(RwLock<TypeIdMap<&'static T>>);

impl<T: SchemaProperty> GenericSchemaCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the schema stored for `G`, building it with `f` on first access.
    ///
    /// `f` runs without holding the lock, so it may look up other schemas
    /// (including ones in this same cell). If two threads race, the first
    /// inserted schema wins.
    pub fn get_or_insert<G, F>(&self, f: F) -> &'static T
    where
        G: Any + ?Sized,
        F: FnOnce() -> T,
    {
        let type_id = TypeId::of::<G>();

        if let Some(info) = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
        {
            return info;
        }

        let built: &'static T = Box::leak(Box::new(f()));

        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;

    struct Wrapper<T>(T);

    fn schema<T: Any>() -> &'static RecordSchema {
        static CELL: GenericSchemaCell<RecordSchema> = GenericSchemaCell::new();
        CELL.get_or_insert::<Wrapper<T>, _>(|| {
            RecordSchema::new::<Wrapper<T>>(vec![FieldSchema::new::<i64>("0")])
        })
    }

    #[test]
    fn generic_cell_per_type() {
        let a = schema::<u8>();
        let b = schema::<String>();
        assert!(!core::ptr::eq(a, b));
        assert!(core::ptr::eq(a, schema::<u8>()));
        assert_eq!(a.type_id(), TypeId::of::<Wrapper<u8>>());
    }
}
