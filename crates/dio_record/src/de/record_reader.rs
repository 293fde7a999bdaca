use super::Inputter;
use crate::attrs::ExtraAttrs;
use crate::error::{IoError, ValueErrorKind};
use crate::io::IoType;
use crate::path::FieldPath;
use crate::schema::{FieldSchema, RecordSchema};
use crate::value::ValueMap;

/// The fields of one record input, taken out one at a time.
///
/// Created by [`Inputter::begin_record`]. Derived [`IoType::from_io`]
/// implementations read every declared field in order, then hand the
/// result to [`RecordReader::finish`].
pub struct RecordReader<'p> {
    schema: &'static RecordSchema,
    map: ValueMap,
    extra: ExtraAttrs,
    path: &'p FieldPath<'p>,
}

impl<'p> RecordReader<'p> {
    pub(super) fn new(
        schema: &'static RecordSchema,
        map: ValueMap,
        extra: ExtraAttrs,
        path: &'p FieldPath<'p>,
    ) -> Self {
        Self {
            schema,
            map,
            extra,
            path,
        }
    }

    #[inline]
    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    /// Path of the record itself.
    #[inline]
    pub fn path(&self) -> &FieldPath<'p> {
        self.path
    }

    fn field_schema(&self, index: usize) -> Result<&'static FieldSchema, IoError> {
        let schema = self.schema;
        schema.field_at(index).ok_or_else(|| {
            IoError::Consistency(format!(
                "`{}` has no field at index {index}",
                schema.type_path()
            ))
        })
    }

    /// Decodes the required field at `index`.
    pub fn field<T: IoType>(&mut self, input: &mut Inputter, index: usize) -> Result<T, IoError> {
        let field = self.field_schema(index)?;
        match self.map.remove(field.storage_name()) {
            Some(raw) => {
                let child = self.path.field(field.name());
                input.with_attrs(*field.attrs(), |input| T::from_io(input, raw, &child))
            }
            None => Err(IoError::value(
                &self.path.field(field.name()),
                ValueErrorKind::MissingField,
            )),
        }
    }

    /// Decodes the field at `index`, or returns `default()` if it is absent.
    pub fn field_or_else<T: IoType>(
        &mut self,
        input: &mut Inputter,
        index: usize,
        default: impl FnOnce() -> T,
    ) -> Result<T, IoError> {
        let field = self.field_schema(index)?;
        match self.map.remove(field.storage_name()) {
            Some(raw) => {
                let child = self.path.field(field.name());
                input.with_attrs(*field.attrs(), |input| T::from_io(input, raw, &child))
            }
            None => Ok(default()),
        }
    }

    /// Runs a field validator on a decoded value.
    pub fn validate<T>(
        &self,
        index: usize,
        value: T,
        check: impl FnOnce(&T) -> Result<(), String>,
    ) -> Result<T, IoError> {
        let field = self.field_schema(index)?;
        match check(&value) {
            Ok(()) => Ok(value),
            Err(msg) => Err(IoError::value(
                &self.path.field(field.name()),
                ValueErrorKind::Validation(msg),
            )),
        }
    }

    /// Takes the attributes that matched no field.
    #[inline]
    pub fn take_extra(&mut self) -> ExtraAttrs {
        core::mem::take(&mut self.extra)
    }

    /// Ends the record started by [`Inputter::begin_record`].
    pub fn finish<T>(self, input: &mut Inputter, result: Result<T, IoError>) -> Result<T, IoError> {
        let result = result.map_err(|e| e.with_type_stack(|| input.stack.render()));
        input.stack.pop();
        result
    }
}
