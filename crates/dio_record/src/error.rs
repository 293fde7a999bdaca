use thiserror::Error;

use crate::codec::Codec;
use crate::path::FieldPath;

// -----------------------------------------------------------------------------
// SchemaError

/// A type's declared schema cannot be processed.
///
/// These are programmer errors: they depend only on the types involved, never
/// on the values being converted, so [`PrepSession`](crate::PrepSession)
/// caches them per type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("`{type_path}.{field}`: `Option<Option<_>>` is ambiguous; only a single optional layer is supported")]
    NestedOptional {
        type_path: &'static str,
        field: &'static str,
    },
    #[error("`{type_path}.{field}`: `Option<Value>` is ambiguous; a `Value` already holds null")]
    OptionalAny {
        type_path: &'static str,
        field: &'static str,
    },
    #[error("`{type_path}.{field}` sets `store_default = false` but declares no default")]
    MissingDefault {
        type_path: &'static str,
        field: &'static str,
    },
    #[error("`{type_path}`: storage name `{storage_name}` is used by more than one field")]
    DuplicateStorageName {
        type_path: &'static str,
        storage_name: &'static str,
    },
    #[error("`{type_path}.{field}`: `{attr}` only applies to datetime fields")]
    MisplacedDateTimeAttr {
        type_path: &'static str,
        field: &'static str,
        attr: &'static str,
    },
    #[error("`{type_path}.{field}`: set elements of shape `{shape}` are not supported")]
    UnsupportedSetElement {
        type_path: &'static str,
        field: &'static str,
        shape: String,
    },
    #[error("enum `{type_path}` has no variants")]
    EmptyEnum { type_path: &'static str },
    #[error("enum `{type_path}`: value {value} is used by more than one variant")]
    DuplicateEnumValue {
        type_path: &'static str,
        value: String,
    },
    #[error("enum `{type_path}` mixes string and integer values")]
    MixedEnumValues { type_path: &'static str },
    #[error("multi-type `{family}` has no members")]
    EmptyMultiType { family: &'static str },
    #[error("multi-type `{family}`: type id {id} is registered more than once")]
    DuplicateTypeId { family: &'static str, id: String },
    #[error("multi-type `{family}` mixes string and integer type ids")]
    MixedTypeIds { family: &'static str },
    #[error("`{member}` is registered in `{family}` but does not declare membership of it")]
    MemberNotInFamily {
        family: &'static str,
        member: &'static str,
    },
    #[error("`{member}` reports type id {reported} but `{family}` registers it as {registered}")]
    MemberIdMismatch {
        family: &'static str,
        member: &'static str,
        reported: String,
        registered: String,
    },
    #[error("`{member}` reports type id {id} which `{family}` does not register")]
    UnregisteredMember {
        family: &'static str,
        member: &'static str,
        id: String,
    },
    #[error("`{member}.{field}` is stored as `{tag}`, the type id key of `{family}`")]
    TagCollision {
        family: &'static str,
        member: &'static str,
        field: &'static str,
        tag: &'static str,
    },
}

// -----------------------------------------------------------------------------
// ValueError

/// What went wrong with a particular value.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValueErrorKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("expected a sequence of {expected} items, found {found}")]
    TupleLength { expected: usize, found: usize },
    #[error("{found} is not a legal {codec} value")]
    NotCodecLegal { codec: Codec, found: &'static str },
    #[error("datetime must be UTC, found offset of {offset_seconds}s")]
    NonUtcDateTime { offset_seconds: i32 },
    #[error("datetime is not a whole number of {unit}")]
    NotWhole { unit: &'static str },
    #[error("{0}")]
    InvalidDateTime(String),
    #[error("{0}")]
    InvalidTimeDelta(String),
    #[error("invalid base64 data: {0}")]
    InvalidBase64(String),
    #[error("integer {value} is out of range for `{target}`")]
    IntOutOfRange { value: i64, target: &'static str },
    #[error("dict key `{key}` is not a valid {expected}")]
    InvalidKey { key: String, expected: String },
    #[error("missing required field")]
    MissingField,
    #[error("unknown attribute `{0}`")]
    UnknownAttr(String),
    #[error("{value} is not a valid value of `{enum_path}`")]
    UnknownEnumValue {
        enum_path: &'static str,
        value: String,
    },
    #[error("{value} is not a registered type id of `{family}`")]
    UnknownTypeId { family: &'static str, value: String },
    #[error("missing type id key `{tag}` for `{family}`")]
    MissingTypeId {
        family: &'static str,
        tag: &'static str,
    },
    #[error("type id {found} does not match {expected} of `{member}`")]
    TypeIdMismatch {
        member: &'static str,
        expected: String,
        found: String,
    },
    #[error("extra attribute `{0}` collides with a declared field or type id key")]
    ExtraAttrCollision(String),
    #[error("the fallback variant of `{family}` has no type id and cannot be output")]
    FallbackOutput { family: &'static str },
    #[error("validation failed: {0}")]
    Validation(String),
}

/// A value does not fit its declared shape.
///
/// `path` is the dotted location of the offending value
/// (e.g. `parent.children.3.name`); it is empty for the top-level value.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{}{kind}{}", fmt_location(.path), fmt_type_stack(.type_stack))]
pub struct ValueError {
    pub path: String,
    pub kind: ValueErrorKind,
    /// Record types being processed when the error occurred, outermost
    /// first. Only filled by builds with the `debug` feature.
    pub type_stack: Option<String>,
}

fn fmt_location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("at `{path}`: ")
    }
}

fn fmt_type_stack(stack: &Option<String>) -> String {
    match stack {
        Some(stack) if !stack.is_empty() => format!(" (while processing {stack})"),
        _ => String::new(),
    }
}

impl ValueError {
    #[inline]
    pub fn new(path: &FieldPath<'_>, kind: ValueErrorKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
            type_stack: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> &ValueErrorKind {
        &self.kind
    }
}

// -----------------------------------------------------------------------------
// IoError

/// Top-level error of an encode or decode call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IoError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Value(#[from] ValueError),
    /// An internal invariant did not hold, e.g. a member record whose
    /// type id maps to a different record.
    #[error("consistency check failed: {0}")]
    Consistency(String),
    #[error("lossy data cannot be output ({0} value(s) were substituted while decoding)")]
    LossyOutput(usize),
    #[error("`{0}` is neither a record nor a multi-type and cannot be a top-level value")]
    NotARecord(&'static str),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IoError {
    /// Shorthand for a value error at `path`.
    #[inline]
    pub fn value(path: &FieldPath<'_>, kind: ValueErrorKind) -> Self {
        IoError::Value(ValueError::new(path, kind))
    }

    /// Returns the value error if this is one.
    pub fn as_value_error(&self) -> Option<&ValueError> {
        match self {
            IoError::Value(e) => Some(e),
            _ => None,
        }
    }

    /// A schema index with no matching Rust variant.
    #[doc(hidden)]
    #[cold]
    pub fn missing_variant(type_path: &str, index: usize) -> Self {
        IoError::Consistency(format!("`{type_path}` has no variant at index {index}"))
    }

    /// Attaches the record type stack to a value error that has none yet.
    pub(crate) fn with_type_stack(mut self, render: impl FnOnce() -> Option<String>) -> Self {
        if let IoError::Value(e) = &mut self
            && e.type_stack.is_none()
        {
            e.type_stack = render();
        }
        self
    }
}
