use core::any::{Any, TypeId};

use super::TagValue;
use crate::value::Value;

/// One variant of an [`IoEnum`](crate::IoEnum).
#[derive(Debug, Clone, Copy)]
pub struct EnumVariantSchema {
    name: &'static str,
    value: TagValue,
}

impl EnumVariantSchema {
    #[inline]
    pub const fn new(name: &'static str, value: TagValue) -> Self {
        Self { name, value }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn value(&self) -> TagValue {
        self.value
    }
}

/// Static description of an [`IoEnum`](crate::IoEnum).
///
/// Variant order matches declaration order; `variant_index` of the enum
/// indexes into [`EnumSchema::variants`].
#[derive(Debug)]
pub struct EnumSchema {
    type_id: TypeId,
    type_path: &'static str,
    variants: Vec<EnumVariantSchema>,
    fallback: Option<usize>,
}

impl EnumSchema {
    pub fn new<T: Any>(variants: Vec<EnumVariantSchema>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>(),
            variants,
            fallback: None,
        }
    }

    /// Marks the variant substituted for unknown input values.
    #[inline]
    pub fn with_fallback(mut self, index: usize) -> Self {
        self.fallback = Some(index);
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
    pub fn variants(&self) -> &[EnumVariantSchema] {
        &self.variants
    }

    #[inline]
    pub fn variant(&self, index: usize) -> Option<&EnumVariantSchema> {
        self.variants.get(index)
    }

    #[inline]
    pub fn fallback(&self) -> Option<usize> {
        self.fallback
    }

    /// Finds the variant whose value is exactly `value`.
    pub fn find(&self, value: &Value) -> Option<usize> {
        self.variants.iter().position(|v| v.value.matches(value))
    }

    /// Finds the variant whose dict-key form is `key`.
    pub fn find_key(&self, key: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.value.matches_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Color {}

    #[test]
    fn lookup() {
        let schema = EnumSchema::new::<Color>(vec![
            EnumVariantSchema::new("Red", TagValue::Str("red")),
            EnumVariantSchema::new("Blue", TagValue::Str("blue")),
            EnumVariantSchema::new("Unknown", TagValue::Str("unknown")),
        ])
        .with_fallback(2);

        assert_eq!(schema.find(&Value::from("blue")), Some(1));
        assert_eq!(schema.find(&Value::from("green")), None);
        assert_eq!(schema.find(&Value::Int(0)), None);
        assert_eq!(schema.find_key("red"), Some(0));
        assert_eq!(schema.fallback(), Some(2));
        assert!(schema.type_path().ends_with("Color"));
    }
}
