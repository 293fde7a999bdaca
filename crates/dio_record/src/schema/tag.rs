use core::fmt;

use crate::value::Value;

/// Primitive identifying an enum variant or a multi-type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagValue {
    Str(&'static str),
    Int(i64),
}

impl TagValue {
    #[inline]
    pub fn to_value(self) -> Value {
        match self {
            TagValue::Str(s) => Value::Str(s.to_owned()),
            TagValue::Int(i) => Value::Int(i),
        }
    }

    /// String form used when the value is a dict key.
    pub fn key_string(self) -> String {
        match self {
            TagValue::Str(s) => s.to_owned(),
            TagValue::Int(i) => i.to_string(),
        }
    }

    /// Returns `true` if `value` is this exact primitive.
    #[inline]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (TagValue::Str(a), Value::Str(b)) => a == b,
            (TagValue::Int(a), Value::Int(b)) => a == *b,
            _ => false,
        }
    }

    /// Returns `true` if `key` is the dict-key form of this primitive.
    #[inline]
    pub fn matches_key(self, key: &str) -> bool {
        match self {
            TagValue::Str(s) => s == key,
            TagValue::Int(i) => key.parse::<i64>().is_ok_and(|k| k == i),
        }
    }

    #[inline]
    pub(crate) const fn is_str(self) -> bool {
        matches!(self, TagValue::Str(_))
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Str(s) => write!(f, "{s:?}"),
            TagValue::Int(i) => write!(f, "{i}"),
        }
    }
}

/// Short human form of a raw value for error messages.
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("{s:?}"),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.kind_name().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::TagValue;
    use crate::value::Value;

    #[test]
    fn matching() {
        assert!(TagValue::Str("c").matches(&Value::from("c")));
        assert!(!TagValue::Str("1").matches(&Value::Int(1)));
        assert!(TagValue::Int(1).matches_key("1"));
        assert!(!TagValue::Int(1).matches_key("01x"));
        assert_eq!(TagValue::Int(-4).key_string(), "-4");
        assert_eq!(TagValue::Str("red").to_string(), "\"red\"");
    }
}
