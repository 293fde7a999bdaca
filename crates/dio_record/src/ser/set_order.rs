use crate::schema::Shape;
use crate::value::{CanonicalStyle, Value, to_canonical_json};

/// Sorts encoded set elements into their deterministic output order.
///
/// Natively ordered element shapes sort by value. Everything else sorts by
/// the spaced canonical JSON text of the encoded element, which keeps the
/// order stable across processes and matches existing stored data.
pub(super) fn sort_set_items(element: &Shape, items: &mut [Value]) {
    if element.is_natively_ordered() {
        items.sort_by(Value::native_cmp);
    } else {
        items.sort_by_cached_key(|item| to_canonical_json(item, CanonicalStyle::Spaced));
    }
}
