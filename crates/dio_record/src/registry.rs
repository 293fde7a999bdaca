//! Collection of types marked `#[io(auto_register)]`.
//!
//! Registered types can be prepared up front with [`prep_registered`], so a
//! test suite catches schema errors in types it never encodes.

use crate::error::SchemaError;

/// One registered type, submitted by the derive macros through `inventory`.
pub struct AutoRegistration {
    type_path: &'static str,
    prep: fn() -> Result<(), SchemaError>,
}

impl AutoRegistration {
    #[doc(hidden)]
    pub const fn new(type_path: &'static str, prep: fn() -> Result<(), SchemaError>) -> Self {
        Self { type_path, prep }
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }
}

inventory::collect!(AutoRegistration);

/// Prepares every registered type, stopping at the first schema error.
///
/// Returns the number of types prepared.
pub fn prep_registered() -> Result<usize, SchemaError> {
    let mut count = 0;
    for registration in inventory::iter::<AutoRegistration> {
        (registration.prep)().inspect_err(|e| {
            log::debug!("registered type `{}` failed to prep: {e}", registration.type_path);
        })?;
        count += 1;
    }
    log::debug!("prepped {count} registered type(s)");
    Ok(count)
}

/// Paths of every registered type.
pub fn registered_types() -> impl Iterator<Item = &'static str> {
    inventory::iter::<AutoRegistration>
        .into_iter()
        .map(AutoRegistration::type_path)
}
