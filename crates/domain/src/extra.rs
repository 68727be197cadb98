//! Free-form fields carried alongside typed records.
//!
//! Clients attach fields the backend does not interpret (service
//! descriptions and images, patient names, phone numbers). They are stored
//! and returned verbatim.

use serde_json::{Map, Value};

/// Caller-supplied fields preserved as-is.
pub type ExtraFields = Map<String, Value>;

/// Remove the listed keys from `fields`, returning how many were present.
///
/// Used to stop free-form payloads from overwriting typed columns (for
/// example a profile update smuggling in `role`).
pub fn strip_keys(fields: &mut ExtraFields, keys: &[&str]) -> usize {
    keys.iter()
        .filter(|key| fields.remove(**key).is_some())
        .count()
}

/// Shallow-merge `patch` into `base`, overwriting existing keys.
pub fn merge(base: &mut ExtraFields, patch: ExtraFields) {
    for (key, value) in patch {
        base.insert(key, value);
    }
}
