pub mod comment;
pub mod newtypes;
pub mod thread;

use crate::backend::utils::error::{BackendResult, Error};

/// Rejects absent or blank payload properties before an entity is built.
pub(crate) fn require_not_empty(value: &str, property: &'static str) -> BackendResult<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingProperty(property));
    }
    Ok(())
}

#[test]
fn test_require_not_empty() {
    assert!(require_not_empty("a comment", "content").is_ok());
    assert!(require_not_empty("", "content").is_err());
    assert!(require_not_empty("   ", "content").is_err());
}
