use crate::errors::ServiceError;

pub const MAX_COLLECTION_NAME_LEN: usize = 128;

/// Collection names double as file stems: ASCII letters, digits, `-` and `_` only.
pub fn validate_collection_name(name: &str) -> Result<(), ServiceError> {
    if name.is_empty() {
        return Err(ServiceError::Validation("collection name must not be empty".into()));
    }
    if name.len() > MAX_COLLECTION_NAME_LEN {
        return Err(ServiceError::Validation(format!(
            "collection name longer than {} characters",
            MAX_COLLECTION_NAME_LEN
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ServiceError::Validation(format!(
            "collection name '{}' may only contain letters, digits, '-' and '_'",
            name
        )));
    }
    Ok(())
}
