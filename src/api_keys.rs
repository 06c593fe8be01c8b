//! Picking the project key that pre-fills auth headers.

use crate::types::{ApiKey, ApiKeyType};

/// Shown in place of a key when the project exposes none.
pub const API_KEY_PLACEHOLDER: &str = "[YOUR API KEY]";

/// Keys of interest pulled out of the project's key list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectKeys<'a> {
    pub service_key: Option<&'a ApiKey>,
    pub secret_key: Option<&'a ApiKey>,
}

/// Split a key listing into the legacy `service_role` key and the first
/// secret-type key.
pub fn get_keys(keys: &[ApiKey]) -> ProjectKeys<'_> {
    ProjectKeys {
        service_key: keys.iter().find(|k| k.name == "service_role"),
        secret_key: keys
            .iter()
            .find(|k| k.key_type == Some(ApiKeyType::Secret)),
    }
}

/// The key value used for bearer headers, and the type of the key it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApiKey {
    pub value: String,
    pub key_type: Option<ApiKeyType>,
}

impl ResolvedApiKey {
    pub fn is_secret(&self) -> bool {
        self.key_type == Some(ApiKeyType::Secret)
    }
}

/// Service key first, then secret key, then the placeholder.
///
/// A key without a revealed value is skipped.
pub fn resolve_api_key(keys: &ProjectKeys<'_>) -> ResolvedApiKey {
    [keys.service_key, keys.secret_key]
        .into_iter()
        .flatten()
        .find_map(|key| {
            key.api_key.as_ref().map(|value| ResolvedApiKey {
                value: value.clone(),
                key_type: key.key_type,
            })
        })
        .unwrap_or_else(|| ResolvedApiKey {
            value: API_KEY_PLACEHOLDER.to_string(),
            key_type: None,
        })
}
