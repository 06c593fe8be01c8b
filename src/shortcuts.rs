//! One-click header batches offered next to "Add a new header" for
//! edge-function hooks.

use crate::api_keys::ResolvedApiKey;
use crate::types::HttpArgument;

pub const SOURCE_HEADER_NAME: &str = "x-supabase-webhook-source";
pub const SOURCE_HEADER_PLACEHOLDER: &str = "[Use a secret value]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderShortcut {
    AuthHeader,
    SourceHeader,
}

impl HeaderShortcut {
    pub fn all() -> Vec<Self> {
        vec![HeaderShortcut::AuthHeader, HeaderShortcut::SourceHeader]
    }

    pub fn title(&self) -> &'static str {
        match self {
            HeaderShortcut::AuthHeader => "Add auth header with secret key",
            HeaderShortcut::SourceHeader => "Add custom source header",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HeaderShortcut::AuthHeader => {
                "Required if your edge function enforces JWT verification"
            }
            HeaderShortcut::SourceHeader => {
                "Useful to verify that the edge function was triggered from this webhook"
            }
        }
    }

    /// Fresh entries for this shortcut. Every call mints new ids.
    pub fn headers(&self, api_key: &ResolvedApiKey) -> Vec<HttpArgument> {
        match self {
            HeaderShortcut::AuthHeader => auth_headers(api_key),
            HeaderShortcut::SourceHeader => vec![source_header()],
        }
    }
}

/// `Authorization: Bearer <key>`, plus `apikey: <key>` for secret-type keys.
pub fn auth_headers(api_key: &ResolvedApiKey) -> Vec<HttpArgument> {
    let mut headers = vec![HttpArgument::new(
        "Authorization",
        format!("Bearer {}", api_key.value),
    )];
    if api_key.is_secret() {
        headers.push(HttpArgument::new("apikey", api_key.value.clone()));
    }
    headers
}

pub fn source_header() -> HttpArgument {
    HttpArgument::new(SOURCE_HEADER_NAME, SOURCE_HEADER_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiKeyType;

    fn pairs(headers: &[HttpArgument]) -> Vec<(&str, &str)> {
        headers
            .iter()
            .map(|h| (h.name.as_str(), h.value.as_str()))
            .collect()
    }

    #[test]
    fn test_auth_shortcut_with_secret_key() {
        let key = ResolvedApiKey {
            value: "sk_test_123".to_string(),
            key_type: Some(ApiKeyType::Secret),
        };
        let headers = HeaderShortcut::AuthHeader.headers(&key);
        assert_eq!(
            pairs(&headers),
            vec![
                ("Authorization", "Bearer sk_test_123"),
                ("apikey", "sk_test_123")
            ]
        );
        assert_ne!(headers[0].id, headers[1].id);
    }

    #[test]
    fn test_auth_shortcut_with_legacy_key() {
        let key = ResolvedApiKey {
            value: "eyJ.service".to_string(),
            key_type: Some(ApiKeyType::Legacy),
        };
        assert_eq!(
            pairs(&auth_headers(&key)),
            vec![("Authorization", "Bearer eyJ.service")]
        );
    }

    #[test]
    fn test_auth_shortcut_with_placeholder() {
        let key = ResolvedApiKey {
            value: crate::api_keys::API_KEY_PLACEHOLDER.to_string(),
            key_type: None,
        };
        assert_eq!(
            pairs(&auth_headers(&key)),
            vec![("Authorization", "Bearer [YOUR API KEY]")]
        );
    }

    #[test]
    fn test_source_shortcut() {
        let key = ResolvedApiKey {
            value: "sk_test_123".to_string(),
            key_type: Some(ApiKeyType::Secret),
        };
        let headers = HeaderShortcut::SourceHeader.headers(&key);
        assert_eq!(
            pairs(&headers),
            vec![("x-supabase-webhook-source", "[Use a secret value]")]
        );
    }

    #[test]
    fn test_each_call_mints_new_ids() {
        assert_ne!(source_header().id, source_header().id);
    }
}
