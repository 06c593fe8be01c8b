use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HTTP methods a webhook may issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    #[default]
    POST,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![HttpMethod::GET, HttpMethod::POST]
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            _ => None,
        }
    }
}

/// What the webhook triggers: a raw HTTP endpoint or a project edge function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookType {
    #[default]
    HttpRequest,
    SupabaseFunction,
}

impl HookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookType::HttpRequest => "http_request",
            HookType::SupabaseFunction => "supabase_function",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "http_request" => Some(HookType::HttpRequest),
            "supabase_function" => Some(HookType::SupabaseFunction),
            _ => None,
        }
    }

    /// Section title shown above method and target
    pub fn section_title(&self) -> &'static str {
        match self {
            HookType::HttpRequest => "HTTP Request",
            HookType::SupabaseFunction => "Edge Function",
        }
    }
}

/// A header or query parameter row.
///
/// `id` only keys the row for rendering; it never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpArgument {
    pub id: Uuid,
    pub name: String,
    pub value: String,
}

impl HttpArgument {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new("", "")
    }
}

/// Which half of a row an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentField {
    Name,
    Value,
}

impl ArgumentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentField::Name => "name",
            ArgumentField::Value => "value",
        }
    }
}

/// Form fields bound by name rather than through the row callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    HttpMethod,
    HttpUrl,
    TimeoutMs,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::HttpMethod => "http_method",
            FormField::HttpUrl => "http_url",
            FormField::TimeoutMs => "timeout_ms",
        }
    }
}

/// Deployed edge function, as listed by the management API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFunction {
    pub id: String,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyType {
    Legacy,
    Publishable,
    Secret,
}

/// API key descriptor. `api_key` is only populated when revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub key_type: Option<ApiKeyType>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Per-field validation messages. `None` means the field has no error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub http_url: Option<String>,
    pub timeout_ms: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.http_url.is_none() && self.timeout_ms.is_none()
    }
}

/// Project the hook belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    pub project_ref: String,
    pub rest_url: Option<String>,
}
