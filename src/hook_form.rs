use serde_json::{json, Map, Value};

use crate::fields::{FieldsProps, HttpArgumentCallbacks};
use crate::types::{ArgumentField, FieldErrors, FormField, HookType, HttpArgument, HttpMethod};
use crate::url_params;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 1000..=10000;

/// Form state of one webhook's HTTP trigger.
///
/// Owns the header and parameter rows; the fields view only asks for
/// changes through [`HttpArgumentCallbacks`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookForm {
    pub hook_type: HookType,
    pub method: HttpMethod,
    pub url: String,
    /// Kept as typed so a half-entered number is not lost
    pub timeout_ms: String,
    pub headers: Vec<HttpArgument>,
    pub parameters: Vec<HttpArgument>,
}

impl HookForm {
    /// A new hook with the defaults the editor starts from
    pub fn new_hook(hook_type: HookType) -> Self {
        Self {
            hook_type,
            method: HttpMethod::POST,
            url: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS.to_string(),
            headers: vec![HttpArgument::new("Content-type", "application/json")],
            parameters: vec![],
        }
    }

    /// Apply a by-name field change. Unknown methods are ignored.
    pub fn set_field(&mut self, field: FormField, value: String) {
        log::debug!("{} = {:?}", field.as_str(), value);
        match field {
            FormField::HttpMethod => match HttpMethod::from_str(&value) {
                Some(method) => self.method = method,
                None => log::warn!("Ignoring unsupported method {:?}", value),
            },
            FormField::HttpUrl => self.url = value,
            FormField::TimeoutMs => self.timeout_ms = value,
        }
    }

    /// Presence checks, plus the documented timeout range
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.url.trim().is_empty() {
            errors.http_url = Some(match self.hook_type {
                HookType::HttpRequest => "Please provide a URL".to_string(),
                HookType::SupabaseFunction => "Please select an edge function".to_string(),
            });
        }

        let timeout = self.timeout_ms.trim();
        if timeout.is_empty() {
            errors.timeout_ms = Some("Please provide a timeout".to_string());
        } else {
            match timeout.parse::<u64>() {
                Ok(ms) if TIMEOUT_RANGE_MS.contains(&ms) => {}
                _ => {
                    errors.timeout_ms =
                        Some("Timeout must be between 1000ms and 10,000ms".to_string())
                }
            }
        }

        errors
    }

    pub fn props(&self, errors: FieldErrors) -> FieldsProps {
        FieldsProps {
            hook_type: self.hook_type,
            errors,
            headers: self.headers.clone(),
            parameters: self.parameters.clone(),
        }
    }

    pub fn request_line(&self) -> String {
        url_params::request_line(self.method, &self.url, &self.parameters)
    }

    /// Arguments of the trigger's `http_request` call. Rows without a name
    /// are dropped; a repeated name keeps its last value.
    pub fn payload(&self) -> Value {
        let timeout = match self.timeout_ms.trim().parse::<u64>() {
            Ok(ms) => json!(ms),
            Err(_) => Value::Null,
        };

        json!({
            "url": self.url,
            "method": self.method.as_str(),
            "headers": named_map(&self.headers),
            "params": named_map(&self.parameters),
            "timeout_ms": timeout,
        })
    }
}

fn named_map(arguments: &[HttpArgument]) -> Map<String, Value> {
    arguments
        .iter()
        .filter(|a| !a.name.is_empty())
        .map(|a| (a.name.clone(), Value::String(a.value.clone())))
        .collect()
}

fn update_argument(
    arguments: &mut [HttpArgument],
    index: usize,
    field: ArgumentField,
    value: String,
) {
    match arguments.get_mut(index) {
        Some(argument) => match field {
            ArgumentField::Name => argument.name = value,
            ArgumentField::Value => argument.value = value,
        },
        None => log::debug!("Ignoring {} update of missing row {}", field.as_str(), index),
    }
}

fn remove_argument(arguments: &mut Vec<HttpArgument>, index: usize) {
    if index < arguments.len() {
        arguments.remove(index);
    } else {
        log::debug!("Ignoring removal of missing row {}", index);
    }
}

impl HttpArgumentCallbacks for HookForm {
    fn add_headers(&mut self, headers: Option<Vec<HttpArgument>>) {
        match headers {
            Some(batch) => self.headers.extend(batch),
            None => self.headers.push(HttpArgument::blank()),
        }
    }

    fn update_header(&mut self, index: usize, field: ArgumentField, value: String) {
        update_argument(&mut self.headers, index, field, value);
    }

    fn remove_header(&mut self, index: usize) {
        remove_argument(&mut self.headers, index);
    }

    fn add_parameter(&mut self) {
        self.parameters.push(HttpArgument::blank());
    }

    fn update_parameter(&mut self, index: usize, field: ArgumentField, value: String) {
        update_argument(&mut self.parameters, index, field, value);
    }

    fn remove_parameter(&mut self, index: usize) {
        remove_argument(&mut self.parameters, index);
    }
}
