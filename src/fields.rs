//! What the HTTP request fields show, computed from their inputs.
//!
//! Everything here is a pure function of the props, the latest query results
//! and the project context. The GPUI view in `http_request_fields` only
//! paints a [`FieldsLayout`] and emits the [`FieldsEvent`]s it carries.

use crate::api_keys::{get_keys, resolve_api_key, ResolvedApiKey};
use crate::shortcuts::HeaderShortcut;
use crate::targets::{create_function_href, function_options, FunctionOption};
use crate::types::{
    ApiKey, ArgumentField, EdgeFunction, FieldErrors, FormField, HookType, HttpArgument,
    HttpMethod, ProjectContext,
};

pub const URL_PLACEHOLDER: &str = "http://api.com/path/resource";
pub const URL_DESCRIPTION: &str = "URL of the HTTP request. Must include HTTP/HTTPS";
pub const TIMEOUT_HINT: &str = "Between 1000ms to 10,000ms";

/// Whole milliseconds only. Range checks are left to the form.
pub fn is_timeout_text(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}

/// Mutations the fields may request from the form that owns the rows.
pub trait HttpArgumentCallbacks {
    /// `None` appends one blank row; `Some` appends the batch in order.
    fn add_headers(&mut self, headers: Option<Vec<HttpArgument>>);
    fn update_header(&mut self, index: usize, field: ArgumentField, value: String);
    fn remove_header(&mut self, index: usize);
    fn add_parameter(&mut self);
    fn update_parameter(&mut self, index: usize, field: ArgumentField, value: String);
    fn remove_parameter(&mut self, index: usize);
}

/// Emitted by the fields view. The first six map one-to-one onto
/// [`HttpArgumentCallbacks`]; `FieldInput` is the by-name binding of the
/// method, URL and timeout inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldsEvent {
    AddHeaders(Option<Vec<HttpArgument>>),
    UpdateHeader {
        index: usize,
        field: ArgumentField,
        value: String,
    },
    RemoveHeader(usize),
    AddParameter,
    UpdateParameter {
        index: usize,
        field: ArgumentField,
        value: String,
    },
    RemoveParameter(usize),
    FieldInput {
        field: FormField,
        value: String,
    },
}

impl FieldsEvent {
    pub const ADD_HEADER: Self = FieldsEvent::AddHeaders(None);
    pub const ADD_PARAMETER: Self = FieldsEvent::AddParameter;

    /// Invoke the matching callback. Returns the by-name field update instead
    /// when the event is not a row mutation.
    pub fn dispatch(self, target: &mut impl HttpArgumentCallbacks) -> Option<(FormField, String)> {
        match self {
            FieldsEvent::AddHeaders(headers) => target.add_headers(headers),
            FieldsEvent::UpdateHeader {
                index,
                field,
                value,
            } => target.update_header(index, field, value),
            FieldsEvent::RemoveHeader(index) => target.remove_header(index),
            FieldsEvent::AddParameter => target.add_parameter(),
            FieldsEvent::UpdateParameter {
                index,
                field,
                value,
            } => target.update_parameter(index, field, value),
            FieldsEvent::RemoveParameter(index) => target.remove_parameter(index),
            FieldsEvent::FieldInput { field, value } => return Some((field, value)),
        }
        None
    }
}

/// Inputs owned by the parent form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldsProps {
    pub hook_type: HookType,
    pub errors: FieldErrors,
    pub headers: Vec<HttpArgument>,
    pub parameters: Vec<HttpArgument>,
}

/// Latest resolved values of the two project queries; empty until loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryData {
    pub functions: Vec<EdgeFunction>,
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetSection {
    /// Freeform URL input
    UrlInput,
    /// Edge-function hook on a project with no functions yet
    NoFunctions {
        create_href: String,
        error: Option<String>,
    },
    FunctionPicker { options: Vec<FunctionOption> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Parameter,
}

/// One rendered name/value row
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentRow {
    pub kind: RowKind,
    pub index: usize,
    pub argument: HttpArgument,
}

impl ArgumentRow {
    pub fn update_event(&self, field: ArgumentField, value: String) -> FieldsEvent {
        match self.kind {
            RowKind::Header => FieldsEvent::UpdateHeader {
                index: self.index,
                field,
                value,
            },
            RowKind::Parameter => FieldsEvent::UpdateParameter {
                index: self.index,
                field,
                value,
            },
        }
    }

    pub fn remove_event(&self) -> FieldsEvent {
        match self.kind {
            RowKind::Header => FieldsEvent::RemoveHeader(self.index),
            RowKind::Parameter => FieldsEvent::RemoveParameter(self.index),
        }
    }

    pub fn placeholder(&self, field: ArgumentField) -> &'static str {
        match (self.kind, field) {
            (RowKind::Header, ArgumentField::Name) => "Header name",
            (RowKind::Header, ArgumentField::Value) => "Header value",
            (RowKind::Parameter, ArgumentField::Name) => "Parameter name",
            (RowKind::Parameter, ArgumentField::Value) => "Parameter value",
        }
    }

    pub fn remove_tooltip(&self) -> &'static str {
        match self.kind {
            RowKind::Header => "Remove header",
            RowKind::Parameter => "Remove parameter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldsLayout {
    pub title: &'static str,
    pub methods: Vec<HttpMethod>,
    pub target: TargetSection,
    pub headers: Vec<ArgumentRow>,
    pub parameters: Vec<ArgumentRow>,
    /// Empty for plain HTTP hooks
    pub header_shortcuts: Vec<HeaderShortcut>,
    pub api_key: ResolvedApiKey,
}

impl FieldsLayout {
    /// Built at click time so each click carries freshly minted row ids.
    pub fn shortcut_event(&self, shortcut: HeaderShortcut) -> FieldsEvent {
        FieldsEvent::AddHeaders(Some(shortcut.headers(&self.api_key)))
    }
}

fn rows(kind: RowKind, arguments: &[HttpArgument]) -> Vec<ArgumentRow> {
    arguments
        .iter()
        .enumerate()
        .map(|(index, argument)| ArgumentRow {
            kind,
            index,
            argument: argument.clone(),
        })
        .collect()
}

pub fn describe(
    props: &FieldsProps,
    queries: &QueryData,
    project: &ProjectContext,
) -> FieldsLayout {
    let target = match props.hook_type {
        HookType::HttpRequest => TargetSection::UrlInput,
        HookType::SupabaseFunction if queries.functions.is_empty() => TargetSection::NoFunctions {
            create_href: create_function_href(&project.project_ref),
            error: props.errors.http_url.clone(),
        },
        HookType::SupabaseFunction => TargetSection::FunctionPicker {
            options: function_options(project, &queries.functions),
        },
    };

    let header_shortcuts = match props.hook_type {
        HookType::HttpRequest => vec![],
        HookType::SupabaseFunction => HeaderShortcut::all(),
    };

    FieldsLayout {
        title: props.hook_type.section_title(),
        methods: HttpMethod::all(),
        target,
        headers: rows(RowKind::Header, &props.headers),
        parameters: rows(RowKind::Parameter, &props.parameters),
        header_shortcuts,
        api_key: resolve_api_key(&get_keys(&queries.api_keys)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiKeyType;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
        added: Vec<Option<Vec<HttpArgument>>>,
    }

    impl HttpArgumentCallbacks for Recorder {
        fn add_headers(&mut self, headers: Option<Vec<HttpArgument>>) {
            self.calls.push("add_headers".to_string());
            self.added.push(headers);
        }
        fn update_header(&mut self, index: usize, field: ArgumentField, value: String) {
            self.calls
                .push(format!("update_header({index}, {}, {value})", field.as_str()));
        }
        fn remove_header(&mut self, index: usize) {
            self.calls.push(format!("remove_header({index})"));
        }
        fn add_parameter(&mut self) {
            self.calls.push("add_parameter".to_string());
        }
        fn update_parameter(&mut self, index: usize, field: ArgumentField, value: String) {
            self.calls
                .push(format!("update_parameter({index}, {}, {value})", field.as_str()));
        }
        fn remove_parameter(&mut self, index: usize) {
            self.calls.push(format!("remove_parameter({index})"));
        }
    }

    fn project() -> ProjectContext {
        ProjectContext {
            project_ref: "abcxyz".to_string(),
            rest_url: Some("https://abcxyz.supabase.co".to_string()),
        }
    }

    fn hello_world() -> EdgeFunction {
        EdgeFunction {
            id: "fn-1".to_string(),
            slug: "hello-world".to_string(),
            name: "hello-world".to_string(),
        }
    }

    fn props(hook_type: HookType) -> FieldsProps {
        FieldsProps {
            hook_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_methods_are_get_and_post() {
        let layout = describe(&props(HookType::HttpRequest), &QueryData::default(), &project());
        assert_eq!(layout.methods, vec![HttpMethod::GET, HttpMethod::POST]);
    }

    #[test]
    fn test_http_request_shows_url_input_even_with_functions() {
        let queries = QueryData {
            functions: vec![hello_world()],
            ..Default::default()
        };
        let layout = describe(&props(HookType::HttpRequest), &queries, &project());
        assert_eq!(layout.target, TargetSection::UrlInput);
        assert_eq!(layout.title, "HTTP Request");
        assert!(layout.header_shortcuts.is_empty());
    }

    #[test]
    fn test_function_hook_without_functions_shows_empty_state() {
        let mut props = props(HookType::SupabaseFunction);
        props.errors.http_url = Some("Please select an edge function".to_string());
        let layout = describe(&props, &QueryData::default(), &project());
        assert_eq!(
            layout.target,
            TargetSection::NoFunctions {
                create_href: "/project/abcxyz/functions".to_string(),
                error: Some("Please select an edge function".to_string()),
            }
        );
    }

    #[test]
    fn test_empty_state_without_error() {
        let layout = describe(
            &props(HookType::SupabaseFunction),
            &QueryData::default(),
            &project(),
        );
        match layout.target {
            TargetSection::NoFunctions { error, .. } => assert_eq!(error, None),
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn test_function_picker_option_urls() {
        let queries = QueryData {
            functions: vec![hello_world()],
            ..Default::default()
        };
        let layout = describe(&props(HookType::SupabaseFunction), &queries, &project());
        match layout.target {
            TargetSection::FunctionPicker { options } => {
                assert_eq!(options.len(), 1);
                assert_eq!(
                    options[0].url,
                    "https://abcxyz.supabase.co/functions/v1/hello-world"
                );
            }
            other => panic!("unexpected target {other:?}"),
        }
        assert_eq!(layout.title, "Edge Function");
    }

    #[test]
    fn test_function_hook_offers_both_shortcuts() {
        let layout = describe(
            &props(HookType::SupabaseFunction),
            &QueryData::default(),
            &project(),
        );
        assert_eq!(
            layout.header_shortcuts,
            vec![HeaderShortcut::AuthHeader, HeaderShortcut::SourceHeader]
        );
    }

    #[test]
    fn test_auth_shortcut_event_uses_resolved_secret_key() {
        let queries = QueryData {
            api_keys: vec![ApiKey {
                name: "default".to_string(),
                key_type: Some(ApiKeyType::Secret),
                api_key: Some("sk_test_123".to_string()),
            }],
            ..Default::default()
        };
        let layout = describe(&props(HookType::SupabaseFunction), &queries, &project());

        let mut recorder = Recorder::default();
        layout
            .shortcut_event(HeaderShortcut::AuthHeader)
            .dispatch(&mut recorder);

        assert_eq!(recorder.calls, vec!["add_headers"]);
        let batch = recorder.added[0].as_ref().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].name, "Authorization");
        assert_eq!(batch[0].value, "Bearer sk_test_123");
        assert_eq!(batch[1].name, "apikey");
        assert_eq!(batch[1].value, "sk_test_123");
    }

    #[test]
    fn test_each_shortcut_pick_appends_a_fresh_batch() {
        let layout = describe(
            &props(HookType::SupabaseFunction),
            &QueryData::default(),
            &project(),
        );

        let mut recorder = Recorder::default();
        for shortcut in &layout.header_shortcuts {
            layout.shortcut_event(*shortcut).dispatch(&mut recorder);
        }
        layout
            .shortcut_event(HeaderShortcut::SourceHeader)
            .dispatch(&mut recorder);

        assert_eq!(recorder.calls, vec!["add_headers"; 3]);
        let batches: Vec<&Vec<HttpArgument>> = recorder.added.iter().flatten().collect();
        assert_eq!(batches[0][0].name, "Authorization");
        assert_eq!(batches[0][0].value, "Bearer [YOUR API KEY]");
        assert_eq!(batches[1].len(), 1);
        assert_eq!(batches[1][0].name, "x-supabase-webhook-source");
        assert_ne!(batches[1][0].id, batches[2][0].id);
    }

    #[test]
    fn test_timeout_text_is_digits_only() {
        for ok in ["", "0", "5000", "10000"] {
            assert!(is_timeout_text(ok), "{ok:?} should be accepted");
        }
        for bad in ["abc", "5s", "1e3", "-100", "1.5", " 5000"] {
            assert!(!is_timeout_text(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_remove_row_dispatches_its_own_index() {
        let mut props = props(HookType::HttpRequest);
        props.headers = vec![
            HttpArgument::new("a", "1"),
            HttpArgument::new("b", "2"),
            HttpArgument::new("c", "3"),
        ];
        let layout = describe(&props, &QueryData::default(), &project());

        let mut recorder = Recorder::default();
        layout.headers[1].remove_event().dispatch(&mut recorder);
        assert_eq!(recorder.calls, vec!["remove_header(1)"]);
    }

    #[test]
    fn test_row_updates_route_by_kind() {
        let mut props = props(HookType::HttpRequest);
        props.headers = vec![HttpArgument::blank()];
        props.parameters = vec![HttpArgument::blank(), HttpArgument::blank()];
        let layout = describe(&props, &QueryData::default(), &project());

        let mut recorder = Recorder::default();
        layout.headers[0]
            .update_event(ArgumentField::Name, "X-Trace".to_string())
            .dispatch(&mut recorder);
        layout.parameters[1]
            .update_event(ArgumentField::Value, "42".to_string())
            .dispatch(&mut recorder);
        layout.parameters[0].remove_event().dispatch(&mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                "update_header(0, name, X-Trace)",
                "update_parameter(1, value, 42)",
                "remove_parameter(0)"
            ]
        );
    }

    #[test]
    fn test_add_actions_carry_no_entries() {
        let mut recorder = Recorder::default();
        FieldsEvent::ADD_HEADER.dispatch(&mut recorder);
        FieldsEvent::ADD_PARAMETER.dispatch(&mut recorder);
        assert_eq!(recorder.calls, vec!["add_headers", "add_parameter"]);
        assert_eq!(recorder.added, vec![None::<Vec<HttpArgument>>]);
    }

    #[test]
    fn test_field_input_is_returned_not_dispatched() {
        let mut recorder = Recorder::default();
        let bound = FieldsEvent::FieldInput {
            field: FormField::TimeoutMs,
            value: "3000".to_string(),
        }
        .dispatch(&mut recorder);
        assert_eq!(bound, Some((FormField::TimeoutMs, "3000".to_string())));
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_row_keys_follow_argument_ids() {
        let mut props = props(HookType::HttpRequest);
        props.parameters = vec![HttpArgument::new("page", "1")];
        let layout = describe(&props, &QueryData::default(), &project());
        assert_eq!(layout.parameters[0].argument.id, props.parameters[0].id);
        assert_eq!(layout.parameters[0].placeholder(ArgumentField::Name), "Parameter name");
        assert_eq!(layout.parameters[0].remove_tooltip(), "Remove parameter");
    }

    #[test]
    fn test_describe_is_idempotent() {
        let mut props = props(HookType::SupabaseFunction);
        props.headers = vec![HttpArgument::new("a", "1")];
        let queries = QueryData {
            functions: vec![hello_world()],
            ..Default::default()
        };
        assert_eq!(
            describe(&props, &queries, &project()),
            describe(&props, &queries, &project())
        );
    }
}
