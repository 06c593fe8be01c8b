use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    button::*, h_flex, v_flex, ActiveTheme as _, Disableable as _, Icon, Sizable as _,
};

use crate::config::AppConfig;
use crate::fields::FieldsEvent;
use crate::hook_form::HookForm;
use crate::http_request_fields::HttpRequestFields;
use crate::management_api::ManagementApi;
use crate::types::{FieldErrors, HookType, ProjectContext};

/// Main application view: owns the hook's form state and the project query
/// results, and hosts the HTTP request fields.
pub struct HookEditor {
    config: AppConfig,
    project: ProjectContext,
    form: HookForm,
    errors: FieldErrors,
    /// Errors are only shown once the user asked for a check
    checked: bool,
    loading: bool,
    fields: Entity<HttpRequestFields>,
    _subscriptions: Vec<Subscription>,
}

impl HookEditor {
    pub fn new(config: AppConfig, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let project = config.project();
        let form = HookForm::new_hook(config.hook_type);

        let fields = cx.new(|cx| {
            HttpRequestFields::new(form.props(FieldErrors::default()), project.clone(), window, cx)
        });
        fields.update(cx, |fields, cx| {
            fields.load_values(form.method, &form.url, &form.timeout_ms, window, cx);
        });

        let fields_sub = cx.subscribe_in(
            &fields,
            window,
            |this, _, event: &FieldsEvent, window, cx| {
                this.on_fields_event(event.clone(), window, cx);
            },
        );

        let mut editor = Self {
            config,
            project,
            form,
            errors: FieldErrors::default(),
            checked: false,
            loading: false,
            fields,
            _subscriptions: vec![fields_sub],
        };

        editor.refresh_queries(window, cx);
        editor
    }

    fn on_fields_event(&mut self, event: FieldsEvent, window: &mut Window, cx: &mut Context<Self>) {
        log::debug!("Fields event: {:?}", event);

        if let Some((field, value)) = event.dispatch(&mut self.form) {
            self.form.set_field(field, value);
        }
        if self.checked {
            self.errors = self.form.validate();
        }

        self.push_props(window, cx);
        cx.notify();
    }

    fn push_props(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let props = self.form.props(self.errors.clone());
        self.fields.update(cx, |fields, cx| {
            fields.set_props(props, window, cx);
        });
    }

    /// Fetch edge functions and API keys for the configured project
    fn refresh_queries(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let api = match ManagementApi::from_config(&self.config) {
            Ok(Some(api)) => api,
            Ok(None) => {
                log::warn!("No access token or project ref configured; project queries skipped");
                return;
            }
            Err(e) => {
                log::error!("Failed to create management API client: {:#}", e);
                return;
            }
        };

        let project_ref = self.project.project_ref.clone();
        self.loading = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let data = api.load_project(&project_ref).await;

            this.update_in(cx, |this, window, cx| {
                this.loading = false;
                this.fields.update(cx, |fields, cx| {
                    fields.set_queries(data, window, cx);
                });
                cx.notify();
            })?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    }

    fn on_reload_click(
        &mut self,
        _event: &ClickEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.refresh_queries(window, cx);
    }

    fn on_check_click(&mut self, _event: &ClickEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.checked = true;
        self.errors = self.form.validate();
        if self.errors.is_empty() {
            log::info!("Hook configuration is valid: {}", self.form.request_line());
        }
        self.push_props(window, cx);
        cx.notify();
    }

    fn payload_text(&self) -> String {
        serde_json::to_string_pretty(&self.form.payload()).unwrap_or_default()
    }

    fn render_errors(&self, cx: &App) -> impl IntoElement {
        let theme = cx.theme();
        let messages: Vec<String> = [&self.errors.http_url, &self.errors.timeout_ms]
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        v_flex()
            .gap_1()
            .when(self.checked && messages.is_empty(), |this| {
                this.child(div().text_sm().text_color(theme.success).child("Looks good"))
            })
            .children(
                messages
                    .into_iter()
                    .map(|message| div().text_sm().text_color(theme.danger).child(message)),
            )
    }
}

impl Render for HookEditor {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let subtitle = match self.form.hook_type {
            HookType::HttpRequest => "Trigger an HTTP request",
            HookType::SupabaseFunction => "Trigger an edge function",
        };
        let project_label = if self.project.project_ref.is_empty() {
            "No project configured".to_string()
        } else {
            format!("Project {}", self.project.project_ref)
        };

        v_flex()
            .size_full()
            .bg(theme.background)
            .child(
                // Header
                h_flex()
                    .items_center()
                    .justify_between()
                    .p_3()
                    .border_b_1()
                    .border_color(theme.border)
                    .child(
                        h_flex()
                            .items_center()
                            .gap_2()
                            .child(Icon::default().path("icons/logo.svg").size_5())
                            .child(
                                div()
                                    .font_weight(FontWeight::SEMIBOLD)
                                    .child("Database Webhook"),
                            )
                            .child(
                                div()
                                    .text_sm()
                                    .text_color(theme.muted_foreground)
                                    .child(subtitle),
                            ),
                    )
                    .child(
                        h_flex()
                            .items_center()
                            .gap_2()
                            .child(
                                div()
                                    .text_sm()
                                    .text_color(theme.muted_foreground)
                                    .child(project_label),
                            )
                            .child(
                                Button::new("reload-btn")
                                    .xsmall()
                                    .ghost()
                                    .label("Reload")
                                    .loading(self.loading)
                                    .disabled(self.loading)
                                    .on_click(cx.listener(Self::on_reload_click)),
                            ),
                    ),
            )
            .child(
                // Form
                div()
                    .id("hook-editor-scroll")
                    .flex_1()
                    .min_h_0()
                    .px_4()
                    .overflow_scroll()
                    .child(self.fields.clone()),
            )
            .child(
                // Preview and check
                v_flex()
                    .gap_2()
                    .p_4()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(
                        div()
                            .text_sm()
                            .font_weight(FontWeight::SEMIBOLD)
                            .text_color(theme.muted_foreground)
                            .child("PREVIEW"),
                    )
                    .child(div().text_sm().child(self.form.request_line()))
                    .child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(self.payload_text()),
                    )
                    .child(
                        h_flex()
                            .items_start()
                            .justify_between()
                            .child(self.render_errors(cx))
                            .child(
                                Button::new("check-btn")
                                    .primary()
                                    .label("Check")
                                    .on_click(cx.listener(Self::on_check_click)),
                            ),
                    ),
            )
    }
}
