use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    button::*,
    h_flex,
    input::*,
    menu::{DropdownMenu as _, PopupMenuItem},
    select::*,
    v_flex, ActiveTheme as _, IndexPath, Sizable as _,
};
use gpui_component::input::{InputEvent, MaskPattern};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::fields::{
    describe, is_timeout_text, ArgumentRow, FieldsEvent, FieldsLayout, FieldsProps, QueryData,
    RowKind, TargetSection, TIMEOUT_HINT, URL_DESCRIPTION, URL_PLACEHOLDER,
};
use crate::targets::FunctionOption;
use crate::types::{ArgumentField, FormField, HttpMethod, ProjectContext};

/// Studio pages live under this prefix; the empty state links into it.
const DASHBOARD_URL: &str = "https://supabase.com/dashboard";

impl SelectItem for FunctionOption {
    type Value = String;

    fn title(&self) -> SharedString {
        self.label.clone().into()
    }

    fn value(&self) -> &Self::Value {
        &self.url
    }
}

/// Name and value inputs of one row, kept for as long as the row's id is
/// present in the props.
struct RowInputs {
    name_input: Entity<InputState>,
    value_input: Entity<InputState>,
    _subscriptions: Vec<Subscription>,
}

/// Method, target, timeout, headers and parameters of a webhook's HTTP
/// trigger.
///
/// Rows are owned by the parent: every edit is emitted as a [`FieldsEvent`]
/// and only shows up here once the parent hands back new props.
pub struct HttpRequestFields {
    props: FieldsProps,
    queries: QueryData,
    project: ProjectContext,
    layout: FieldsLayout,
    method_select: Entity<SelectState<Vec<&'static str>>>,
    url_input: Entity<InputState>,
    timeout_input: Entity<InputState>,
    function_select: Option<Entity<SelectState<Vec<FunctionOption>>>>,
    function_options: Vec<FunctionOption>,
    selected_url: String,
    /// Last accepted timeout text, restored when a non-numeric edit slips past the mask
    timeout_text: String,
    rows: HashMap<Uuid, RowInputs>,
    _subscriptions: Vec<Subscription>,
    function_subscription: Option<Subscription>,
}

impl HttpRequestFields {
    pub fn new(
        props: FieldsProps,
        project: ProjectContext,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let queries = QueryData::default();
        let layout = describe(&props, &queries, &project);

        let methods: Vec<&'static str> = layout.methods.iter().map(|m| m.as_str()).collect();
        let method_select = cx.new(|cx| {
            SelectState::new(methods, Some(IndexPath::default()), window, cx)
        });

        let url_input = cx.new(|cx| InputState::new(window, cx).placeholder(URL_PLACEHOLDER));
        let timeout_input = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("5000")
                .mask_pattern(MaskPattern::Number {
                    separator: None,
                    fraction: Some(0),
                })
        });

        let method_sub = cx.subscribe_in(
            &method_select,
            window,
            |_this, _, event: &SelectEvent<Vec<&'static str>>, _window, cx| {
                if let SelectEvent::Confirm(Some(method)) = event {
                    cx.emit(FieldsEvent::FieldInput {
                        field: FormField::HttpMethod,
                        value: method.to_string(),
                    });
                }
            },
        );

        let url_sub = cx.subscribe_in(
            &url_input,
            window,
            |this, state, event: &InputEvent, _window, cx| {
                if let InputEvent::Change = event {
                    let value = state.read(cx).value().to_string();
                    if value != this.selected_url {
                        this.selected_url = value.clone();
                        cx.emit(FieldsEvent::FieldInput {
                            field: FormField::HttpUrl,
                            value,
                        });
                    }
                }
            },
        );

        let timeout_sub = cx.subscribe_in(
            &timeout_input,
            window,
            |this, state, event: &InputEvent, window, cx| {
                if let InputEvent::Change = event {
                    this.on_timeout_input(state, window, cx);
                }
            },
        );

        let mut fields = Self {
            props,
            queries,
            project,
            layout,
            method_select,
            url_input,
            timeout_input,
            function_select: None,
            function_options: vec![],
            selected_url: String::new(),
            timeout_text: String::new(),
            rows: HashMap::new(),
            _subscriptions: vec![method_sub, url_sub, timeout_sub],
            function_subscription: None,
        };

        fields.sync_rows(window, cx);
        fields
    }

    /// Fill the by-name inputs from the form, e.g. when editing an existing hook
    pub fn load_values(
        &mut self,
        method: HttpMethod,
        url: &str,
        timeout_ms: &str,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let method_index = HttpMethod::all()
            .iter()
            .position(|m| *m == method)
            .unwrap_or(0);
        self.method_select.update(cx, |select, cx| {
            select.set_selected_index(Some(IndexPath::default().row(method_index)), window, cx);
        });

        self.selected_url = url.to_string();
        self.url_input.update(cx, |input, cx| {
            input.set_value(url.to_string(), window, cx);
        });
        self.timeout_text = timeout_ms.to_string();
        self.timeout_input.update(cx, |input, cx| {
            input.set_value(timeout_ms.to_string(), window, cx);
        });

        // Rebuilt so the picker preselects the loaded URL
        self.function_select = None;
        self.sync_function_select(window, cx);
        cx.notify();
    }

    pub fn set_props(&mut self, props: FieldsProps, window: &mut Window, cx: &mut Context<Self>) {
        if props == self.props {
            return;
        }
        self.props = props;
        self.relayout(window, cx);
    }

    /// Latest results of the project queries
    pub fn set_queries(&mut self, queries: QueryData, window: &mut Window, cx: &mut Context<Self>) {
        if queries == self.queries {
            return;
        }
        self.queries = queries;
        self.relayout(window, cx);
    }

    fn relayout(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.layout = describe(&self.props, &self.queries, &self.project);
        self.sync_rows(window, cx);
        self.sync_function_select(window, cx);
        cx.notify();
    }

    /// Create inputs for new row ids, drop those of removed rows, and pull
    /// values that changed outside the inputs.
    fn sync_rows(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let live: HashSet<Uuid> = self
            .layout
            .headers
            .iter()
            .chain(self.layout.parameters.iter())
            .map(|row| row.argument.id)
            .collect();
        self.rows.retain(|id, _| live.contains(id));

        for row in self.layout.headers.iter().chain(self.layout.parameters.iter()) {
            let argument = &row.argument;
            match self.rows.get(&argument.id) {
                Some(inputs) => {
                    if inputs.name_input.read(cx).value().to_string() != argument.name {
                        inputs.name_input.update(cx, |input, cx| {
                            input.set_value(argument.name.clone(), window, cx);
                        });
                    }
                    if inputs.value_input.read(cx).value().to_string() != argument.value {
                        inputs.value_input.update(cx, |input, cx| {
                            input.set_value(argument.value.clone(), window, cx);
                        });
                    }
                }
                None => {
                    let inputs = Self::new_row_inputs(row, window, cx);
                    self.rows.insert(argument.id, inputs);
                }
            }
        }
    }

    fn new_row_inputs(row: &ArgumentRow, window: &mut Window, cx: &mut Context<Self>) -> RowInputs {
        let id = row.argument.id;
        let name_input = cx.new(|cx| {
            let mut input = InputState::new(window, cx)
                .placeholder(row.placeholder(ArgumentField::Name));
            input.set_value(row.argument.name.clone(), window, cx);
            input
        });
        let value_input = cx.new(|cx| {
            let mut input = InputState::new(window, cx)
                .placeholder(row.placeholder(ArgumentField::Value));
            input.set_value(row.argument.value.clone(), window, cx);
            input
        });

        let mut subscriptions = Vec::with_capacity(2);
        for (input, field) in [
            (&name_input, ArgumentField::Name),
            (&value_input, ArgumentField::Value),
        ] {
            subscriptions.push(cx.subscribe_in(
                input,
                window,
                move |this, state, event: &InputEvent, _window, cx| {
                    if let InputEvent::Change = event {
                        let value = state.read(cx).value().to_string();
                        this.on_row_input(id, field, value, cx);
                    }
                },
            ));
        }

        RowInputs {
            name_input,
            value_input,
            _subscriptions: subscriptions,
        }
    }

    /// Rows are found by id so an edit after a removal still targets the
    /// row's current index.
    fn on_row_input(
        &mut self,
        id: Uuid,
        field: ArgumentField,
        value: String,
        cx: &mut Context<Self>,
    ) {
        let Some(row) = self
            .layout
            .headers
            .iter()
            .chain(self.layout.parameters.iter())
            .find(|row| row.argument.id == id)
        else {
            return;
        };

        let current = match field {
            ArgumentField::Name => &row.argument.name,
            ArgumentField::Value => &row.argument.value,
        };
        if *current == value {
            return;
        }

        cx.emit(row.update_event(field, value));
    }

    /// Rebuild the function picker when its options change
    fn sync_function_select(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let options = match &self.layout.target {
            TargetSection::FunctionPicker { options } => options.clone(),
            _ => {
                self.function_select = None;
                self.function_subscription = None;
                self.function_options.clear();
                return;
            }
        };

        let selected = options
            .iter()
            .position(|o| o.url == self.selected_url)
            .map(|row| IndexPath::default().row(row));

        if self.function_select.is_some() && options == self.function_options {
            return;
        }

        let select = cx.new(|cx| SelectState::new(options.clone(), selected, window, cx));
        let subscription = cx.subscribe_in(
            &select,
            window,
            |this, _, event: &SelectEvent<Vec<FunctionOption>>, _window, cx| {
                if let SelectEvent::Confirm(Some(url)) = event {
                    this.selected_url = url.clone();
                    cx.emit(FieldsEvent::FieldInput {
                        field: FormField::HttpUrl,
                        value: url.clone(),
                    });
                }
            },
        );

        self.function_options = options;
        self.function_select = Some(select);
        self.function_subscription = Some(subscription);
    }

    /// Only whole numbers reach the form; anything else puts back the last
    /// accepted text.
    fn on_timeout_input(
        &mut self,
        state: &Entity<InputState>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let value = state.read(cx).value().to_string();
        if value == self.timeout_text {
            return;
        }

        if !is_timeout_text(&value) {
            log::debug!("Rejecting non-numeric timeout {:?}", value);
            let restore = self.timeout_text.clone();
            state.update(cx, |input, cx| {
                input.set_value(restore, window, cx);
            });
            return;
        }

        self.timeout_text = value.clone();
        cx.emit(FieldsEvent::FieldInput {
            field: FormField::TimeoutMs,
            value,
        });
    }

    fn render_target(&self, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();

        match &self.layout.target {
            TargetSection::UrlInput => v_flex()
                .gap_1()
                .child(field_label("URL", None, cx))
                .child(Input::new(&self.url_input))
                .child(
                    div()
                        .text_xs()
                        .text_color(theme.muted_foreground)
                        .child(URL_DESCRIPTION),
                )
                .into_any_element(),
            TargetSection::NoFunctions { create_href, error } => {
                let url = format!("{}{}", DASHBOARD_URL, create_href);
                v_flex()
                    .gap_1()
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Select which edge function to trigger"),
                    )
                    .child(
                        h_flex()
                            .items_center()
                            .justify_between()
                            .gap_4()
                            .p_4()
                            .rounded_md()
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.muted)
                            .child(div().text_sm().child("No edge functions created yet"))
                            .child(
                                Button::new("create-edge-function")
                                    .label("Create an edge function")
                                    .on_click(move |_, _window, cx| {
                                        cx.open_url(&url);
                                    }),
                            ),
                    )
                    .when_some(error.clone(), |this, error| {
                        this.child(div().text_sm().text_color(theme.danger).child(error))
                    })
                    .into_any_element()
            }
            TargetSection::FunctionPicker { .. } => v_flex()
                .gap_1()
                .child(field_label("Select which edge function to trigger", None, cx))
                .when_some(self.function_select.as_ref(), |this, select| {
                    this.child(Select::new(select).placeholder("Choose a function"))
                })
                .into_any_element(),
        }
    }

    fn render_row(&self, row: &ArgumentRow, cx: &mut Context<Self>) -> Option<impl IntoElement> {
        let inputs = self.rows.get(&row.argument.id)?;
        let remove = row.remove_event();
        let id_prefix = match row.kind {
            RowKind::Header => "remove-header",
            RowKind::Parameter => "remove-parameter",
        };

        Some(
            h_flex()
                .gap_2()
                .items_center()
                .w_full()
                .child(div().flex_1().child(Input::new(&inputs.name_input).small()))
                .child(div().flex_1().child(Input::new(&inputs.value_input).small()))
                .child(
                    Button::new((id_prefix, row.index))
                        .ghost()
                        .xsmall()
                        .label("×")
                        .tooltip(row.remove_tooltip())
                        .on_click(cx.listener(move |_this, _event: &ClickEvent, _window, cx| {
                            cx.emit(remove.clone());
                        })),
                ),
        )
    }

    fn render_headers(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let has_shortcuts = !self.layout.header_shortcuts.is_empty();
        let rows: Vec<_> = self
            .layout
            .headers
            .iter()
            .filter_map(|row| self.render_row(row, cx))
            .collect();

        let add_button = Button::new("add-header")
            .xsmall()
            .label("+ Add a new header")
            .on_click(cx.listener(|_this, _event: &ClickEvent, _window, cx| {
                cx.emit(FieldsEvent::ADD_HEADER);
            }));

        v_flex().gap_2().children(rows).child(
            h_flex()
                .items_center()
                .child(add_button)
                .when(has_shortcuts, |this| {
                    this.child(self.render_shortcut_menu(cx))
                }),
        )
    }

    /// Dropdown next to "Add a new header". Each pick builds its batch from
    /// the layout current at click time.
    fn render_shortcut_menu(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let entity = cx.entity().downgrade();
        let shortcuts = self.layout.header_shortcuts.clone();

        Button::new("header-shortcuts")
            .xsmall()
            .label("▾")
            .tooltip("Header shortcuts")
            .dropdown_menu(move |menu, _window, _cx| {
                shortcuts
                    .iter()
                    .enumerate()
                    .fold(menu, |menu, (index, shortcut)| {
                        let shortcut = *shortcut;
                        let entity = entity.clone();
                        let menu = if index > 0 { menu.separator() } else { menu };

                        menu.item(
                            PopupMenuItem::element(move |_window, cx| {
                                v_flex()
                                    .gap_1()
                                    .py_1()
                                    .child(div().text_sm().child(shortcut.title()))
                                    .child(
                                        div()
                                            .text_xs()
                                            .text_color(cx.theme().muted_foreground)
                                            .child(shortcut.description()),
                                    )
                            })
                            .on_click(move |_, _, cx| {
                                let updated = entity.update(cx, |this, cx| {
                                    let event = this.layout.shortcut_event(shortcut);
                                    cx.emit(event);
                                });
                                if updated.is_err() {
                                    log::debug!("Fields view gone before {:?} applied", shortcut);
                                }
                            }),
                        )
                    })
            })
    }

    fn render_parameters(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let rows: Vec<_> = self
            .layout
            .parameters
            .iter()
            .filter_map(|row| self.render_row(row, cx))
            .collect();

        v_flex().gap_2().children(rows).child(
            div().child(
                Button::new("add-parameter")
                    .xsmall()
                    .label("+ Add a new parameter")
                    .on_click(cx.listener(|_this, _event: &ClickEvent, _window, cx| {
                        cx.emit(FieldsEvent::ADD_PARAMETER);
                    })),
            ),
        )
    }
}

impl EventEmitter<FieldsEvent> for HttpRequestFields {}

fn field_label(label: &'static str, hint: Option<&'static str>, cx: &App) -> impl IntoElement {
    let theme = cx.theme();
    h_flex()
        .justify_between()
        .text_sm()
        .child(div().text_color(theme.foreground).child(label))
        .when_some(hint, |this, hint| {
            this.child(div().text_color(theme.muted_foreground).child(hint))
        })
}

fn form_section(title: &'static str, content: impl IntoElement, cx: &App) -> Div {
    let theme = cx.theme();
    h_flex()
        .items_start()
        .gap_6()
        .w_full()
        .py_4()
        .border_b_1()
        .border_color(theme.border)
        .child(
            div()
                .w(relative(0.3))
                .text_sm()
                .font_weight(FontWeight::SEMIBOLD)
                .text_color(theme.foreground)
                .child(title),
        )
        .child(v_flex().flex_1().gap_3().child(content))
}

impl Render for HttpRequestFields {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let target = self.render_target(cx);
        let headers = self.render_headers(cx);
        let parameters = self.render_parameters(cx);

        let request = v_flex()
            .gap_3()
            .child(
                v_flex()
                    .gap_1()
                    .child(field_label("Method", None, cx))
                    .child(div().w(px(140.)).child(Select::new(&self.method_select))),
            )
            .child(target)
            .child(
                v_flex()
                    .gap_1()
                    .child(field_label("Timeout", Some(TIMEOUT_HINT), cx))
                    .child(
                        Input::new(&self.timeout_input)
                            .suffix(div().text_color(cx.theme().muted_foreground).child("ms")),
                    ),
            );

        v_flex()
            .w_full()
            .child(form_section(self.layout.title, request, cx))
            .child(form_section("HTTP Headers", headers, cx))
            .child(form_section("HTTP Parameters", parameters, cx))
    }
}
