//! Binds a [`FormValidator`] to a `<form data-validate-form>` element

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use egresados_validation_core::ids::{
    ACTION_ATTR, BANNER_ID, FEEDBACK_CLASS, IDENTIFIER_ATTR, RESTORE_MS_ATTR, RULE_ATTR,
};
use egresados_validation_core::{
    Effect, FieldSpec, FieldState, FormAction, FormConfig, FormValidator, IdentifierRule, TimerKey,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::dom;

const FIELD_SELECTOR: &str = "input[name]:not([type=hidden]), select[name], textarea[name]";

struct FormState {
    validator: FormValidator,
    timers: HashMap<TimerKey, i32>,
}

/// DOM handles plus the validator they drive
///
/// The validator sits behind its own `RefCell` and is never borrowed while
/// effects are applied: moving focus fires `focusout` synchronously, which
/// re-enters the validator.
struct FormShell {
    form: Element,
    document: Document,
    window: Window,
    submit: Option<Element>,
    submit_label: String,
    state: RefCell<FormState>,
}

enum FieldEvent {
    Input,
    Blur,
}

pub(crate) fn attach(form: Element) -> Result<(), JsValue> {
    let config = read_config(&form);
    let fields = read_fields(&form)?;
    let submit = form.query_selector("[type=submit]")?;
    let submit_label = submit
        .as_ref()
        .and_then(|b| b.text_content())
        .unwrap_or_default();

    let shell = Rc::new(FormShell {
        document: dom::document()?,
        window: dom::window()?,
        submit,
        submit_label,
        state: RefCell::new(FormState {
            validator: FormValidator::new(config, fields),
            timers: HashMap::new(),
        }),
        form: form.clone(),
    });

    let on_input = Rc::clone(&shell);
    dom::listen(&form, "input", move |event| {
        if let Some(el) = dom::event_element(&event) {
            on_input.field_event(&el, FieldEvent::Input);
        }
    })?;

    // blur does not bubble, focusout does
    let on_blur = Rc::clone(&shell);
    dom::listen(&form, "focusout", move |event| {
        if let Some(el) = dom::event_element(&event) {
            on_blur.field_event(&el, FieldEvent::Blur);
        }
    })?;

    let on_submit = Rc::clone(&shell);
    dom::listen(&form, "submit", move |event| {
        let outcome = on_submit
            .state
            .borrow_mut()
            .validator
            .on_submit(|name| on_submit.field(name).and_then(|el| dom::value_of(&el)));

        if !outcome.proceed {
            event.prevent_default();
        }
        on_submit.apply(outcome.effects);
    })?;

    Ok(())
}

fn read_config(form: &Element) -> FormConfig {
    let rule = form
        .get_attribute(RULE_ATTR)
        .and_then(|attr| match attr.parse::<IdentifierRule>() {
            Ok(rule) => Some(rule),
            Err(e) => {
                dom::warn(&e.to_string());
                None
            }
        })
        .unwrap_or_default();

    let mut config = match rule {
        IdentifierRule::Exact(_) => FormConfig::create(form.id()),
        IdentifierRule::Range { .. } => FormConfig::unified(form.id()),
    }
    .with_rule(rule);

    if let Some(action) = form.get_attribute(ACTION_ATTR) {
        config = config.with_action(FormAction::from_attr(&action));
    }

    if let Some(ms) = form
        .get_attribute(RESTORE_MS_ATTR)
        .and_then(|v| v.parse::<u64>().ok())
    {
        config = config.with_restore_delay(Duration::from_millis(ms));
    }

    if let Some(identifier) = form
        .query_selector(&format!("[{}]", IDENTIFIER_ATTR))
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute("name"))
    {
        config = config.with_identifier_field(identifier);
    }

    config
}

fn read_fields(form: &Element) -> Result<Vec<FieldSpec>, JsValue> {
    let list = form.query_selector_all(FIELD_SELECTOR)?;

    Ok(dom::elements(&list)
        .into_iter()
        .filter_map(|el| {
            let name = el.get_attribute("name")?;
            let mut spec = if el.has_attribute(IDENTIFIER_ATTR) {
                FieldSpec::identifier(name)
            } else {
                FieldSpec::text(name)
            };
            spec.required |= el.has_attribute("required");
            Some(spec)
        })
        .collect())
}

impl FormShell {
    fn field(&self, name: &str) -> Option<Element> {
        self.form
            .query_selector(&format!("[name=\"{}\"]", name))
            .ok()
            .flatten()
    }

    fn field_event(self: &Rc<Self>, el: &Element, kind: FieldEvent) {
        let (Some(name), Some(value)) = (el.get_attribute("name"), dom::value_of(el)) else {
            return;
        };

        let effects = {
            let mut state = self.state.borrow_mut();
            match kind {
                FieldEvent::Input => state.validator.on_input(&name, &value),
                FieldEvent::Blur => state.validator.on_blur(&name, &value),
            }
        };
        self.apply(effects);
    }

    fn apply(self: &Rc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            if let Err(err) = self.apply_one(effect) {
                dom::report(&err);
            }
        }
    }

    fn apply_one(self: &Rc<Self>, effect: Effect) -> Result<(), JsValue> {
        match effect {
            Effect::SetValue { field, value } => {
                if let Some(el) = self.field(&field) {
                    dom::set_value(&el, &value);
                }
            }
            Effect::SetFieldState { field, state } => {
                if let Some(el) = self.field(&field) {
                    self.render_state(&el, &field, &state)?;
                }
            }
            Effect::Focus { field } => {
                if let Some(el) = self
                    .field(&field)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                {
                    el.focus()?;
                }
            }
            Effect::ShowBanner { message } => {
                self.remove_banner();
                let banner = self.document.create_element("div")?;
                banner.set_id(BANNER_ID);
                banner.set_class_name("alert alert-danger");
                banner.set_attribute("role", "alert")?;
                banner.set_text_content(Some(&message));
                self.form.insert_adjacent_element("beforebegin", &banner)?;
            }
            Effect::RemoveBanner => self.remove_banner(),
            Effect::DisableSubmit { label } => {
                if let Some(button) = &self.submit {
                    button.set_attribute("disabled", "")?;
                    button.set_attribute("aria-busy", "true")?;
                    button.set_text_content(Some(label));
                }
            }
            Effect::RestoreSubmit => {
                if let Some(button) = &self.submit {
                    button.remove_attribute("disabled")?;
                    button.remove_attribute("aria-busy")?;
                    button.set_text_content(Some(&self.submit_label));
                }
            }
            Effect::StartTimer { key, token, delay } => {
                let shell = Rc::clone(self);
                let callback = Closure::once_into_js(move || {
                    let effects = shell.state.borrow_mut().validator.on_timer(key, token);
                    shell.apply(effects);
                });
                let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
                let handle = self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    millis,
                )?;
                self.state.borrow_mut().timers.insert(key, handle);
            }
            Effect::CancelTimer { key } => {
                let handle = self.state.borrow_mut().timers.remove(&key);
                if let Some(handle) = handle {
                    self.window.clear_timeout_with_handle(handle);
                }
            }
        }
        Ok(())
    }

    fn render_state(
        &self,
        input: &Element,
        field: &str,
        state: &FieldState,
    ) -> Result<(), JsValue> {
        let classes = input.class_list();
        classes.remove_2("is-valid", "is-invalid")?;
        if let Some(class) = state.status.css_class() {
            classes.add_1(class)?;
        }

        let selector = format!(".{}[data-for=\"{}\"]", FEEDBACK_CLASS, field);
        let existing = self.form.query_selector(&selector)?;

        match (&state.message, existing) {
            (Some(message), Some(el)) => el.set_text_content(Some(message)),
            (Some(message), None) => {
                let el = self.document.create_element("div")?;
                el.set_class_name(FEEDBACK_CLASS);
                el.set_attribute("data-for", field)?;
                el.set_text_content(Some(message));
                input.insert_adjacent_element("afterend", &el)?;
            }
            (None, Some(el)) => el.remove(),
            (None, None) => {}
        }

        Ok(())
    }

    fn remove_banner(&self) {
        if let Some(banner) = self.document.get_element_by_id(BANNER_ID) {
            banner.remove();
        }
    }
}
