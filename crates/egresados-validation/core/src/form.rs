//! Form validator
//!
//! One validator type covers every data-entry form. The page variants differ
//! only in their [`FormConfig`]: which input holds the matrícula, which
//! [`IdentifierRule`] applies and what the submit button says while the
//! request is in flight.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

use crate::field::{classify, FieldKind, FieldSpec, FieldState};
use crate::identifier::{sanitize, IdentifierRule};
use crate::timer::{TimerKey, TimerSlots};

/// Inline message for an empty required field
pub const REQUIRED_MESSAGE: &str = "this field is required";

/// Page-level banner shown when a submission is blocked
pub const BANNER_MESSAGE: &str = "Please correct the highlighted fields before continuing.";

/// How long the error banner stays up
pub const BANNER_DELAY: Duration = Duration::from_secs(5);

/// What the submit button does, which decides its in-progress label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Save,
    Update,
}

impl FormAction {
    pub fn in_progress_label(&self) -> &'static str {
        match self {
            FormAction::Save => "Saving…",
            FormAction::Update => "Updating…",
        }
    }

    /// Parse the `data-action` attribute; anything but "update" saves
    pub fn from_attr(value: &str) -> Self {
        if value.eq_ignore_ascii_case("update") {
            FormAction::Update
        } else {
            FormAction::Save
        }
    }

    pub fn as_attr(&self) -> &'static str {
        match self {
            FormAction::Save => "save",
            FormAction::Update => "update",
        }
    }
}

/// Per-page validator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub form_id: String,
    pub identifier_field: String,
    pub identifier_rule: IdentifierRule,
    pub action: FormAction,
    pub restore_delay: Duration,
    pub banner_delay: Duration,
}

impl FormConfig {
    /// The "create record" form: exactly 8 digits
    pub fn create(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            identifier_field: "matricula".to_string(),
            identifier_rule: IdentifierRule::CREATE,
            action: FormAction::Save,
            restore_delay: Duration::from_millis(3000),
            banner_delay: BANNER_DELAY,
        }
    }

    /// The general/unified form: 8 to 20 digits
    pub fn unified(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            identifier_field: "matricula".to_string(),
            identifier_rule: IdentifierRule::UNIFIED,
            action: FormAction::Update,
            restore_delay: Duration::from_millis(1500),
            banner_delay: BANNER_DELAY,
        }
    }

    pub fn with_identifier_field(mut self, name: impl Into<String>) -> Self {
        self.identifier_field = name.into();
        self
    }

    pub fn with_rule(mut self, rule: IdentifierRule) -> Self {
        self.identifier_rule = rule;
        self
    }

    pub fn with_action(mut self, action: FormAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_restore_delay(mut self, delay: Duration) -> Self {
        self.restore_delay = delay;
        self
    }
}

/// A UI change the shell must apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace an input's value (after sanitizing)
    SetValue { field: String, value: String },
    /// Toggle the input's status class and its inline message
    SetFieldState { field: String, state: FieldState },
    /// Move focus to an input
    Focus { field: String },
    /// Show (or replace) the page-level error banner
    ShowBanner { message: String },
    RemoveBanner,
    /// Disable the submit control and show an in-progress label
    DisableSubmit { label: &'static str },
    /// Put the submit control back the way it was
    RestoreSubmit,
    StartTimer { key: TimerKey, token: u64, delay: Duration },
    CancelTimer { key: TimerKey },
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// false means the shell must cancel the native submission
    pub proceed: bool,
    pub effects: Vec<Effect>,
}

/// Validator bound to a single form instance
#[derive(Debug)]
pub struct FormValidator {
    config: FormConfig,
    fields: Vec<FieldSpec>,
    states: BTreeMap<String, FieldState>,
    timers: TimerSlots,
    submitting: bool,
}

impl FormValidator {
    /// `fields` must be in document order; it decides which input gets focus
    pub fn new(config: FormConfig, fields: Vec<FieldSpec>) -> Self {
        let fields = fields
            .into_iter()
            .map(|mut spec| {
                if spec.name == config.identifier_field {
                    spec.kind = FieldKind::Identifier;
                }
                spec
            })
            .collect();

        Self {
            config,
            fields,
            states: BTreeMap::new(),
            timers: TimerSlots::new(),
            submitting: false,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Current state of a field (neutral if never validated)
    pub fn state(&self, field: &str) -> FieldState {
        self.states.get(field).cloned().unwrap_or_default()
    }

    fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields.iter().find(|s| s.name == field).map(|s| s.kind)
    }

    /// Keystroke handler. Sanitizes the matrícula, then validates.
    pub fn on_input(&mut self, field: &str, raw: &str) -> Vec<Effect> {
        let Some(kind) = self.kind_of(field) else {
            return Vec::new();
        };

        let mut effects = Vec::new();

        let value = match kind {
            FieldKind::Identifier => {
                let clean = sanitize(raw, self.config.identifier_rule);
                if clean != raw {
                    effects.push(Effect::SetValue {
                        field: field.to_string(),
                        value: clean.clone(),
                    });
                }
                clean
            }
            FieldKind::Text => raw.to_string(),
        };

        effects.extend(self.validate_field(field, &value));
        effects
    }

    /// Blur handler. Validates without touching the value.
    pub fn on_blur(&mut self, field: &str, value: &str) -> Vec<Effect> {
        self.validate_field(field, value)
    }

    pub fn validate_field(&mut self, field: &str, value: &str) -> Vec<Effect> {
        let Some(kind) = self.kind_of(field) else {
            return Vec::new();
        };

        let state = classify(value, kind, self.config.identifier_rule);
        self.states.insert(field.to_string(), state.clone());

        vec![Effect::SetFieldState {
            field: field.to_string(),
            state,
        }]
    }

    /// Submit handler
    ///
    /// `value_of` returns the current value of an input by name; `None` is
    /// treated as empty.
    pub fn on_submit<F>(&mut self, mut value_of: F) -> SubmitOutcome
    where
        F: FnMut(&str) -> Option<String>,
    {
        let rule = self.config.identifier_rule;

        // (name, state, required but empty)
        let checked: Vec<(String, FieldState, bool)> = self
            .fields
            .iter()
            .filter(|spec| spec.required || spec.kind == FieldKind::Identifier)
            .map(|spec| {
                let value = value_of(&spec.name).unwrap_or_default();
                let missing = spec.required && value.trim().is_empty();
                let state = if missing {
                    FieldState::invalid(REQUIRED_MESSAGE)
                } else {
                    classify(&value, spec.kind, rule)
                };
                (spec.name.clone(), state, missing)
            })
            .collect();

        // an empty required field takes focus before a malformed one
        let first_invalid = checked
            .iter()
            .find(|(_, _, missing)| *missing)
            .or_else(|| checked.iter().find(|(_, state, _)| state.is_invalid()))
            .map(|(name, _, _)| name.clone());

        let mut effects = Vec::with_capacity(checked.len() + 4);
        for (field, state, _) in checked {
            self.states.insert(field.clone(), state.clone());
            effects.push(Effect::SetFieldState { field, state });
        }

        if let Some(field) = first_invalid {
            effects.push(Effect::Focus { field });
            effects.push(Effect::ShowBanner {
                message: BANNER_MESSAGE.to_string(),
            });
            effects.extend(self.timers.arm(TimerKey::BannerDismiss, self.config.banner_delay));
            return SubmitOutcome {
                proceed: false,
                effects,
            };
        }

        // A request is already in flight; do not post twice
        if self.submitting {
            return SubmitOutcome {
                proceed: false,
                effects,
            };
        }

        if let Some(cancel) = self.timers.cancel(TimerKey::BannerDismiss) {
            effects.push(cancel);
            effects.push(Effect::RemoveBanner);
        }

        self.submitting = true;
        effects.push(Effect::DisableSubmit {
            label: self.config.action.in_progress_label(),
        });
        effects.extend(self.timers.arm(TimerKey::SubmitRestore, self.config.restore_delay));

        SubmitOutcome {
            proceed: true,
            effects,
        }
    }

    /// Timer callback from the shell
    pub fn on_timer(&mut self, key: TimerKey, token: u64) -> Vec<Effect> {
        if !self.timers.fire(key, token) {
            return Vec::new();
        }

        match key {
            TimerKey::SubmitRestore => {
                self.submitting = false;
                vec![Effect::RestoreSubmit]
            }
            TimerKey::BannerDismiss => vec![Effect::RemoveBanner],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldStatus;
    use alloc::collections::BTreeMap;
    use pretty_assertions::assert_eq;

    fn create_form() -> FormValidator {
        FormValidator::new(
            FormConfig::create("form-egresado"),
            vec![
                FieldSpec::text("matricula"),
                FieldSpec::text("nombre_completo").required(),
                FieldSpec::text("carrera").required(),
                FieldSpec::text("email"),
            ],
        )
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn timer_token(effects: &[Effect], wanted: TimerKey) -> u64 {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::StartTimer { key, token, .. } if *key == wanted => Some(*token),
                _ => None,
            })
            .expect("timer not started")
    }

    #[test]
    fn test_identifier_field_is_promoted() {
        let form = create_form();
        assert_eq!(form.fields()[0].kind, FieldKind::Identifier);
    }

    #[test]
    fn test_on_input_sanitizes_and_validates() {
        let mut form = create_form();
        let effects = form.on_input("matricula", "12ab34'; DROP");

        assert_eq!(
            effects,
            vec![
                Effect::SetValue {
                    field: "matricula".into(),
                    value: "1234".into()
                },
                Effect::SetFieldState {
                    field: "matricula".into(),
                    state: FieldState::invalid("need 4 more digits"),
                },
            ]
        );
    }

    #[test]
    fn test_on_input_unified_rule() {
        let mut form =
            FormValidator::new(FormConfig::unified("f"), vec![FieldSpec::identifier("matricula")]);
        let effects = form.on_input("matricula", "12ab34'; DROP");
        assert_eq!(
            form.state("matricula"),
            FieldState::invalid("length must be 8–20, currently 4")
        );
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_on_input_clean_value_does_not_rewrite() {
        let mut form = create_form();
        let effects = form.on_input("matricula", "12345678");
        assert_eq!(effects.len(), 1);
        assert_eq!(form.state("matricula").status, FieldStatus::Valid);
    }

    #[test]
    fn test_clearing_resets_to_neutral() {
        let mut form = create_form();
        form.on_input("matricula", "123");
        form.on_input("matricula", "");
        assert_eq!(form.state("matricula"), FieldState::neutral());
    }

    #[test]
    fn test_on_blur_does_not_mutate() {
        let mut form = create_form();
        let effects = form.on_blur("matricula", "12x");
        assert!(effects.iter().all(|e| !matches!(e, Effect::SetValue { .. })));
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let mut form = create_form();
        assert!(form.on_input("nope", "x").is_empty());
    }

    #[test]
    fn test_submit_blocks_and_focuses_first_empty_required() {
        let mut form = create_form();
        let data = values(&[("matricula", "12345678"), ("nombre_completo", " "), ("carrera", "")]);
        let outcome = form.on_submit(|name| data.get(name).cloned());

        assert!(!outcome.proceed);
        assert!(outcome.effects.contains(&Effect::Focus {
            field: "nombre_completo".into()
        }));
        assert_eq!(form.state("carrera"), FieldState::invalid(REQUIRED_MESSAGE));

        let banners = outcome
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::ShowBanner { .. }))
            .count();
        assert_eq!(banners, 1);
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_submit_rechecks_identifier() {
        let mut form = create_form();
        let data = values(&[
            ("matricula", "1234"),
            ("nombre_completo", "Ana"),
            ("carrera", "Derecho"),
        ]);
        let outcome = form.on_submit(|name| data.get(name).cloned());

        assert!(!outcome.proceed);
        assert!(outcome.effects.contains(&Effect::Focus {
            field: "matricula".into()
        }));
    }

    #[test]
    fn test_empty_required_field_wins_focus_over_short_identifier() {
        let mut form = create_form();
        let data = values(&[
            ("matricula", "1234"),
            ("nombre_completo", ""),
            ("carrera", "Derecho"),
        ]);
        let outcome = form.on_submit(|name| data.get(name).cloned());

        assert!(!outcome.proceed);
        let focused: Vec<_> = outcome
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Focus { .. }))
            .collect();
        assert_eq!(
            focused,
            vec![&Effect::Focus {
                field: "nombre_completo".into()
            }]
        );
        assert!(form.state("matricula").is_invalid());
    }

    #[test]
    fn test_successful_submit_disables_and_restores() {
        let mut form = create_form();
        let data = values(&[
            ("matricula", "12345678"),
            ("nombre_completo", "Ana"),
            ("carrera", "Derecho"),
        ]);
        let outcome = form.on_submit(|name| data.get(name).cloned());

        assert!(outcome.proceed);
        assert!(outcome.effects.contains(&Effect::DisableSubmit { label: "Saving…" }));
        assert!(form.is_submitting());

        let token = timer_token(&outcome.effects, TimerKey::SubmitRestore);
        assert_eq!(form.on_timer(TimerKey::SubmitRestore, token), vec![Effect::RestoreSubmit]);
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_double_submit_is_suppressed() {
        let mut form = create_form();
        let data = values(&[
            ("matricula", "12345678"),
            ("nombre_completo", "Ana"),
            ("carrera", "Derecho"),
        ]);

        let first = form.on_submit(|name| data.get(name).cloned());
        let second = form.on_submit(|name| data.get(name).cloned());

        assert!(first.proceed);
        assert!(!second.proceed);
        assert!(second
            .effects
            .iter()
            .all(|e| !matches!(e, Effect::StartTimer { .. } | Effect::DisableSubmit { .. })));
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut form = create_form();
        assert!(form.on_timer(TimerKey::SubmitRestore, 42).is_empty());
    }

    #[test]
    fn test_banner_is_replaced_not_stacked() {
        let mut form = create_form();
        let first = form.on_submit(|_| None);
        let second = form.on_submit(|_| None);

        let first_token = timer_token(&first.effects, TimerKey::BannerDismiss);
        assert!(second.effects.contains(&Effect::CancelTimer {
            key: TimerKey::BannerDismiss
        }));
        assert!(form.on_timer(TimerKey::BannerDismiss, first_token).is_empty());

        let second_token = timer_token(&second.effects, TimerKey::BannerDismiss);
        assert_eq!(
            form.on_timer(TimerKey::BannerDismiss, second_token),
            vec![Effect::RemoveBanner]
        );
    }

    #[test]
    fn test_success_clears_pending_banner() {
        let mut form = create_form();
        form.on_submit(|_| None);

        let data = values(&[
            ("matricula", "12345678"),
            ("nombre_completo", "Ana"),
            ("carrera", "Derecho"),
        ]);
        let outcome = form.on_submit(|name| data.get(name).cloned());
        assert!(outcome.proceed);
        assert!(outcome.effects.contains(&Effect::RemoveBanner));
    }

    #[test]
    fn test_update_label() {
        let mut form = FormValidator::new(
            FormConfig::unified("f"),
            vec![FieldSpec::identifier("matricula")],
        );
        let outcome = form.on_submit(|_| Some("1234567890".into()));
        assert!(outcome.effects.contains(&Effect::DisableSubmit { label: "Updating…" }));
    }

    #[test]
    fn test_form_action_attr() {
        assert_eq!(FormAction::from_attr("update"), FormAction::Update);
        assert_eq!(FormAction::from_attr("UPDATE"), FormAction::Update);
        assert_eq!(FormAction::from_attr(""), FormAction::Save);
        assert_eq!(FormAction::Update.as_attr(), "update");
    }
}
