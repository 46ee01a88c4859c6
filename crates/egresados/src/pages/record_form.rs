// Create, unified and edit variants of the record form
//
// The markup carries the attributes the browser validator reads; `novalidate`
// keeps native constraint checks from swallowing the submit event.
use egresados_validation_core::ids::FEEDBACK_CLASS;
use egresados_validation_core::{FormAction, IdentifierRule};
use maud::{html, Markup};

use super::layout::{page, Chrome};
use crate::forms::{FormContext, GENDER_OPTIONS, STATUS_OPTIONS};

pub const FORM_ID: &str = "egresado-form";

/// Which form is being rendered and where it posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPage {
    pub title: String,
    pub post_to: String,
    pub rule: IdentifierRule,
    pub action: FormAction,
    pub submit_label: &'static str,
    /// Edit form: the matrícula is the key and cannot change
    pub lock_identifier: bool,
}

impl FormPage {
    /// New record, exactly 8 digits
    pub fn create() -> Self {
        Self {
            title: "New record".to_string(),
            post_to: "/egresados".to_string(),
            rule: IdentifierRule::CREATE,
            action: FormAction::Save,
            submit_label: "Save",
            lock_identifier: false,
        }
    }

    /// General form: creates or updates by matrícula, 8 to 20 digits
    pub fn unified() -> Self {
        Self {
            title: "Graduate form".to_string(),
            post_to: "/formularios".to_string(),
            rule: IdentifierRule::UNIFIED,
            action: FormAction::Update,
            submit_label: "Save changes",
            lock_identifier: false,
        }
    }

    pub fn edit(matricula: &str) -> Self {
        Self {
            title: format!("Edit {}", matricula),
            post_to: format!("/editar/{}", matricula),
            rule: IdentifierRule::UNIFIED,
            action: FormAction::Update,
            submit_label: "Update",
            lock_identifier: true,
        }
    }
}

fn control_class(ctx: &FormContext, name: &str, base: &str) -> String {
    if ctx.has_error(name) {
        format!("{} is-invalid", base)
    } else {
        base.to_string()
    }
}

fn feedback(ctx: &FormContext, name: &str) -> Markup {
    html! {
        @if let Some(message) = ctx.get_error(name) {
            div class=(FEEDBACK_CLASS) data-for=(name) { (message) }
        }
    }
}

fn text_input(ctx: &FormContext, name: &str, label: &str, kind: &str, required: bool) -> Markup {
    html! {
        div class="col-md-6 mb-3" {
            label class="form-label" for=(name) { (label) @if required { " *" } }
            input class=(control_class(ctx, name, "form-control")) type=(kind) id=(name) name=(name)
                value=(ctx.get_value(name)) required[required];
            (feedback(ctx, name))
        }
    }
}

fn select_input(
    ctx: &FormContext,
    name: &str,
    label: &str,
    options: &[&str],
    required: bool,
) -> Markup {
    let current = ctx.get_value(name);
    html! {
        div class="col-md-6 mb-3" {
            label class="form-label" for=(name) { (label) @if required { " *" } }
            select class=(control_class(ctx, name, "form-select")) id=(name) name=(name)
                required[required] {
                option value="" selected[current.is_empty()] { "Select…" }
                @for option in options {
                    option value=(option) selected[*option == current] { (option) }
                }
                // keep stored values that are not among the offered options
                @if !current.is_empty() && !options.contains(&current) {
                    option value=(current) selected { (current) }
                }
            }
            (feedback(ctx, name))
        }
    }
}

pub fn record_form(chrome: &Chrome<'_>, form: &FormPage, ctx: &FormContext) -> Markup {
    page(
        &form.title,
        chrome,
        html! {
            h2 class="mb-3" { (form.title) }
            @if ctx.has_errors() {
                div class="alert alert-danger" role="alert" {
                    "Please correct the highlighted fields before continuing."
                }
            }
            form id=(FORM_ID) method="post" action=(form.post_to) novalidate
                data-validate-form
                data-identifier-rule=(form.rule.to_string())
                data-action=(form.action.as_attr()) {
                div class="row" {
                    div class="col-md-6 mb-3" {
                        label class="form-label" for="matricula" { "Matrícula *" }
                        input class=(control_class(ctx, "matricula", "form-control")) type="text"
                            id="matricula" name="matricula" inputmode="numeric" autocomplete="off"
                            maxlength=(form.rule.max_len())
                            value=(ctx.get_value("matricula"))
                            data-identifier required readonly[form.lock_identifier];
                        (feedback(ctx, "matricula"))
                        div class="form-text" {
                            @match form.rule {
                                IdentifierRule::Exact(n) => { "Exactly " (n) " digits." }
                                IdentifierRule::Range { min, max } => {
                                    "Between " (min) " and " (max) " digits."
                                }
                            }
                        }
                    }
                    (text_input(ctx, "nombre_completo", "Full name", "text", true))
                    (text_input(ctx, "carrera", "Program", "text", true))
                    (text_input(ctx, "generacion", "Generation (YYYY-YYYY)", "text", true))
                    (select_input(ctx, "estatus", "Status", &STATUS_OPTIONS, true))
                    (select_input(ctx, "genero", "Gender", &GENDER_OPTIONS, false))
                    (text_input(ctx, "domicilio", "Address", "text", false))
                    (text_input(ctx, "telefono", "Phone", "tel", false))
                    (text_input(ctx, "email", "Email", "email", false))
                }
                div class="d-flex gap-2" {
                    button class="btn btn-primary" type="submit" { (form.submit_label) }
                    a class="btn btn-outline-secondary" href="/dashboard" { "Cancel" }
                }
            }
        },
    )
}
