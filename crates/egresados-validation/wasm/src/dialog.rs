//! Wires the shared delete modal to Bootstrap's modal events

use std::cell::RefCell;
use std::rc::Rc;

use egresados_validation_core::ids::{
    MODAL_CARRERA_ID, MODAL_CONFIRM_ID, MODAL_ESTATUS_ID, MODAL_FORM_ID, MODAL_GENERACION_ID,
    MODAL_MATRICULA_ID, MODAL_NOMBRE_ID,
};
use egresados_validation_core::{DialogController, DialogView, TriggerMetadata, TriggerRegistry};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, Node};

use crate::dom;

/// Capture the metadata of every trigger pointing at `modal`
fn collect_triggers(
    document: &Document,
    modal: &Element,
) -> Result<TriggerRegistry<Element>, JsValue> {
    let selector = format!("[data-bs-target=\"#{}\"]", modal.id());
    let mut registry = TriggerRegistry::new();

    for trigger in dom::elements(&document.query_selector_all(&selector)?) {
        let meta = TriggerMetadata::from_attributes(|name| trigger.get_attribute(name));
        registry.insert(trigger, meta);
    }

    // incomplete rows are reported up front; the dialog still opens for them
    for meta in registry.incomplete() {
        dom::warn(&format!(
            "delete trigger for '{}' is missing {}",
            meta.matricula,
            meta.missing().join(", ")
        ));
    }

    Ok(registry)
}

pub(crate) fn attach(modal: Element) -> Result<(), JsValue> {
    let document = dom::document()?;
    let triggers = collect_triggers(&document, &modal)?;
    let controller = Rc::new(RefCell::new(DialogController::new()));

    // start with no target so the confirm button is disabled
    render(&document, &DialogView::cleared())?;

    let on_show = Rc::clone(&controller);
    let show_doc = document.clone();
    dom::listen(&modal, "show.bs.modal", move |event| {
        let Some(target) = related_target(&event) else {
            return;
        };
        let target: &Node = target.as_ref();
        let unknown = TriggerMetadata::default();
        let meta = triggers
            .find(|trigger| trigger.is_same_node(Some(target)))
            .unwrap_or_else(|| {
                dom::warn("delete dialog opened from an unregistered trigger");
                &unknown
            });

        let view = on_show.borrow_mut().open(meta);
        if let Err(err) = render(&show_doc, &view) {
            dom::report(&err);
        }
    })?;

    let on_hidden = Rc::clone(&controller);
    dom::listen(&modal, "hidden.bs.modal", move |_| {
        let view = on_hidden.borrow_mut().close();
        if let Err(err) = render(&document, &view) {
            dom::report(&err);
        }
    })?;

    Ok(())
}

/// Bootstrap puts the clicked button on the event as `relatedTarget`
fn related_target(event: &Event) -> Option<Element> {
    js_sys::Reflect::get(event.as_ref(), &JsValue::from_str("relatedTarget"))
        .ok()
        .and_then(|target| target.dyn_into::<Element>().ok())
}

fn render(document: &Document, view: &DialogView) -> Result<(), JsValue> {
    let set_text = |id: &str, text: &str| {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    };

    set_text(MODAL_MATRICULA_ID, &view.matricula);
    set_text(MODAL_NOMBRE_ID, &view.nombre);
    set_text(MODAL_CARRERA_ID, &view.carrera);
    set_text(MODAL_GENERACION_ID, &view.generacion);
    set_text(MODAL_ESTATUS_ID, &view.status_text);

    if let Some(badge) = document.get_element_by_id(MODAL_ESTATUS_ID) {
        if view.badge_class.is_empty() {
            badge.set_class_name("badge");
        } else {
            badge.set_class_name(&format!("badge {}", view.badge_class));
        }
    }

    if let Some(form) = document.get_element_by_id(MODAL_FORM_ID) {
        if view.can_confirm() {
            form.set_attribute("action", &view.action)?;
        } else {
            form.remove_attribute("action")?;
        }
    }

    if let Some(button) = document.get_element_by_id(MODAL_CONFIRM_ID) {
        if view.can_confirm() {
            button.remove_attribute("disabled")?;
        } else {
            button.set_attribute("disabled", "")?;
        }
    }

    Ok(())
}
