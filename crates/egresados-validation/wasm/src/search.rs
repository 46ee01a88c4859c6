//! Live row filter for the records table

use egresados_validation_core::row_matches;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom;

pub(crate) fn attach(input: Element, table: Element) -> Result<(), JsValue> {
    let source = input.clone();
    dom::listen(&input, "input", move |_| {
        let filter = dom::value_of(&source).unwrap_or_default();
        if let Err(err) = apply(&table, &filter) {
            dom::report(&err);
        }
    })
}

fn apply(table: &Element, filter: &str) -> Result<(), JsValue> {
    for row in dom::elements(&table.query_selector_all("tbody tr")?) {
        let text = row.text_content().unwrap_or_default();
        row.class_list()
            .toggle_with_force("d-none", !row_matches(&text, filter))?;
    }
    Ok(())
}
