//! Egresados Validation WASM
//!
//! Browser bindings for the record forms, the delete dialog and the table
//! search. `attachPage` wires everything marked up by the server templates;
//! the remaining exports give scripts direct access to the same rules.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use egresados_validation_core as core;
use egresados_validation_core::ids::{DELETE_MODAL_ID, FORM_MARKER, SEARCH_INPUT_ID, TABLE_ID};

mod dialog;
mod dom;
mod form;
mod search;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Attach validators, the delete dialog and the search box to the current page
///
/// Each piece is optional; a page without a delete modal simply skips it.
#[wasm_bindgen(js_name = attachPage)]
pub fn attach_page() -> Result<(), JsValue> {
    let document = dom::document()?;

    for el in dom::elements(&document.query_selector_all(&format!("form[{}]", FORM_MARKER))?) {
        form::attach(el)?;
    }

    if let Some(modal) = document.get_element_by_id(DELETE_MODAL_ID) {
        dialog::attach(modal)?;
    }

    if let (Some(input), Some(table)) = (
        document.get_element_by_id(SEARCH_INPUT_ID),
        document.get_element_by_id(TABLE_ID),
    ) {
        search::attach(input, table)?;
    }

    Ok(())
}

/// Identifier check result handed back to JavaScript
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IdentifierCheck {
    /// Sanitized value
    pub value: String,
    pub valid: bool,
    pub message: Option<String>,
}

fn parse_rule(rule: &str) -> Result<core::IdentifierRule, JsValue> {
    rule.parse::<core::IdentifierRule>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Strip non-digits and cap the length for the given rule (`exact:8`, `range:8-20`)
#[wasm_bindgen(js_name = sanitizeIdentifier)]
pub fn sanitize_identifier(raw: &str, rule: &str) -> Result<String, JsValue> {
    Ok(core::sanitize(raw, parse_rule(rule)?))
}

/// Sanitize then check a matrícula
///
/// # Example (JavaScript)
/// ```javascript
/// const { value, valid, message } = inspectIdentifier('2019-00', 'exact:8');
/// // value === '201900', valid === false, message === 'need 2 more digits'
/// ```
#[wasm_bindgen(js_name = inspectIdentifier)]
pub fn inspect_identifier(raw: &str, rule: &str) -> Result<JsValue, JsValue> {
    let rule = parse_rule(rule)?;
    let value = core::sanitize(raw, rule);
    let message = core::check(&value, rule).err().map(|e| e.to_string());
    let result = IdentifierCheck {
        valid: message.is_none(),
        message,
        value,
    };
    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// Badge classes for a status label
#[wasm_bindgen(js_name = badgeClass)]
pub fn badge_class(status: &str) -> String {
    core::StatusLabel::parse(status).badge_class().to_string()
}

/// Which of the given row texts match the filter
#[wasm_bindgen(js_name = filterRows)]
pub fn filter_rows(rows: JsValue, filter: &str) -> Result<JsValue, JsValue> {
    let rows: Vec<String> = serde_wasm_bindgen::from_value(rows)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse rows: {}", e)))?;

    Ok(serde_wasm_bindgen::to_value(&core::filter_rows(&rows, filter))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("2019-0042x", "exact:8").unwrap(), "20190042");
        assert_eq!(sanitize_identifier("123456789012", "exact:8").unwrap(), "12345678");
        assert!(sanitize_identifier("123", "between").is_err());
    }

    #[wasm_bindgen_test]
    fn test_inspect_identifier() {
        let value = inspect_identifier("123456", "exact:8").unwrap();
        let check: IdentifierCheck = serde_wasm_bindgen::from_value(value).unwrap();
        assert!(!check.valid);
        assert_eq!(check.message.as_deref(), Some("need 2 more digits"));

        let value = inspect_identifier("123456789012", "range:8-20").unwrap();
        let check: IdentifierCheck = serde_wasm_bindgen::from_value(value).unwrap();
        assert!(check.valid);
        assert_eq!(check.message, None);
    }

    #[wasm_bindgen_test]
    fn test_badge_class() {
        assert_eq!(badge_class("Titulado"), "bg-success");
        assert_eq!(badge_class("Egresado"), "bg-primary");
        assert_eq!(badge_class("Baja"), "bg-warning text-dark");
    }

    #[wasm_bindgen_test]
    fn test_filter_rows() {
        let rows =
            serde_wasm_bindgen::to_value(&vec!["Juan Pérez Derecho", "Ana Ruiz Medicina"]).unwrap();
        let visible = filter_rows(rows, "ana").unwrap();
        let result: Vec<bool> = serde_wasm_bindgen::from_value(visible).unwrap();
        assert_eq!(result, vec![false, true]);
    }
}
