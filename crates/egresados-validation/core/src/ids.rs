//! Element ids and attribute names shared by the server templates and the
//! browser shell

/// Attribute marking a `<form>` for client-side validation
pub const FORM_MARKER: &str = "data-validate-form";
/// Attribute on the `<form>` holding the identifier rule (`exact:8`, `range:8-20`)
pub const RULE_ATTR: &str = "data-identifier-rule";
/// Attribute on the `<form>` holding the submit action (`save` / `update`)
pub const ACTION_ATTR: &str = "data-action";
/// Attribute on the `<form>` overriding the submit-restore delay in milliseconds
pub const RESTORE_MS_ATTR: &str = "data-restore-ms";
/// Attribute on the input that holds the matrícula
pub const IDENTIFIER_ATTR: &str = "data-identifier";

/// Page-level error banner
pub const BANNER_ID: &str = "form-banner";
/// Inline message element class; carries `data-for="<field>"`
pub const FEEDBACK_CLASS: &str = "invalid-feedback";

pub const DELETE_MODAL_ID: &str = "deleteModal";
pub const MODAL_MATRICULA_ID: &str = "modal-matricula";
pub const MODAL_NOMBRE_ID: &str = "modal-nombre";
pub const MODAL_CARRERA_ID: &str = "modal-carrera";
pub const MODAL_GENERACION_ID: &str = "modal-generacion";
pub const MODAL_ESTATUS_ID: &str = "modal-estatus";
pub const MODAL_FORM_ID: &str = "modal-delete-form";
/// Submit button of the delete form; disabled while there is no target
pub const MODAL_CONFIRM_ID: &str = "modal-confirm";

pub const SEARCH_INPUT_ID: &str = "search-input";
pub const TABLE_ID: &str = "egresados-table";
