// File: src/forms.rs
// Purpose: Submitted record form, its server-side validation, and the context
// used to re-render it with errors and the original values

use std::collections::HashMap;

use egresados_validation_core::{identifier_rule, phone_number, IdentifierRule, REQUIRED_MESSAGE};
use garde::Validate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::database::{Egresado, NewEgresado};

/// Status labels offered by the forms; the badge mapping lives in the core
pub const STATUS_OPTIONS: [&str; 3] = ["Egresado", "Titulado", "En trámite"];

pub const GENDER_OPTIONS: [&str; 3] = ["Femenino", "Masculino", "Otro"];

static GENERATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("valid generation regex"));

/// Record form as posted by the browser or the JSON API
///
/// Validated with the page's [`IdentifierRule`] as context, the same rule the
/// browser validator enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[garde(context(IdentifierRule))]
pub struct EgresadoForm {
    #[serde(default)]
    #[garde(custom(identifier_rule))]
    pub matricula: String,

    #[serde(default)]
    #[garde(custom(required), length(max = 200))]
    pub nombre_completo: String,

    #[serde(default)]
    #[garde(custom(required), length(max = 100))]
    pub carrera: String,

    #[serde(default)]
    #[garde(custom(generation))]
    pub generacion: String,

    #[serde(default)]
    #[garde(custom(required), length(max = 50))]
    pub estatus: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[garde(skip)]
    pub domicilio: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[garde(skip)]
    pub genero: Option<String>,

    #[serde(default)]
    #[garde(custom(phone_number))]
    pub telefono: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[garde(email)]
    pub email: Option<String>,
}

fn required(value: &str, _rule: &IdentifierRule) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new(REQUIRED_MESSAGE))
    } else {
        Ok(())
    }
}

/// `YYYY-YYYY`, end year not before start year
fn generation(value: &str, rule: &IdentifierRule) -> garde::Result {
    required(value, rule)?;

    let caps = GENERATION
        .captures(value.trim())
        .ok_or_else(|| garde::Error::new("use the form YYYY-YYYY"))?;

    let start: u32 = caps[1].parse().map_err(|_| garde::Error::new("invalid start year"))?;
    let end: u32 = caps[2].parse().map_err(|_| garde::Error::new("invalid end year"))?;

    if end < start {
        return Err(garde::Error::new("end year must not precede start year"));
    }
    Ok(())
}

/// Treat blank strings as absent
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

impl EgresadoForm {
    /// Validate against a rule, collecting the first message per field
    pub fn check(&self, rule: IdentifierRule) -> Result<(), HashMap<String, String>> {
        self.validate_with(&rule).map_err(|report| {
            let mut errors = HashMap::new();
            for (path, error) in report.iter() {
                errors
                    .entry(path.to_string())
                    .or_insert_with(|| error.message().to_string());
            }
            errors
        })
    }

    /// Trimmed values ready for insertion
    pub fn into_new(self) -> NewEgresado {
        let telefono = self.telefono.trim().to_string();
        NewEgresado {
            matricula: self.matricula.trim().to_string(),
            nombre_completo: self.nombre_completo.trim().to_string(),
            carrera: self.carrera.trim().to_string(),
            generacion: self.generacion.trim().to_string(),
            estatus: self.estatus.trim().to_string(),
            domicilio: self.domicilio,
            genero: self.genero,
            telefono: (!telefono.is_empty()).then_some(telefono),
            email: self.email,
        }
    }

    /// Submitted values by field name, for re-rendering
    pub fn values(&self) -> HashMap<String, String> {
        let optional = |v: &Option<String>| v.clone().unwrap_or_default();
        [
            ("matricula", self.matricula.clone()),
            ("nombre_completo", self.nombre_completo.clone()),
            ("carrera", self.carrera.clone()),
            ("generacion", self.generacion.clone()),
            ("estatus", self.estatus.clone()),
            ("domicilio", optional(&self.domicilio)),
            ("genero", optional(&self.genero)),
            ("telefono", self.telefono.clone()),
            ("email", optional(&self.email)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

impl From<&Egresado> for EgresadoForm {
    fn from(record: &Egresado) -> Self {
        Self {
            matricula: record.matricula.clone(),
            nombre_completo: record.nombre_completo.clone(),
            carrera: record.carrera.clone(),
            generacion: record.generacion.clone(),
            estatus: record.estatus.clone(),
            domicilio: record.domicilio.clone(),
            genero: record.genero.clone(),
            telefono: record.telefono.clone().unwrap_or_default(),
            email: record.email.clone(),
        }
    }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Context for forms that includes validation errors and original values
#[derive(Debug, Clone, Default)]
pub struct FormContext {
    /// Field names to error messages
    pub errors: HashMap<String, String>,
    /// Original field values submitted
    pub values: HashMap<String, String>,
}

impl FormContext {
    pub fn new(errors: HashMap<String, String>, values: HashMap<String, String>) -> Self {
        Self { errors, values }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Pre-filled from a stored record, no errors
    pub fn from_record(record: &Egresado) -> Self {
        Self::new(HashMap::new(), EgresadoForm::from(record).values())
    }

    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.insert(field.into(), message.into());
        self
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|s| s.as_str())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn get_value(&self, field: &str) -> &str {
        self.values.get(field).map(|s| s.as_str()).unwrap_or("")
    }
}
