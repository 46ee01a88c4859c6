//! Delete-confirmation dialog
//!
//! A single dialog instance serves every row of the table. Each row's
//! trigger carries a [`TriggerMetadata`]; opening the dialog turns it into a
//! [`DialogContext`] and closing drops the context again.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Standing of a graduate, drives the badge color
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLabel {
    Titulado,
    Egresado,
    Other(String),
}

impl StatusLabel {
    /// Exact match on the stored label; anything unknown is kept verbatim
    pub fn parse(label: &str) -> Self {
        match label {
            "Titulado" => StatusLabel::Titulado,
            "Egresado" => StatusLabel::Egresado,
            other => StatusLabel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusLabel::Titulado => "Titulado",
            StatusLabel::Egresado => "Egresado",
            StatusLabel::Other(s) => s,
        }
    }

    /// Bootstrap badge classes
    pub fn badge_class(&self) -> &'static str {
        match self {
            StatusLabel::Titulado => "bg-success",
            StatusLabel::Egresado => "bg-primary",
            StatusLabel::Other(_) => "bg-warning text-dark",
        }
    }
}

/// Names of the `data-*` attributes a trigger carries
pub const TRIGGER_ATTRIBUTES: [&str; 5] = [
    "data-matricula",
    "data-nombre",
    "data-carrera",
    "data-generacion",
    "data-estatus",
];

/// Per-row metadata, captured once when the page is initialised
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerMetadata {
    pub matricula: String,
    pub nombre: String,
    pub carrera: String,
    pub generacion: String,
    pub estatus: String,
    missing: Vec<&'static str>,
}

impl TriggerMetadata {
    pub fn new(
        matricula: impl Into<String>,
        nombre: impl Into<String>,
        carrera: impl Into<String>,
        generacion: impl Into<String>,
        estatus: impl Into<String>,
    ) -> Self {
        Self {
            matricula: matricula.into(),
            nombre: nombre.into(),
            carrera: carrera.into(),
            generacion: generacion.into(),
            estatus: estatus.into(),
            missing: Vec::new(),
        }
    }

    /// Build from an attribute lookup. Absent attributes become empty
    /// strings and are listed in [`missing`](Self::missing).
    pub fn from_attributes<F>(mut attr: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| {
            attr(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };

        let matricula = read(TRIGGER_ATTRIBUTES[0]);
        let nombre = read(TRIGGER_ATTRIBUTES[1]);
        let carrera = read(TRIGGER_ATTRIBUTES[2]);
        let generacion = read(TRIGGER_ATTRIBUTES[3]);
        let estatus = read(TRIGGER_ATTRIBUTES[4]);

        Self {
            matricula,
            nombre,
            carrera,
            generacion,
            estatus,
            missing,
        }
    }

    /// Attributes that were absent on the trigger
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Metadata of every trigger on the page, keyed by the trigger handle
///
/// Built once when the page is wired; opening the dialog looks the trigger up
/// here instead of reading its attributes again.
#[derive(Debug, Clone)]
pub struct TriggerRegistry<K> {
    entries: Vec<(K, TriggerMetadata)>,
}

impl<K> Default for TriggerRegistry<K> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K> TriggerRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, meta: TriggerMetadata) {
        self.entries.push((key, meta));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First trigger whose handle satisfies `is_key`
    pub fn find<P>(&self, mut is_key: P) -> Option<&TriggerMetadata>
    where
        P: FnMut(&K) -> bool,
    {
        self.entries
            .iter()
            .find(|(key, _)| is_key(key))
            .map(|(_, meta)| meta)
    }

    pub fn incomplete(&self) -> impl Iterator<Item = &TriggerMetadata> {
        self.entries.iter().map(|(_, meta)| meta).filter(|meta| !meta.is_complete())
    }
}

/// Delete endpoint for a matrícula; empty when there is nothing to delete
pub fn delete_path(matricula: &str) -> String {
    if matricula.is_empty() {
        String::new()
    } else {
        alloc::format!("/eliminar/{}", matricula)
    }
}

/// Live dialog state while the modal is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogContext {
    pub matricula: String,
    pub nombre: String,
    pub carrera: String,
    pub generacion: String,
    pub status: StatusLabel,
    pub action: String,
}

impl DialogContext {
    pub fn from_metadata(meta: &TriggerMetadata) -> Self {
        Self {
            matricula: meta.matricula.clone(),
            nombre: meta.nombre.clone(),
            carrera: meta.carrera.clone(),
            generacion: meta.generacion.clone(),
            status: StatusLabel::parse(&meta.estatus),
            action: delete_path(&meta.matricula),
        }
    }
}

/// Everything the shell writes into the modal, in one piece
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialogView {
    pub matricula: String,
    pub nombre: String,
    pub carrera: String,
    pub generacion: String,
    pub status_text: String,
    pub badge_class: &'static str,
    pub action: String,
}

impl DialogView {
    /// All fields empty, no badge, no confirm target
    pub fn cleared() -> Self {
        Self::default()
    }

    /// The confirm control may post only when a delete target is set
    pub fn can_confirm(&self) -> bool {
        !self.action.is_empty()
    }
}

impl From<&DialogContext> for DialogView {
    fn from(ctx: &DialogContext) -> Self {
        Self {
            matricula: ctx.matricula.clone(),
            nombre: ctx.nombre.clone(),
            carrera: ctx.carrera.clone(),
            generacion: ctx.generacion.clone(),
            status_text: ctx.status.as_str().to_string(),
            badge_class: ctx.status.badge_class(),
            action: ctx.action.clone(),
        }
    }
}

/// Drives the single shared confirmation dialog
#[derive(Debug, Default)]
pub struct DialogController {
    context: Option<DialogContext>,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, meta: &TriggerMetadata) -> DialogView {
        let ctx = DialogContext::from_metadata(meta);
        let view = DialogView::from(&ctx);
        self.context = Some(ctx);
        view
    }

    pub fn close(&mut self) -> DialogView {
        self.context = None;
        DialogView::cleared()
    }

    pub fn context(&self) -> Option<&DialogContext> {
        self.context.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.context.is_some()
    }
}
