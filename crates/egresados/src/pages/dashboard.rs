// Records table with server-side search, live filtering and the delete dialog
use egresados_validation_core::ids::{
    DELETE_MODAL_ID, MODAL_CARRERA_ID, MODAL_CONFIRM_ID, MODAL_ESTATUS_ID, MODAL_FORM_ID,
    MODAL_GENERACION_ID, MODAL_MATRICULA_ID, MODAL_NOMBRE_ID, SEARCH_INPUT_ID, TABLE_ID,
};
use egresados_validation_core::StatusLabel;
use maud::{html, Markup};

use super::layout::{page, Chrome};
use crate::database::Egresado;

pub fn dashboard(chrome: &Chrome<'_>, records: &[Egresado], query: &str, total: i64) -> Markup {
    let modal_target = format!("#{}", DELETE_MODAL_ID);

    page(
        "Dashboard",
        chrome,
        html! {
            div class="d-flex justify-content-between align-items-center mb-3" {
                h2 { "Graduates " span class="badge bg-secondary" { (total) } }
                div class="btn-group" {
                    a class="btn btn-primary" href="/egresados/nuevo" { "New record" }
                    a class="btn btn-outline-secondary" href="/exportar" { "Export CSV" }
                }
            }

            form class="mb-3" method="get" action="/dashboard" role="search" {
                div class="input-group" {
                    input class="form-control" type="search" id=(SEARCH_INPUT_ID) name="q"
                        value=(query)
                        placeholder="Search by matrícula, name or program" autocomplete="off";
                    button class="btn btn-outline-primary" type="submit" { "Search" }
                }
            }

            @if records.is_empty() {
                p class="text-muted" {
                    @if query.trim().is_empty() {
                        "No records yet."
                    } @else {
                        "No records match the search."
                    }
                }
            }

            table class="table table-striped align-middle" id=(TABLE_ID) {
                thead {
                    tr {
                        th { "Matrícula" }
                        th { "Name" }
                        th { "Program" }
                        th { "Generation" }
                        th { "Status" }
                        th class="text-end" { "Actions" }
                    }
                }
                tbody {
                    @for record in records {
                        (row(record, &modal_target))
                    }
                }
            }

            (delete_modal())
        },
    )
}

fn row(record: &Egresado, modal_target: &str) -> Markup {
    let status = StatusLabel::parse(&record.estatus);

    html! {
        tr {
            td { (record.matricula) }
            td { (record.nombre_completo) }
            td { (record.carrera) }
            td { (record.generacion) }
            td { span class={ "badge " (status.badge_class()) } { (status.as_str()) } }
            td class="text-end" {
                a class="btn btn-sm btn-outline-primary me-1"
                    href={ "/editar/" (record.matricula) } {
                    "Edit"
                }
                button type="button" class="btn btn-sm btn-outline-danger"
                    data-bs-toggle="modal" data-bs-target=(modal_target)
                    data-matricula=(record.matricula)
                    data-nombre=(record.nombre_completo)
                    data-carrera=(record.carrera)
                    data-generacion=(record.generacion)
                    data-estatus=(record.estatus) { "Delete" }
            }
        }
    }
}

/// One shared dialog; the browser fills it from the clicked row
fn delete_modal() -> Markup {
    html! {
        div class="modal fade" id=(DELETE_MODAL_ID) tabindex="-1"
            aria-labelledby="deleteModalLabel" aria-hidden="true" {
            div class="modal-dialog" {
                div class="modal-content" {
                    div class="modal-header" {
                        h5 class="modal-title" id="deleteModalLabel" { "Delete record" }
                        button type="button" class="btn-close" data-bs-dismiss="modal"
                            aria-label="Close" {}
                    }
                    div class="modal-body" {
                        p { "This permanently deletes the following record:" }
                        dl class="row mb-0" {
                            dt class="col-sm-4" { "Matrícula" }
                            dd class="col-sm-8" id=(MODAL_MATRICULA_ID) {}
                            dt class="col-sm-4" { "Name" }
                            dd class="col-sm-8" id=(MODAL_NOMBRE_ID) {}
                            dt class="col-sm-4" { "Program" }
                            dd class="col-sm-8" id=(MODAL_CARRERA_ID) {}
                            dt class="col-sm-4" { "Generation" }
                            dd class="col-sm-8" id=(MODAL_GENERACION_ID) {}
                            dt class="col-sm-4" { "Status" }
                            dd class="col-sm-8" { span class="badge" id=(MODAL_ESTATUS_ID) {} }
                        }
                    }
                    div class="modal-footer" {
                        button type="button" class="btn btn-secondary" data-bs-dismiss="modal" {
                            "Cancel"
                        }
                        form id=(MODAL_FORM_ID) method="post" {
                            // enabled by the dialog once a row is chosen
                            button type="submit" class="btn btn-danger" id=(MODAL_CONFIRM_ID)
                                disabled {
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}
