// Shared Bootstrap layout for every page
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::auth::Flash;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";

/// Path of the wasm-bindgen output under the static directory
pub const WASM_MODULE_PATH: &str = "/static/pkg/egresados_validation_wasm.js";

/// Everything around the page body: brand, who is logged in, pending flashes
#[derive(Debug, Clone, Default)]
pub struct Chrome<'a> {
    pub brand: &'a str,
    pub user: Option<&'a str>,
    pub flashes: Vec<Flash>,
}

impl<'a> Chrome<'a> {
    pub fn new(brand: &'a str) -> Self {
        Self {
            brand,
            ..Default::default()
        }
    }

    pub fn user(mut self, username: &'a str) -> Self {
        self.user = Some(username);
        self
    }

    pub fn flashes(mut self, flashes: Vec<Flash>) -> Self {
        self.flashes = flashes;
        self
    }
}

/// Loads the wasm bundle and wires forms, dialog and search on the page
fn wasm_loader() -> Markup {
    html! {
        script type="module" {
            (PreEscaped(format!(
                "import init, {{ attachPage }} from '{}';\n\
                 init()\n\
                   .then(() => attachPage())\n\
                   .catch((e) => console.error('validation unavailable', e));",
                WASM_MODULE_PATH
            )))
        }
    }
}

/// Renders a full HTML page
pub fn page(title: &str, chrome: &Chrome<'_>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · " (chrome.brand) }
                link rel="stylesheet" href=(BOOTSTRAP_CSS);
            }
            body {
                nav class="navbar navbar-expand navbar-dark bg-dark mb-4" {
                    div class="container" {
                        a class="navbar-brand" href="/" { (chrome.brand) }
                        div class="navbar-nav ms-auto" {
                            @if let Some(user) = chrome.user {
                                a class="nav-link" href="/dashboard" { "Dashboard" }
                                a class="nav-link" href="/formularios" { "Forms" }
                                span class="navbar-text mx-2" { (user) }
                                a class="nav-link" href="/logout" { "Log out" }
                            } @else {
                                a class="nav-link" href="/login" { "Log in" }
                            }
                        }
                    }
                }
                main class="container" {
                    @for flash in &chrome.flashes {
                        div class={
                            "alert " (flash.level.css_class()) " alert-dismissible fade show"
                        }
                            role="alert" {
                            (flash.message)
                            button type="button" class="btn-close" data-bs-dismiss="alert"
                                aria-label="Close" {}
                        }
                    }
                    (body)
                }
                script src=(BOOTSTRAP_JS) {}
                (wasm_loader())
            }
        }
    }
}
