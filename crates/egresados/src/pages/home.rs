use maud::{html, Markup};

use super::layout::{page, Chrome};

pub fn home(chrome: &Chrome<'_>, institution: Option<&str>) -> Markup {
    page(
        "Home",
        chrome,
        html! {
            div class="p-5 mb-4 bg-light rounded-3" {
                h1 class="display-5" { (chrome.brand) }
                @if let Some(institution) = institution {
                    p class="lead" { (institution) }
                }
                p { "Graduate records: registration, search, export and backups." }
                @if chrome.user.is_some() {
                    a class="btn btn-primary" href="/dashboard" { "Go to dashboard" }
                } @else {
                    a class="btn btn-primary" href="/login" { "Log in" }
                }
            }
        },
    )
}
