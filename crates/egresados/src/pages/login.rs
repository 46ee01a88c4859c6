use maud::{html, Markup};

use super::layout::{page, Chrome};

/// Login form; `error` is shown above it after a failed attempt
pub fn login(chrome: &Chrome<'_>, username: &str, error: Option<&str>) -> Markup {
    page(
        "Log in",
        chrome,
        html! {
            div class="row justify-content-center" {
                div class="col-md-4" {
                    h2 class="mb-3" { "Log in" }
                    @if let Some(error) = error {
                        div class="alert alert-danger" role="alert" { (error) }
                    }
                    form method="post" action="/login" {
                        div class="mb-3" {
                            label class="form-label" for="username" { "Username" }
                            input class="form-control" type="text" id="username" name="username"
                                value=(username) autocomplete="username" required autofocus;
                        }
                        div class="mb-3" {
                            label class="form-label" for="password" { "Password" }
                            input class="form-control" type="password" id="password" name="password"
                                autocomplete="current-password" required;
                        }
                        button class="btn btn-primary w-100" type="submit" { "Log in" }
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_keeps_username_and_shows_error() {
        let html = login(&Chrome::new("X"), "admin", Some("Invalid credentials")).into_string();
        assert!(html.contains(r#"value="admin""#));
        assert!(html.contains("Invalid credentials"));
    }
}
