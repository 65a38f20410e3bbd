use maud::{html, Markup, DOCTYPE};

/// Standalone error page, rendered without the app layout so it works
/// even when the configuration or database is what failed.
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="utf-8";
                title { "Erreur " (status) }
                link rel="stylesheet" href="/static/main.css";
            }
            body class="error-page" {
                h1 { "Erreur " (status) }
                p { (message) }
                p { a href="/" { "← Retour aux annonces" } }
            }
        }
    }
}

/// Inline error message, used inside htmx partials.
pub fn error_banner(message: &str) -> Markup {
    html! {
        div class="error-message" role="alert" { "❌ " (message) }
    }
}
