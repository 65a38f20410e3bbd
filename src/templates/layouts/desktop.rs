use maud::{html, Markup, DOCTYPE};

/// Header context shared by every full page.
pub struct LayoutVm<'a> {
    pub environment: &'a str,
    pub api_url: &'a str,
}

pub fn desktop_layout(title: &str, layout: &LayoutVm, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Annonces" }
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx.js" defer {}
            }
            body {
              header class="topbar" {
                  h3 { "🏠 Annonces immobilières" }
                  nav {
                      ul {
                          li { a href="/" { "Annonces" } }
                          li { a href="/files" { "Fichiers" } }
                          li { a href="/settings" { "Paramètres" } }
                      }
                  }
                  div class="env" {
                      span class=(format!("badge env-{}", layout.environment)) { (layout.environment) }
                      code title="API" { (layout.api_url) }
                  }
              }
                (content)
                div id="modal-slot" {}
            }
        }
    }
}
