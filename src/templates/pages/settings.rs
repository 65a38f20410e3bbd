use crate::state::StatusMessage;
use crate::templates::components::{card, status_banner};
use crate::templates::{desktop_layout, LayoutVm};
use maud::{html, Markup};

pub struct SettingsVm {
    pub api_url: String,
    pub default_api_url: String,
    pub has_override: bool,
    pub bucket_name: String,
    pub aws_region: String,
    pub environment: String,
    pub health_path: String,
    pub zero_is_present: bool,
    pub message: Option<StatusMessage>,
}

pub fn settings_page(layout: &LayoutVm, vm: &SettingsVm) -> Markup {
    desktop_layout(
        "Paramètres",
        layout,
        html! {
            main class="container" {
                h1 { "Paramètres" }
                (status_banner(vm.message.as_ref()))

                (card("URL de l'API", html! {
                    form method="post" action="/settings" class="settings-form" {
                        label for="api_url" { "URL de base" }
                        input
                            type="url"
                            id="api_url"
                            name="api_url"
                            placeholder=(vm.default_api_url)
                            value=[vm.has_override.then_some(vm.api_url.as_str())];
                        button type="submit" class="primary" { "💾 Enregistrer" }
                    }
                    p class="muted" {
                        @if vm.has_override {
                            "Valeur personnalisée. Laisser vide pour revenir à "
                            code { (vm.default_api_url) }
                            "."
                        } @else {
                            "Valeur par défaut issue de la configuration."
                        }
                    }
                }))

                (card("Configuration", html! {
                    dl class="config" {
                        dt { "Environnement" }
                        dd { (vm.environment) }
                        dt { "API effective" }
                        dd { code { (vm.api_url) } }
                        dt { "Chemin de test" }
                        dd { code { (vm.health_path) } }
                        dt { "Bucket" }
                        dd { code { (vm.bucket_name) } }
                        dt { "Région" }
                        dd { (vm.aws_region) }
                        dt { "Valeurs nulles" }
                        dd {
                            @if vm.zero_is_present {
                                "0 est affiché comme une valeur"
                            } @else {
                                "0 est traité comme absent (N/A)"
                            }
                        }
                    }
                }))
            }
        },
    )
}
