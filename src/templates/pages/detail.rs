use crate::domain::format::{
    format_area, format_currency, format_difference, format_price_per_area,
};
use crate::domain::metrics::{LoanEstimate, LoanTerms};
use crate::domain::NormalizedListing;
use crate::templates::pages::annonces::safe_link;
use crate::templates::{desktop_layout, LayoutVm};
use maud::{html, Markup};

pub struct DetailVm {
    pub listing: NormalizedListing,
    pub raw_json: String,
    /// Loan estimate, when the listing has a price.
    pub loan: Option<LoanEstimate>,
    pub terms: LoanTerms,
}

/// Modal overlay swapped into `#modal-slot` by htmx.
pub fn detail_modal(vm: &DetailVm) -> Markup {
    html! {
        div class="modal" id="annonce-modal" onclick="if (event.target === this) this.remove()" {
            div class="modal-content" {
                button type="button" class="close-modal" aria-label="Fermer" onclick="this.closest('.modal').remove()" { "×" }
                (detail_body(vm))
            }
        }
    }
}

pub fn detail_page(layout: &LayoutVm, vm: &DetailVm) -> Markup {
    desktop_layout(
        &format!("Annonce #{}", vm.listing.id),
        layout,
        html! {
            main class="container" {
                p { a href="/" { "← Retour aux annonces" } }
                section class="card" { (detail_body(vm)) }
            }
        },
    )
}

fn detail_body(vm: &DetailVm) -> Markup {
    let l = &vm.listing;
    html! {
        div class="detail-header" {
            span class=(if l.is_sale() { "badge badge-vente" } else { "badge badge-location" }) {
                (l.kind)
            }
            h2 { "Annonce #" (l.id) }
        }

        @if let Some(url) = safe_link(l.url.as_deref()) {
            div class="detail-link" {
                a href=(url) target="_blank" rel="noopener noreferrer" class="btn-url-modal" {
                    "🔗 Voir l'annonce complète"
                }
            }
        }

        div class="detail-grid" {
            (detail_item("📍 Localisation", html! { (l.location) }))
            (detail_item("🏠 Nombre de pièces", html! { (l.rooms_label) }))
            (detail_item("📏 Surface", html! { (format_area(l.surface_m2)) }))
            (detail_item("💰 Prix", html! { strong class="price" { (format_currency(l.price)) } }))
            (detail_item("📊 Prix au m²", html! { strong class="ppa" { (format_price_per_area(l.price_per_area())) } }))
            @if let Some(loan) = vm.loan {
                (detail_item(
                    "🏦 Mensualité estimée",
                    html! {
                        (format!("{:.2} €/mois", loan.monthly_payment))
                        br;
                        small class="muted" { (vm.terms.annual_rate_pct) " % sur " (vm.terms.years) " ans" }
                    },
                ))
                (detail_item(
                    "🔑 Loyer mensuel",
                    html! {
                        @match loan.monthly_rent {
                            Some(rent) => { (format_currency(rent)) }
                            None => { "N/A" }
                        }
                        @if !l.is_rental() && loan.monthly_rent.is_some() {
                            br;
                            small class="muted" { "moyenne des locations " (l.rooms_label) " pièces" }
                        }
                    },
                ))
                (detail_item(
                    "⚖️ Différence (loyer - mensualité)",
                    html! {
                        strong class=(difference_class(loan.rent_difference)) {
                            (format_difference(loan.rent_difference))
                        }
                    },
                ))
            }
        }

        div class="detail-description" {
            h3 { "📝 Description" }
            p { (l.description) }
        }

        div class="detail-raw" {
            details {
                summary { "🔧 Données brutes (JSON)" }
                pre { (vm.raw_json) }
            }
        }
    }
}

fn difference_class(difference: Option<f64>) -> &'static str {
    match difference {
        Some(d) if d >= 0.0 => "ok",
        Some(_) => "ko",
        None => "muted",
    }
}

fn detail_item(label: &str, value: Markup) -> Markup {
    html! {
        div class="detail-item" {
            span class="detail-label" { (label) }
            span class="detail-value" { (value) }
        }
    }
}
