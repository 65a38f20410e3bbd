use crate::domain::format::{format_area, format_currency, format_price_per_area};
use crate::domain::{FilterCriteria, ListingStats, NormalizedListing};
use crate::state::StatusMessage;
use crate::templates::components::{card, empty_row, loader, rooms_dropdown, status_banner};
use crate::templates::{desktop_layout, LayoutVm};
use maud::{html, Markup};

const TABLE_COLUMNS: u32 = 7;

pub struct AnnonceRow {
    /// Position in the loaded collection, used for the detail link.
    pub index: usize,
    pub listing: NormalizedListing,
}

pub struct AnnoncesVm {
    pub criteria: FilterCriteria,
    pub rows: Vec<AnnonceRow>,
    /// Size of the whole collection, `None` until something was loaded.
    pub total: Option<usize>,
    /// Generation of the rendered collection, part of every detail link.
    pub generation: u64,
    pub source: Option<String>,
    pub loaded_at: Option<String>,
    pub stats: ListingStats,
    pub status: Option<StatusMessage>,
    pub is_loading: bool,
}

pub fn annonces_page(layout: &LayoutVm, vm: &AnnoncesVm) -> Markup {
    desktop_layout(
        "Annonces",
        layout,
        html! {
            main class="container" {
                section class="card toolbar" {
                    button
                        type="button"
                        hx-post="/connection-test"
                        hx-target="#test-result"
                        hx-swap="innerHTML"
                        hx-disabled-elt="this"
                    { "🔍 Tester la connexion" }

                    form method="post" action="/load"
                        hx-post="/load"
                        hx-target="#annonces-section"
                        hx-swap="outerHTML"
                        hx-include=".filters"
                        hx-indicator="#loader"
                        hx-disabled-elt="find button"
                    {
                        button type="submit" class="primary" { "📥 Charger les annonces" }
                    }

                    form method="post" action="/load/file" class="inline-form"
                        hx-post="/load/file"
                        hx-target="#annonces-section"
                        hx-swap="outerHTML"
                        hx-include=".filters"
                        hx-indicator="#loader"
                        hx-disabled-elt="find button"
                    {
                        label class="sr-only" for="filename" { "Fichier" }
                        input type="text" id="filename" name="filename" placeholder="annonces.json" required;
                        button type="submit" { "📂 Charger un fichier" }
                    }

                    div id="test-result" class="result" {}
                }

                (loader("loader", vm.is_loading))
                (filters_form(&vm.criteria))
                (annonces_section(vm))
            }
        },
    )
}

pub fn filters_form(criteria: &FilterCriteria) -> Markup {
    html! {
        form class="card filters" method="get" action="/"
            hx-get="/annonces/table"
            hx-target="#annonces-section"
            hx-swap="outerHTML"
            hx-trigger="input changed delay:300ms, change"
        {
            input
                type="search"
                id="search"
                name="q"
                placeholder="🔍 Rechercher (id, ville, adresse, description)"
                value=(criteria.search_term);

            (rooms_dropdown(criteria))

            input
                type="number"
                id="surface-min"
                name="surface_min"
                min="0"
                placeholder="Surface min (m²)"
                value=[criteria.surface_min];
            input
                type="number"
                id="surface-max"
                name="surface_max"
                min="0"
                placeholder="Surface max (m²)"
                value=[criteria.surface_max];

            a href="/" class="button" id="reset-filters" { "🔄 Réinitialiser" }
        }
    }
}

/// The part of the page swapped by filtering and loading.
pub fn annonces_section(vm: &AnnoncesVm) -> Markup {
    html! {
        section id="annonces-section" {
            (status_banner(vm.status.as_ref()))

            @match vm.total {
                None => {
                    p class="hint" { "Aucune donnée chargée. Cliquez sur « Charger les annonces »." }
                }
                Some(total) => {
                    div class="section-header" {
                        h2 {
                            "Annonces "
                            span id="annonces-count" class="count" { (vm.rows.len()) }
                            @if vm.rows.len() != total {
                                " / " (total)
                            }
                        }
                        @if let (Some(source), Some(loaded_at)) = (&vm.source, &vm.loaded_at) {
                            p class="muted" { "Source : " code { (source) } " · chargé le " (loaded_at) }
                        }
                        a class="button"
                            href=(export_href(&vm.criteria))
                        { "⬇️ Exporter (.xlsx)" }
                    }

                    (stats_card(&vm.stats))
                    (annonces_table(vm.generation, &vm.rows))
                }
            }
        }
    }
}

pub fn export_href(criteria: &FilterCriteria) -> String {
    let query = criteria.to_query();
    if query.is_empty() {
        "/annonces/export.xlsx".to_string()
    } else {
        format!("/annonces/export.xlsx?{query}")
    }
}

fn annonces_table(generation: u64, rows: &[AnnonceRow]) -> Markup {
    html! {
        div class="table-wrapper" {
            table class="annonces" {
                thead {
                    tr {
                        th { "ID" }
                        th { "Localisation" }
                        th class="center" { "Pièces" }
                        th class="right" { "Surface" }
                        th class="right" { "Prix" }
                        th class="right" { "Prix/m²" }
                        th class="center" { "Lien" }
                    }
                }
                tbody id="annonces-table-body" {
                    @if rows.is_empty() {
                        (empty_row(TABLE_COLUMNS, "Aucune annonce à afficher"))
                    }
                    @for row in rows {
                        (annonce_row(generation, row))
                    }
                }
            }
        }
    }
}

fn annonce_row(generation: u64, row: &AnnonceRow) -> Markup {
    let l = &row.listing;
    let href = detail_href(generation, row.index);
    html! {
        tr class="clickable"
            hx-get=(href)
            hx-target="#modal-slot"
            hx-swap="innerHTML"
        {
            td class="id" { a href=(href) { (l.id) } }
            td { (l.location) }
            td class="center" { (l.rooms_label) }
            td class="right" { (format_area(l.surface_m2)) }
            td class="right strong" { (format_currency(l.price)) }
            td class="right ppa" { (format_price_per_area(l.price_per_area())) }
            td class="center" {
                @if let Some(url) = safe_link(l.url.as_deref()) {
                    a class="btn-url" href=(url) target="_blank" rel="noopener noreferrer" onclick="event.stopPropagation()" {
                        "🔗 Voir l'annonce"
                    }
                } @else {
                    span class="muted" { "Pas de lien" }
                }
            }
        }
    }
}

fn stats_card(stats: &ListingStats) -> Markup {
    if stats.priced_count == 0 {
        return html! {};
    }
    card(
        "Statistiques",
        html! {
            ul class="stats" {
                li { "Prix moyen : " strong { (format_currency(stats.average_price.unwrap_or(0.0))) } }
                li { "Prix min : " (format_currency(stats.min_price.unwrap_or(0.0))) }
                li { "Prix max : " (format_currency(stats.max_price.unwrap_or(0.0))) }
                li { "Prix moyen au m² : " strong { (format_price_per_area(stats.average_price_per_area)) } }
            }
            @if !stats.by_rooms.is_empty() {
                table class="stats-rooms" {
                    thead {
                        tr {
                            th { "Pièces" }
                            th class="right" { "Annonces" }
                            th class="right" { "Prix moyen" }
                            th class="right" { "Surface moy." }
                            th class="right" { "Prix/m² moy." }
                            th class="right" { "Prix min" }
                            th class="right" { "Prix max" }
                        }
                    }
                    tbody {
                        @for r in &stats.by_rooms {
                            tr {
                                td { (r.rooms) }
                                td class="right" { (r.count) }
                                td class="right" { (format_currency(r.average_price)) }
                                td class="right" { (format!("{:.1} m²", r.average_surface)) }
                                td class="right" { (format_price_per_area(Some(r.price_per_area))) }
                                td class="right" { (format_currency(r.min_price)) }
                                td class="right" { (format_currency(r.max_price)) }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail_href(generation: u64, index: usize) -> String {
    format!("/annonces/{generation}/{index}")
}

/// Only http(s) links are rendered as anchors.
pub fn safe_link(url: Option<&str>) -> Option<&str> {
    url.map(str::trim)
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
}
