use crate::domain::format::rooms_selection_label;
use crate::domain::{FilterCriteria, ROOM_LABELS};
use crate::state::{StatusKind, StatusMessage};
use maud::{html, Markup};

pub mod error;

pub use error::{error_banner, error_page};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn status_banner(status: Option<&StatusMessage>) -> Markup {
    html! {
        @if let Some(status) = status {
            @match status.kind {
                StatusKind::Success => {
                    div class="result success" { "✅ " (status.text) }
                }
                StatusKind::Error => {
                    (error_banner(&status.text))
                }
            }
        }
    }
}

/// Busy indicator shown by htmx while a request is in flight.
pub fn loader(id: &str, visible: bool) -> Markup {
    html! {
        div id=(id) class=(if visible { "loader htmx-indicator visible" } else { "loader htmx-indicator" }) {
            span class="spinner" aria-hidden="true" {}
            " Chargement en cours…"
        }
    }
}

pub fn empty_row(colspan: u32, text: &str) -> Markup {
    html! {
        tr class="empty" {
            td colspan=(colspan) { "📭 " (text) }
        }
    }
}

/// Room count multi-select, rendered as a checkbox dropdown.
pub fn rooms_dropdown(criteria: &FilterCriteria) -> Markup {
    let count = criteria.rooms.len();
    html! {
        details class="dropdown" {
            summary class="dropdown-toggle" {
                "🏠 " (rooms_selection_label(criteria))
                @if count > 1 {
                    " " span class="selection-badge" { (count) }
                }
            }
            div class="dropdown-menu" {
                @for label in ROOM_LABELS {
                    label class="dropdown-item" {
                        input type="checkbox" name="pieces" value=(label) checked[criteria.has_room(label)];
                        @if label == "5+" {
                            " 5 pièces et plus"
                        } @else if label == "1" {
                            " 1 pièce"
                        } @else {
                            " " (label) " pièces"
                        }
                    }
                }
            }
        }
    }
}
