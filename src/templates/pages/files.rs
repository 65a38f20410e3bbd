use crate::client::RemoteFile;
use crate::db::loads::LoadRun;
use crate::domain::format::format_byte_size;
use crate::templates::components::{card, error_banner};
use crate::templates::{desktop_layout, LayoutVm};
use chrono::DateTime;
use maud::{html, Markup};

pub struct FilesVm {
    pub bucket_name: String,
    pub aws_region: String,
    /// Remote listing, or the error message shown in its place.
    pub files: Result<Vec<RemoteFile>, String>,
    pub recent_loads: Vec<LoadRun>,
}

pub fn files_page(layout: &LayoutVm, vm: &FilesVm) -> Markup {
    desktop_layout(
        "Fichiers",
        layout,
        html! {
            main class="container" {
                h1 { "Fichiers disponibles" }
                p class="muted" { "Bucket " code { (vm.bucket_name) } " (" (vm.aws_region) ")" }

                @match &vm.files {
                    Err(message) => { (error_banner(message)) }
                    Ok(files) => {
                        @if files.is_empty() {
                            p class="hint" { "📭 Aucun fichier disponible" }
                        } @else {
                            (files_table(files))
                        }
                    }
                }

                (card("Derniers chargements", loads_table(&vm.recent_loads)))
            }
        },
    )
}

fn files_table(files: &[RemoteFile]) -> Markup {
    html! {
        table class="files" {
            thead {
                tr {
                    th { "Nom" }
                    th class="right" { "Taille" }
                    th { "Modifié le" }
                    th {}
                }
            }
            tbody {
                @for file in files {
                    tr {
                        td { code { (file.name) } }
                        td class="right" { (display_size(file)) }
                        td {
                            @match file.last_modified {
                                Some(ts) => { (ts.format("%d/%m/%Y %H:%M").to_string()) }
                                None => { "—" }
                            }
                        }
                        td {
                            form method="post" action="/load/file" {
                                input type="hidden" name="filename" value=(file.name);
                                button type="submit" { "📂 Charger" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn display_size(file: &RemoteFile) -> String {
    match (file.size_bytes, file.size_mb) {
        (Some(bytes), _) => format_byte_size(bytes),
        (None, Some(mb)) => format!("{mb} MB"),
        (None, None) => "—".to_string(),
    }
}

fn loads_table(runs: &[LoadRun]) -> Markup {
    html! {
        @if runs.is_empty() {
            p class="muted" { "Aucun chargement enregistré." }
        } @else {
            table class="loads" {
                thead {
                    tr {
                        th { "Début" }
                        th { "Source" }
                        th class="right" { "Annonces" }
                        th { "Résultat" }
                    }
                }
                tbody {
                    @for run in runs {
                        tr {
                            td { (format_timestamp(run.started_at)) }
                            td { code { (run.source) } }
                            td class="right" { (run.listings_count.unwrap_or(0)) }
                            td {
                                @if run.success {
                                    span class="ok" { "✅ OK" }
                                } @else if run.finished_at.is_none() {
                                    span class="muted" { "⏳ en cours" }
                                } @else {
                                    span class="ko" { "❌ " (run.error_message.as_deref().unwrap_or("échec")) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}
