pub mod annonces;
pub mod detail;
pub mod files;
pub mod settings;

pub use annonces::{annonces_page, annonces_section, AnnonceRow, AnnoncesVm};
pub use detail::{detail_modal, detail_page, DetailVm};
pub use files::{files_page, FilesVm};
pub use settings::{settings_page, SettingsVm};
