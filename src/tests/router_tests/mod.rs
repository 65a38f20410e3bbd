mod annonces_tests;
mod load_tests;
mod settings_tests;
