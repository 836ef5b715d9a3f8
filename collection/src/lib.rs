pub mod api;

/// base url of the city open data api
pub const API_URL: &str = "https://api.um.warszawa.pl/api/action/";

/// directory holding the static reference files and the per-run data directories
pub const DATA_DIR: &str = "data";
