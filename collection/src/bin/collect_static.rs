use std::error::Error;
use std::fs;
use std::path::Path;

use collection::api::ApiClient;
use collection::DATA_DIR;

/// Download the static reference data: bus lines, streets and bus stops
///
/// Writes bus_lines.json, dictionary.json and bus_stops.json into the data
/// directory, next to the per-run position directories.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let client = ApiClient::from_env(collection::api::STATIC_TIMEOUT)?;
    let data_dir = Path::new(DATA_DIR);
    fs::create_dir_all(data_dir)?;

    client.download_to_file("public_transport_routes", &data_dir.join("bus_lines.json"))?;
    client.download_to_file("public_transport_dictionary", &data_dir.join("dictionary.json"))?;
    client.download_bus_stops(&data_dir.join("bus_stops.json"))?;

    println!("Fetched bus lines, streets and bus stops.");

    Ok(())
}
