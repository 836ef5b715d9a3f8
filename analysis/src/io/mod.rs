use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

pub mod io_snapshots;
pub mod io_stops;

/// a json payload that does not have the expected endpoint shape
#[derive(Debug)]
pub struct FormatErr(pub &'static str);

impl fmt::Display for FormatErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for FormatErr {}

/// decode a whole json file into a generic value
pub fn read_json(path: &Path) -> Result<Value, Box<dyn Error>> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;

    Ok(value)
}
