use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::io::{read_json, FormatErr};
use crate::model::{BusStop, StreetTable};

/// one key/value row of the stops endpoint
#[derive(Debug, Deserialize)]
struct StopRow {
    values: Vec<StopField>,
}

#[derive(Debug, Deserialize)]
struct StopField {
    key: String,
    value: Option<String>,
}

impl StopRow {
    fn field(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|field| field.key == key)
            .and_then(|field| field.value.as_deref())
    }
}

/// load the reference stops from `bus_stops.json`
///
/// Rows with a missing or unparseable coordinate are dropped here, so the
/// matcher downstream only ever sees geocoded stops.
pub fn load_bus_stops(static_dir: &Path) -> Result<Vec<BusStop>, Box<dyn Error>> {
    let payload = read_json(&static_dir.join("bus_stops.json"))?;
    let rows: Vec<StopRow> = serde_json::from_value(
        payload
            .get("result")
            .cloned()
            .ok_or(FormatErr("Expected stop rows under `result`!"))?,
    )?;

    let mut stops = Vec::with_capacity(rows.len());
    let mut dropped = 0;
    for row in &rows {
        match decode_stop(row) {
            Some(stop) => stops.push(stop),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("dropped {} stops without usable coordinates", dropped);
    }

    Ok(stops)
}

fn decode_stop(row: &StopRow) -> Option<BusStop> {
    Some(BusStop {
        complex: row.field("zespol")?.to_string(),
        post: row.field("slupek")?.to_string(),
        name: row.field("nazwa_zespolu")?.to_string(),
        street_id: row.field("id_ulicy")?.to_string(),
        lat: row.field("szer_geo")?.parse::<f64>().ok()?,
        lon: row.field("dlug_geo")?.parse::<f64>().ok()?,
    })
}

/// load the street id -> name dictionary from `dictionary.json`
pub fn load_streets(static_dir: &Path) -> Result<StreetTable, Box<dyn Error>> {
    let payload = read_json(&static_dir.join("dictionary.json"))?;
    let streets: HashMap<String, String> = serde_json::from_value(
        payload
            .get("result")
            .and_then(|result| result.get("ulice"))
            .cloned()
            .ok_or(FormatErr("Expected a street dictionary under `result.ulice`!"))?,
    )?;

    Ok(streets)
}
