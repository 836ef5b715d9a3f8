use std::error::Error;
use std::path::Path;

use glob::glob;
use log::{debug, warn};

use crate::io::{read_json, FormatErr};
use crate::model::{Snapshot, VehiclePosition};

/// load every collection tick from a data directory, in file name order
///
/// Ticks were written one file per minute with sortable names, so the file
/// name order is the collection order; the snapshots are not re-sorted by
/// their own timestamps. Files that fail to decode are skipped.
pub fn load_snapshots(data_dir: &Path) -> Result<Vec<Snapshot>, Box<dyn Error>> {
    let pattern = data_dir.join("*");
    let mut paths = glob(pattern.to_str().ok_or(FormatErr("Non-unicode data directory!"))?)?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    paths.sort();

    let mut snapshots = Vec::new();
    for path in paths {
        match load_snapshot(&path) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(err) => warn!("skipping {}: {}", path.display(), err),
        }
    }

    Ok(snapshots)
}

/// decode one tick file of the shape `{"result": [...]}`
///
/// Individual records that do not decode (missing coordinates or timestamp)
/// are dropped; a `result` that is not an array at all fails the whole file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, Box<dyn Error>> {
    let payload = read_json(path)?;
    let records = payload
        .get("result")
        .and_then(|result| result.as_array())
        .ok_or(FormatErr("Expected an array under `result`!"))?;

    let mut positions = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for record in records {
        match serde_json::from_value::<VehiclePosition>(record.clone()) {
            Ok(position) => positions.push(position),
            Err(_) => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("dropped {} corrupted records from {}", dropped, path.display());
    }

    let tick = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("").to_string();

    Ok(Snapshot { tick, positions })
}
