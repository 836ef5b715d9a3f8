use std::collections::BTreeSet;

use serde_json::{json, Value};

use crate::model::{Snapshot, SpeedingEvent};

/// speeding places as a point feature collection for map rendering
pub fn speeding_places_geojson(events: &[SpeedingEvent]) -> Value {
    let features = events
        .iter()
        .map(|event| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [event.lon, event.lat],
                },
                "properties": {
                    "vehicle": event.vehicle_id,
                    "time": event.time,
                    "speed_kmh": event.speed_kmh,
                    "street": event.street_name,
                },
            })
        })
        .collect::<Vec<Value>>();

    json!({ "type": "FeatureCollection", "features": features })
}

/// all collected points and timestamps for one vehicle, in sequence order
pub fn vehicle_points(snapshots: &[Snapshot], vehicle_id: &str) -> (Vec<(f64, f64)>, Vec<String>) {
    let mut points = Vec::new();
    let mut timestamps = Vec::new();

    for snapshot in snapshots {
        for position in &snapshot.positions {
            if position.vehicle_id.as_deref() == Some(vehicle_id) {
                points.push((position.lat, position.lon));
                timestamps.push(position.time.clone());
            }
        }
    }

    (points, timestamps)
}

/// the line(s) a vehicle operated on across all collected snapshots
pub fn lines_for_vehicle(snapshots: &[Snapshot], vehicle_id: &str) -> BTreeSet<String> {
    let mut lines = BTreeSet::new();

    for snapshot in snapshots {
        for position in &snapshot.positions {
            if position.vehicle_id.as_deref() == Some(vehicle_id) && !position.lines.is_empty() {
                lines.insert(position.lines.clone());
            }
        }
    }

    lines
}

/// first vehicle observed operating the given line
pub fn find_vehicle_for_line(snapshots: &[Snapshot], line: &str) -> Option<String> {
    for snapshot in snapshots {
        for position in &snapshot.positions {
            if position.lines == line {
                if let Some(id) = position.vehicle_id.as_deref() {
                    return Some(id.to_string());
                }
            }
        }
    }

    None
}

/// one vehicle's collected path: a line string plus its timestamped points
pub fn vehicle_path_geojson(snapshots: &[Snapshot], vehicle_id: &str) -> Option<Value> {
    let (points, timestamps) = vehicle_points(snapshots, vehicle_id);
    if points.is_empty() {
        return None;
    }

    let lines = lines_for_vehicle(snapshots, vehicle_id).into_iter().collect::<Vec<String>>();
    // geojson wants lon/lat order
    let path = points.iter().map(|&(lat, lon)| json!([lon, lat])).collect::<Vec<Value>>();

    let mut features = vec![json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": path },
        "properties": { "vehicle": vehicle_id, "lines": lines },
    })];

    for (&(lat, lon), time) in points.iter().zip(timestamps.iter()) {
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [lon, lat] },
            "properties": { "time": time },
        }));
    }

    Some(json!({ "type": "FeatureCollection", "features": features }))
}
