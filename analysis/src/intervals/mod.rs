use std::collections::{HashMap, HashSet};

use crate::geo::{haversine_km, time_difference_in_hours};
use crate::model::{AnalysisParams, Segment, Snapshot, VehiclePosition};

pub mod speeding;
pub mod statistics;

/// join two adjacent snapshots on vehicle id and compute one motion segment
/// per vehicle present in both
///
/// Records without a vehicle id are dropped up front. If a vehicle id repeats
/// within one snapshot, the first occurrence wins on both sides of the join.
pub fn build_segments(current: &Snapshot, next: &Snapshot, params: &AnalysisParams) -> Vec<Segment> {
    let mut next_by_vehicle: HashMap<&str, &VehiclePosition> = HashMap::new();
    for position in &next.positions {
        if let Some(id) = position.vehicle_id.as_deref() {
            next_by_vehicle.entry(id).or_insert(position);
        }
    }

    if next_by_vehicle.is_empty() {
        // nothing to compare against
        return Vec::new();
    }

    let mut matched: HashSet<&str> = HashSet::new();
    let mut segments = Vec::new();

    for start in &current.positions {
        let vehicle_id = match start.vehicle_id.as_deref() {
            Some(id) => id,
            None => continue,
        };
        if !matched.insert(vehicle_id) {
            continue;
        }
        let end = match next_by_vehicle.get(vehicle_id) {
            Some(&position) => position,
            None => continue,
        };
        // a record with an unreadable timestamp is as corrupted as one without coordinates
        let elapsed_hours = match time_difference_in_hours(&start.time, &end.time) {
            Some(hours) => hours,
            None => continue,
        };

        let distance_km = haversine_km(start.lat, start.lon, end.lat, end.lon);
        let speed_kmh = if elapsed_hours > 0.0 { distance_km / elapsed_hours } else { 0.0 };

        segments.push(Segment {
            vehicle_id: vehicle_id.to_string(),
            start: start.clone(),
            end: end.clone(),
            elapsed_hours,
            distance_km,
            speed_kmh,
            valid: speed_kmh >= params.min_speed && speed_kmh <= params.max_speed,
        });
    }

    segments
}

/// run the segment builder over every consecutive snapshot pair of the sequence
pub fn build_all_segments(snapshots: &[Snapshot], params: &AnalysisParams) -> Vec<Segment> {
    snapshots
        .windows(2)
        .flat_map(|pair| build_segments(&pair[0], &pair[1], params))
        .collect::<Vec<Segment>>()
}
