use std::error::Error;
use std::fmt;

use kdtree::kdtree::{Kdtree, KdtreePointTrait};
use rayon::prelude::*;

use crate::geo::haversine_km;
use crate::model::{BusStop, SpeedingEvent, StreetTable};

/// street attribution was requested but no reference stops are available
#[derive(Debug)]
pub struct NoReferenceData;

impl fmt::Display for NoReferenceData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "No bus stop reference data available!")
    }
}

impl Error for NoReferenceData {}

/// a reference stop projected onto the unit sphere for indexed search
///
/// Chord distance in this space is strictly monotonic in great-circle
/// distance, so the euclidean nearest neighbour is exactly the haversine one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StopPoint {
    pub id: usize,
    pub coords: [f64; 3],
}

impl StopPoint {
    pub fn new(id: usize, lat: f64, lon: f64) -> Self {
        let (lat, lon) = (lat.to_radians(), lon.to_radians());
        Self {
            id,
            coords: [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()],
        }
    }

    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self::new(0, lat, lon)
    }
}

impl KdtreePointTrait for StopPoint {
    #[inline] // inlining is important for cross-crate usage of the tree
    fn dims(&self) -> &[f64] {
        &self.coords
    }
}

/// build the search index over the reference stops, once per run
pub fn build_stop_index(stops: &[BusStop]) -> Result<Kdtree<StopPoint>, NoReferenceData> {
    if stops.is_empty() {
        return Err(NoReferenceData);
    }

    let mut points = stops
        .iter()
        .enumerate()
        .map(|(id, stop)| StopPoint::new(id, stop.lat, stop.lon))
        .collect::<Vec<StopPoint>>();

    Ok(Kdtree::new(&mut points))
}

/// baseline linear scan; on an exact tie the first-encountered stop wins
pub fn nearest_stop_brute_force(lat: f64, lon: f64, stops: &[BusStop]) -> Result<usize, NoReferenceData> {
    let mut nearest = Err(NoReferenceData);
    let mut nearest_distance = f64::INFINITY;

    for (id, stop) in stops.iter().enumerate() {
        let distance = haversine_km(lat, lon, stop.lat, stop.lon);
        if distance < nearest_distance {
            nearest = Ok(id);
            nearest_distance = distance;
        }
    }

    nearest
}

/// assign every speeding event the street of its nearest reference stop
///
/// The per-event searches are independent and run in parallel against the
/// read-only index. A street id without a dictionary entry stays unresolved.
pub fn resolve_streets(
    events: &[SpeedingEvent],
    stops: &[BusStop],
    streets: &StreetTable,
) -> Result<Vec<SpeedingEvent>, NoReferenceData> {
    let index = build_stop_index(stops)?;

    let resolved = events
        .par_iter()
        .map(|event| {
            let nearest = index.nearest_search(&StopPoint::from_coords(event.lat, event.lon));
            let stop = &stops[nearest.id];

            SpeedingEvent {
                street_name: streets.get(&stop.street_id).cloned(),
                ..event.clone()
            }
        })
        .collect::<Vec<SpeedingEvent>>();

    Ok(resolved)
}
