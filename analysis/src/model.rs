use serde::Deserialize;
use std::collections::HashMap;

pub const MIN_SPEED: f64 = 1.0; // kmph
pub const MAX_SPEED: f64 = 100.0; // kmph
pub const COMPARISON_SPEED: f64 = 50.0; // base speed to compare buses, kmph
pub const TOP_STREET_NUMBER: usize = 20; // how many streets to print in summary

/// speed thresholds and report size of a single analysis run
#[derive(Copy, Clone, Debug)]
pub struct AnalysisParams {
    pub min_speed: f64,
    pub max_speed: f64,
    pub comparison_speed: f64,
    pub top_street_number: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            comparison_speed: COMPARISON_SPEED,
            top_street_number: TOP_STREET_NUMBER,
        }
    }
}

/// a single position record as delivered by the live-positions endpoint
///
/// `vehicle_id` stays optional: corrupted records arrive without one and are
/// dropped before any snapshots are joined.
#[derive(Clone, Debug, Deserialize)]
pub struct VehiclePosition {
    #[serde(rename = "VehicleNumber", default)]
    pub vehicle_id: Option<String>,
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Lon")]
    pub lon: f64,
    #[serde(rename = "Lines", default)]
    pub lines: String,
    #[serde(rename = "Brigade", default)]
    pub brigade: Option<String>,
    #[serde(rename = "Time")]
    pub time: String,
}

impl VehiclePosition {
    pub fn new(vehicle_id: &str, lat: f64, lon: f64, time: &str) -> Self {
        Self {
            vehicle_id: Some(vehicle_id.to_string()),
            lat,
            lon,
            lines: String::new(),
            brigade: None,
            time: time.to_string(),
        }
    }
}

/// all vehicle positions captured at one collection tick
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub tick: String,
    pub positions: Vec<VehiclePosition>,
}

impl Snapshot {
    pub fn new(tick: &str, positions: Vec<VehiclePosition>) -> Self {
        Self {
            tick: tick.to_string(),
            positions,
        }
    }
}

/// the inferred motion of one vehicle between two adjacent snapshots
#[derive(Clone, Debug)]
pub struct Segment {
    pub vehicle_id: String,
    pub start: VehiclePosition,
    pub end: VehiclePosition,
    pub elapsed_hours: f64,
    pub distance_km: f64,
    pub speed_kmh: f64,
    pub valid: bool,
}

/// a static geocoded stop, tagged with the street it belongs to
#[derive(Clone, Debug)]
pub struct BusStop {
    pub complex: String,
    pub post: String,
    pub name: String,
    pub street_id: String,
    pub lat: f64,
    pub lon: f64,
}

/// street id -> street name, loaded once from the static dictionary
pub type StreetTable = HashMap<String, String>;

/// a segment whose speed reached the comparison threshold, attributed to its end position
#[derive(Clone, Debug)]
pub struct SpeedingEvent {
    pub vehicle_id: String,
    pub time: String,
    pub lat: f64,
    pub lon: f64,
    pub speed_kmh: f64,
    pub street_name: Option<String>,
}
