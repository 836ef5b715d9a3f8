use std::collections::HashSet;

use crate::model::{AnalysisParams, Segment, SpeedingEvent};

/// every segment whose speed reached the comparison threshold
///
/// Evaluated on the unfiltered segment set: a speed above the plausibility
/// cap is excluded from the statistics but still flagged here. The event is
/// attributed to the end position of the motion.
pub fn extract_speeding_events(segments: &[Segment], params: &AnalysisParams) -> Vec<SpeedingEvent> {
    segments
        .iter()
        .filter(|segment| segment.speed_kmh >= params.comparison_speed)
        .map(|segment| SpeedingEvent {
            vehicle_id: segment.vehicle_id.clone(),
            time: segment.end.time.clone(),
            lat: segment.end.lat,
            lon: segment.end.lon,
            speed_kmh: segment.speed_kmh,
            street_name: None,
        })
        .collect::<Vec<SpeedingEvent>>()
}

/// count unique buses that reached the comparison speed at least once
pub fn number_of_speeding_buses(events: &[SpeedingEvent]) -> usize {
    events
        .iter()
        .map(|event| event.vehicle_id.as_str())
        .collect::<HashSet<&str>>()
        .len()
}
