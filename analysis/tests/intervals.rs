use analysis::intervals::speeding::{extract_speeding_events, number_of_speeding_buses};
use analysis::intervals::statistics::{all_moments, valid_speeds, SpeedStatistics};
use analysis::intervals::{build_all_segments, build_segments};
use analysis::model::{AnalysisParams, Snapshot, VehiclePosition};

fn position(vehicle_id: &str, lat: f64, lon: f64, time: &str) -> VehiclePosition {
    VehiclePosition::new(vehicle_id, lat, lon, time)
}

fn corrupted(lat: f64, lon: f64, time: &str) -> VehiclePosition {
    let mut position = VehiclePosition::new("", lat, lon, time);
    position.vehicle_id = None;
    position
}

#[test]
fn moving_vehicle_produces_one_valid_segment() {
    let first = Snapshot::new("08-00-00", vec![position("100", 52.2300, 21.0100, "2024-01-01 08:00:00")]);
    let second = Snapshot::new("08-01-00", vec![position("100", 52.2310, 21.0120, "2024-01-01 08:01:00")]);

    let segments = build_segments(&first, &second, &AnalysisParams::default());
    assert_eq!(segments.len(), 1);

    let segment = &segments[0];
    assert_eq!(segment.vehicle_id, "100");
    assert!((segment.elapsed_hours - 1.0 / 60.0).abs() < 1e-9);
    assert!(segment.distance_km > 0.17 && segment.distance_km < 0.18);
    assert!((segment.speed_kmh - segment.distance_km / segment.elapsed_hours).abs() < 1e-9);
    assert!(segment.speed_kmh > 10.0 && segment.speed_kmh < 11.0);
    assert!(segment.valid);
}

#[test]
fn zero_elapsed_time_yields_zero_speed() {
    let first = Snapshot::new("08-00-00", vec![position("100", 52.2300, 21.0100, "2024-01-01 08:00:00")]);
    let second = Snapshot::new("08-01-00", vec![position("100", 52.2310, 21.0120, "2024-01-01 08:00:00")]);

    let segments = build_segments(&first, &second, &AnalysisParams::default());
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].speed_kmh, 0.0);
    // below MIN_SPEED, so excluded from the statistics population
    assert!(!segments[0].valid);
}

#[test]
fn vehicle_absent_from_next_snapshot_produces_no_segment() {
    let first = Snapshot::new(
        "08-00-00",
        vec![
            position("100", 52.2300, 21.0100, "2024-01-01 08:00:00"),
            position("200", 52.2500, 21.0300, "2024-01-01 08:00:00"),
        ],
    );
    let second = Snapshot::new("08-01-00", vec![position("100", 52.2310, 21.0120, "2024-01-01 08:01:00")]);

    let segments = build_segments(&first, &second, &AnalysisParams::default());
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].vehicle_id, "100");
}

#[test]
fn corrupted_records_are_dropped_before_joining() {
    let first = Snapshot::new(
        "08-00-00",
        vec![
            corrupted(52.2300, 21.0100, "2024-01-01 08:00:00"),
            position("100", 52.2300, 21.0100, "2024-01-01 08:00:00"),
        ],
    );
    let second = Snapshot::new(
        "08-01-00",
        vec![
            corrupted(52.2310, 21.0120, "2024-01-01 08:01:00"),
            position("100", 52.2310, 21.0120, "2024-01-01 08:01:00"),
        ],
    );

    let segments = build_segments(&first, &second, &AnalysisParams::default());
    assert_eq!(segments.len(), 1);
}

#[test]
fn snapshot_of_only_corrupted_records_joins_nothing() {
    let first = Snapshot::new("08-00-00", vec![position("100", 52.2300, 21.0100, "2024-01-01 08:00:00")]);
    let second = Snapshot::new("08-01-00", vec![corrupted(52.2310, 21.0120, "2024-01-01 08:01:00")]);

    assert!(build_segments(&first, &second, &AnalysisParams::default()).is_empty());
    assert!(build_segments(&second, &first, &AnalysisParams::default()).is_empty());
}

#[test]
fn duplicated_vehicle_id_first_occurrence_wins() {
    let first = Snapshot::new(
        "08-00-00",
        vec![
            position("100", 52.2300, 21.0100, "2024-01-01 08:00:00"),
            position("100", 52.9999, 21.9999, "2024-01-01 08:00:00"),
        ],
    );
    let second = Snapshot::new(
        "08-01-00",
        vec![
            position("100", 52.2310, 21.0120, "2024-01-01 08:01:00"),
            position("100", 52.0001, 21.0001, "2024-01-01 08:01:00"),
        ],
    );

    let segments = build_segments(&first, &second, &AnalysisParams::default());
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start.lat, 52.2300);
    assert_eq!(segments[0].end.lat, 52.2310);
}

#[test]
fn clock_skew_falls_out_through_the_validity_bounds() {
    let first = Snapshot::new("08-01-00", vec![position("100", 52.2300, 21.0100, "2024-01-01 08:01:00")]);
    let second = Snapshot::new("08-02-00", vec![position("100", 52.2310, 21.0120, "2024-01-01 08:00:00")]);

    let segments = build_segments(&first, &second, &AnalysisParams::default());
    assert_eq!(segments.len(), 1);
    assert!(segments[0].elapsed_hours < 0.0);
    assert!(segments[0].speed_kmh < 0.0);
    assert!(!segments[0].valid);
}

#[test]
fn valid_segments_stay_within_the_configured_bounds() {
    let params = AnalysisParams::default();
    let mut positions_first = Vec::new();
    let mut positions_second = Vec::new();

    // spread of speeds: standing still, city pace, and a teleportation artifact
    for (i, offset) in [0.0, 0.001, 0.5].iter().enumerate() {
        let id = format!("{}", i);
        positions_first.push(position(&id, 52.2300, 21.0100, "2024-01-01 08:00:00"));
        positions_second.push(position(&id, 52.2300 + offset, 21.0100, "2024-01-01 08:01:00"));
    }

    let snapshots = vec![Snapshot::new("a", positions_first), Snapshot::new("b", positions_second)];
    let segments = build_all_segments(&snapshots, &params);
    assert_eq!(segments.len(), 3);

    for segment in segments.iter().filter(|segment| segment.valid) {
        assert!(segment.speed_kmh >= params.min_speed && segment.speed_kmh <= params.max_speed);
    }
    assert_eq!(all_moments(&segments), 1);
    assert_eq!(valid_speeds(&segments).len(), 1);
}

#[test]
fn speeding_check_ignores_the_validity_cap() {
    // ~0.5 degrees latitude per minute is far beyond MAX_SPEED
    let first = Snapshot::new("08-00-00", vec![position("100", 52.0, 21.0, "2024-01-01 08:00:00")]);
    let second = Snapshot::new("08-01-00", vec![position("100", 52.5, 21.0, "2024-01-01 08:01:00")]);

    let params = AnalysisParams::default();
    let segments = build_segments(&first, &second, &params);
    assert_eq!(segments.len(), 1);
    assert!(!segments[0].valid);
    assert!(segments[0].speed_kmh > params.max_speed);

    // excluded from the statistics population but still flagged as speeding
    assert_eq!(all_moments(&segments), 0);
    let events = extract_speeding_events(&segments, &params);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].lat, segments[0].end.lat);
    assert_eq!(events[0].time, "2024-01-01 08:01:00");
}

#[test]
fn distinct_speeding_buses_never_exceed_event_count() {
    let mut snapshots = Vec::new();
    for (tick, time) in ["2024-01-01 08:00:00", "2024-01-01 08:01:00", "2024-01-01 08:02:00"].iter().enumerate() {
        // both vehicles move ~1.2 km per minute, roughly 72 km/h
        let lat = 52.2 + 0.011 * tick as f64;
        snapshots.push(Snapshot::new(
            &format!("{}", tick),
            vec![position("100", lat, 21.0, time), position("200", lat, 21.1, time)],
        ));
    }

    let params = AnalysisParams::default();
    let segments = build_all_segments(&snapshots, &params);
    let events = extract_speeding_events(&segments, &params);

    assert_eq!(events.len(), 4);
    assert_eq!(number_of_speeding_buses(&events), 2);
    assert!(number_of_speeding_buses(&events) <= events.len());
}

#[test]
fn statistics_describe_the_valid_population() {
    let speeds = [10.0, 20.0, 30.0, 40.0];
    let statistics = SpeedStatistics::new(&speeds).unwrap();

    assert_eq!(statistics.count, 4);
    assert_eq!(statistics.mean, 25.0);
    assert_eq!(statistics.min, 10.0);
    assert_eq!(statistics.max, 40.0);
    assert_eq!(statistics.median, 25.0);
    assert_eq!(statistics.quartile_lower, 17.5);
    assert_eq!(statistics.quartile_upper, 32.5);
    // sample standard deviation
    assert!((statistics.std - 12.909944487358056).abs() < 1e-9);
}

#[test]
fn empty_snapshot_sequence_produces_nothing() {
    let params = AnalysisParams::default();
    let segments = build_all_segments(&[], &params);

    assert!(segments.is_empty());
    assert_eq!(all_moments(&segments), 0);
    assert!(SpeedStatistics::new(&valid_speeds(&segments)).is_none());
    assert!(extract_speeding_events(&segments, &params).is_empty());
}
