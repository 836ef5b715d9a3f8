use chrono::NaiveDateTime;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// timestamp layout used by the live-positions endpoint, naive local time
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// great-circle distance in kilometres between two lat/lon points
/// (https://en.wikipedia.org/wiki/Haversine_formula)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = (lat1.to_radians(), lon1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lon2.to_radians());

    let delta_lat = lat2 - lat1;
    let delta_lon = lon2 - lon1;

    let a = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn parse_time(time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(time, TIME_FORMAT).ok()
}

/// fraction of an hour passed from the first to the second string timestamp,
/// negative if the second one lies in the past
pub fn time_difference_in_hours(time1: &str, time2: &str) -> Option<f64> {
    let dt1 = parse_time(time1)?;
    let dt2 = parse_time(time2)?;

    Some((dt2 - dt1).num_seconds() as f64 / 3600.0)
}
