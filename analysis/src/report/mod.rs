use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::geo::parse_time;
use crate::intervals::statistics::SpeedStatistics;
use crate::model::{AnalysisParams, Snapshot, SpeedingEvent};

pub mod geojson;

/// streets ranked by how often a speeding event was attributed to them
#[derive(Clone, Debug, Serialize)]
pub struct StreetFrequencyReport {
    pub entries: Vec<(String, usize)>,
    /// events whose street id had no dictionary entry
    pub unresolved: usize,
}

/// count events per resolved street name, descending, ties in first-seen
/// order, truncated to the configured number of entries
pub fn street_frequency(events: &[SpeedingEvent], top_street_number: usize) -> StreetFrequencyReport {
    let mut entries: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut unresolved = 0;

    for event in events {
        match event.street_name.as_deref() {
            Some(name) => match positions.get(name) {
                Some(&position) => entries[position].1 += 1,
                None => {
                    positions.insert(name, entries.len());
                    entries.push((name.to_string(), 1));
                }
            },
            None => unresolved += 1,
        }
    }

    // stable sort keeps first-seen order between equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(top_street_number);

    StreetFrequencyReport { entries, unresolved }
}

/// frequencies of the valid speeds in 2 km/h bins, with the subset at or
/// above the comparison speed counted separately for overlay rendering
#[derive(Clone, Debug, Serialize)]
pub struct SpeedHistogram {
    pub bin_width: f64,
    pub lower: f64,
    pub counts: Vec<u32>,
    pub speeding_counts: Vec<u32>,
}

pub fn speed_histogram(speeds: &[f64], comparison_speed: f64) -> SpeedHistogram {
    const BIN_WIDTH: f64 = 2.0;
    const LOWER: f64 = 2.0;
    const CAP: f64 = 100.0;

    let max_speed = speeds.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let upper = if max_speed.is_finite() { (max_speed.floor() + 5.0).min(CAP) } else { LOWER };
    let num_bins = ((upper - LOWER).max(0.0) / BIN_WIDTH) as usize;

    let mut counts = vec![0u32; num_bins];
    let mut speeding_counts = vec![0u32; num_bins];

    for &speed in speeds {
        if speed < LOWER || speed >= upper {
            continue;
        }
        let bin = ((speed - LOWER) / BIN_WIDTH) as usize;
        counts[bin] += 1;
        if speed >= comparison_speed {
            speeding_counts[bin] += 1;
        }
    }

    SpeedHistogram {
        bin_width: BIN_WIDTH,
        lower: LOWER,
        counts,
        speeding_counts,
    }
}

/// metadata of one analysis run
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub min_buses: usize,
    pub max_buses: usize,
    pub all_moments: usize,
}

impl RunSummary {
    /// the span runs from the earliest timestamp of the first snapshot to the
    /// latest of the last; fleet-size bounds ignore empty snapshots
    pub fn new(snapshots: &[Snapshot], all_moments: usize) -> Self {
        let start_time = snapshots
            .first()
            .and_then(|snapshot| snapshot.positions.iter().map(|position| position.time.as_str()).min())
            .map(str::to_string);
        let end_time = snapshots
            .last()
            .and_then(|snapshot| snapshot.positions.iter().map(|position| position.time.as_str()).max())
            .map(str::to_string);

        let sizes = snapshots
            .iter()
            .map(|snapshot| snapshot.positions.len())
            .filter(|&size| size > 0)
            .collect::<Vec<usize>>();

        Self {
            start_time,
            end_time,
            min_buses: sizes.iter().min().copied().unwrap_or(0),
            max_buses: sizes.iter().max().copied().unwrap_or(0),
            all_moments,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let info = format!("({}-{} buses were active).", self.min_buses, self.max_buses);

        let parsed = self
            .start_time
            .as_deref()
            .and_then(parse_time)
            .zip(self.end_time.as_deref().and_then(parse_time));

        match parsed {
            Some((start, end)) => {
                let day1 = start.format("%A").to_string();
                let day2 = end.format("%A").to_string();
                if day1 == day2 {
                    write!(f, "Data for {}, from {} to {} {}", day1, start.format("%H:%M"), end.format("%H:%M"), info)
                } else {
                    write!(
                        f,
                        "Data from {} {} to {} {} {}",
                        start.format("%H:%M"),
                        day1,
                        end.format("%H:%M"),
                        day2,
                        info
                    )
                }
            }
            None => write!(f, "Data span unknown {}", info),
        }
    }
}

/// write the top streets summary in the report text format
pub fn write_speeding_places(
    report: &StreetFrequencyReport,
    params: &AnalysisParams,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    if report.entries.is_empty() {
        fs::write(path, "No speeding data available.\n")?;
        return Ok(());
    }

    let mut lines = vec![format!(
        "Top {} bus stops near which a bus was going faster than {} km/h:",
        params.top_street_number, params.comparison_speed
    )];
    for (street_name, count) in &report.entries {
        lines.push(format!("{}: {} times", street_name, count));
    }

    fs::write(path, lines.join("\n"))?;
    Ok(())
}

/// write the run summary, speeding share and speed statistics
pub fn write_summary(
    summary: &RunSummary,
    statistics: Option<&SpeedStatistics>,
    speeding_moments: usize,
    speeding_buses: usize,
    params: &AnalysisParams,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut text = format!(
        "{}\n{} of all buses reached speeds of {} km/h.\n",
        summary, speeding_buses, params.comparison_speed
    );

    // guard the share against an entirely corrupted run
    let share = if summary.all_moments > 0 {
        100.0 * speeding_moments as f64 / summary.all_moments as f64
    } else {
        0.0
    };
    text.push_str(&format!(
        "Speeding moments: {} ({:.2}% of {} valid moments).\n",
        speeding_moments, share, summary.all_moments
    ));

    match statistics {
        Some(statistics) => text.push_str(&format!("\n{}\n", statistics)),
        None => text.push_str("\nNo valid speed measurements.\n"),
    }

    fs::write(path, text)?;
    Ok(())
}
