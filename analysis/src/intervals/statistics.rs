use std::fmt;

use serde::Serialize;

use crate::model::Segment;

/// speeds of the valid subset of segments, the population used for all
/// aggregate statistics
pub fn valid_speeds(segments: &[Segment]) -> Vec<f64> {
    segments
        .iter()
        .filter(|segment| segment.valid)
        .map(|segment| segment.speed_kmh)
        .collect::<Vec<f64>>()
}

/// total number of uncorrupted moments across the whole run
pub fn all_moments(segments: &[Segment]) -> usize {
    segments.iter().filter(|segment| segment.valid).count()
}

/// summary statistics over the valid speed distribution
#[derive(Clone, Debug, Serialize)]
pub struct SpeedStatistics {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub quartile_lower: f64,
    pub median: f64,
    pub quartile_upper: f64,
    pub max: f64,
}

impl SpeedStatistics {
    /// None for an empty population, so that downstream reporting never
    /// divides by zero
    pub fn new(speeds: &[f64]) -> Option<Self> {
        if speeds.is_empty() {
            return None;
        }

        let mut sorted = speeds.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let squared_deviation = sorted.iter().map(|speed| (speed - mean) * (speed - mean)).sum::<f64>();
            (squared_deviation / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            quartile_lower: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            quartile_upper: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

impl fmt::Display for SpeedStatistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "count  {}", self.count)?;
        writeln!(f, "mean   {:.2}", self.mean)?;
        writeln!(f, "std    {:.2}", self.std)?;
        writeln!(f, "min    {:.2}", self.min)?;
        writeln!(f, "25%    {:.2}", self.quartile_lower)?;
        writeln!(f, "50%    {:.2}", self.median)?;
        writeln!(f, "75%    {:.2}", self.quartile_upper)?;
        write!(f, "max    {:.2}", self.max)
    }
}

/// linear interpolation between the two surrounding order statistics
fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty(), "Quantiles of an empty population are undefined!");

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (position - lower as f64) * (sorted[upper] - sorted[lower])
    }
}
