use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use analysis::intervals::speeding::{extract_speeding_events, number_of_speeding_buses};
use analysis::intervals::statistics::{all_moments, valid_speeds, SpeedStatistics};
use analysis::intervals::build_all_segments;
use analysis::io::io_snapshots::load_snapshots;
use analysis::io::io_stops::{load_bus_stops, load_streets};
use analysis::model::AnalysisParams;
use analysis::report::geojson::{find_vehicle_for_line, speeding_places_geojson, vehicle_path_geojson};
use analysis::report::{speed_histogram, street_frequency, write_speeding_places, write_summary, RunSummary};
use analysis::spatial::resolve_streets;
use analysis::util::cli_args::{parse_arg_optional, parse_arg_required, CliErr};
use analysis::util::measure;

/// Run the speed analysis on a previously collected data directory
///
/// First parameter: <path_to_data_directory> (one json file per collection tick;
/// `bus_stops.json` and `dictionary.json` are expected next to the directory)
/// Additional parameters: <comparison_speed> (km/h, default 50),
/// <top_street_number> (default 20), <lines> (comma-separated bus lines whose
/// paths get exported as geojson)
///
/// Results will be written to directory output/<data_dir_name>-<speed>-report/
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let (data_path, params, lines) = parse_required_args()?;
    let data_dir = Path::new(&data_path);
    if !data_dir.is_dir() {
        println!("Provided path does not exist or is not a directory: {}", data_dir.display());
        return Err(Box::new(CliErr("Invalid data directory!")));
    }
    let static_dir = data_dir.parent().unwrap_or(Path::new("."));

    let (snapshots, time) = measure(|| load_snapshots(data_dir));
    let snapshots = snapshots?;
    println!("Loaded {} snapshots in {} ms", snapshots.len(), time.as_secs_f64() * 1000.0);

    let stops = load_bus_stops(static_dir)?;
    let streets = load_streets(static_dir)?;
    println!("Loaded {} stops and {} streets", stops.len(), streets.len());

    let (segments, time) = measure(|| build_all_segments(&snapshots, &params));
    println!("Built {} segments in {} ms", segments.len(), time.as_secs_f64() * 1000.0);

    let speeds = valid_speeds(&segments);
    let statistics = SpeedStatistics::new(&speeds);
    let summary = RunSummary::new(&snapshots, all_moments(&segments));
    let events = extract_speeding_events(&segments, &params);

    let output_dir = output_directory(data_dir, &params)?;

    write_summary(
        &summary,
        statistics.as_ref(),
        events.len(),
        number_of_speeding_buses(&events),
        &params,
        &output_dir.join("summary.txt"),
    )?;

    let histogram = speed_histogram(&speeds, params.comparison_speed);
    let distribution = serde_json::json!({ "histogram": histogram, "statistics": statistics });
    fs::write(output_dir.join("speed-distribution.json"), serde_json::to_string_pretty(&distribution)?)?;
    println!("Speeds calculated.");

    let (resolved, time) = measure(|| resolve_streets(&events, &stops, &streets));
    let resolved = resolved?;
    println!("Matched {} speeding events in {} ms", resolved.len(), time.as_secs_f64() * 1000.0);

    let report = street_frequency(&resolved, params.top_street_number);
    write_speeding_places(&report, &params, &output_dir.join("speeding-places.txt"))?;
    fs::write(
        output_dir.join("map-speeding-places.geojson"),
        serde_json::to_string_pretty(&speeding_places_geojson(&resolved))?,
    )?;
    println!("Speeding places reported.");

    for line in &lines {
        match find_vehicle_for_line(&snapshots, line).and_then(|vehicle| vehicle_path_geojson(&snapshots, &vehicle)) {
            Some(path) => {
                fs::write(output_dir.join(format!("map-bus-line-{}.geojson", line)), serde_json::to_string_pretty(&path)?)?;
            }
            None => println!("No bus found for line {}. Skipping.", line),
        }
    }

    println!("Report finished successfully. Can be found in {}", output_dir.display());

    Ok(())
}

fn parse_required_args() -> Result<(String, AnalysisParams, Vec<String>), Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let data_path: String = parse_arg_required(&mut args, "data directory")?;
    let comparison_speed: f64 = parse_arg_optional(&mut args, analysis::model::COMPARISON_SPEED);
    let top_street_number: usize = parse_arg_optional(&mut args, analysis::model::TOP_STREET_NUMBER);
    let lines: String = parse_arg_optional(&mut args, String::new());

    if comparison_speed <= 0.0 {
        println!("Comparison speed must be a positive number");
        return Err(Box::new(CliErr("Invalid argument!")));
    }
    if top_street_number == 0 {
        println!("Number of top streets must be positive");
        return Err(Box::new(CliErr("Invalid argument!")));
    }

    let params = AnalysisParams {
        comparison_speed,
        top_street_number,
        ..AnalysisParams::default()
    };
    let lines = lines
        .split(',')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect::<Vec<String>>();

    Ok((data_path, params, lines))
}

fn output_directory(data_dir: &Path, params: &AnalysisParams) -> Result<PathBuf, Box<dyn Error>> {
    let data_name = data_dir.file_name().and_then(|name| name.to_str()).unwrap_or("data");
    let output_dir = Path::new("output").join(format!("{}-{}-report", data_name, params.comparison_speed as i64));

    if !output_dir.exists() {
        fs::create_dir_all(&output_dir)?;
    }

    Ok(output_dir)
}
