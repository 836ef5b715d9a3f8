use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use chrono::{Local, NaiveTime, Timelike};
use log::warn;

use analysis::geo::TIME_FORMAT;
use analysis::util::cli_args::{parse_arg_optional, CliErr};
use collection::api::ApiClient;
use collection::DATA_DIR;

const TICK_SECONDS: u64 = 60;
const MAX_ATTEMPTS: u32 = 3; // per tick

/// Collect live bus positions, one file per minute
///
/// Parameters: <minutes> (default 60, at least 2 to catch any position change),
/// <start_time> (HH:MM within the next 24 hours, default right now)
///
/// Ticks are written to directory <data>/<collection start>/ with sortable
/// file names, which is the layout the analysis expects.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let minutes: u32 = parse_arg_optional(&mut args, 60);
    let start_at: String = parse_arg_optional(&mut args, String::new());

    if minutes < 2 {
        println!("Number of minutes must be at least 2");
        return Err(Box::new(CliErr("Invalid argument!")));
    }

    let client = ApiClient::from_env(collection::api::POSITIONS_TIMEOUT)?;

    if !start_at.is_empty() {
        wait_for_start(&start_at)?;
    }

    let start_time = Local::now().naive_local();
    let data_dir = Path::new(DATA_DIR).join(start_time.format("%Y-%m-%d_%H-%M-%S").to_string());
    fs::create_dir_all(&data_dir)?;
    println!("Starting download in {}; ends in {} minutes.", data_dir.display(), minutes);

    let start_time_str = start_time.format(TIME_FORMAT).to_string();

    for tick in 0..minutes {
        let now = Local::now().naive_local();
        let file_name = data_dir.join(format!("{}.txt", now.format("%H-%M-%S")));

        let mut written = false;
        for _ in 0..MAX_ATTEMPTS {
            match client.fetch_bus_positions(&start_time_str) {
                Some(payload) => {
                    fs::write(&file_name, serde_json::to_string_pretty(&payload)?)?;
                    println!("File created: {}", now.format("%H:%M:%S"));
                    written = true;
                    break;
                }
                None => sleep(Duration::from_secs(1)), // retry in a second
            }
        }
        if !written {
            warn!("request failed: {}", now.format("%H:%M:%S"));
        }

        if tick != minutes - 1 {
            sleep(Duration::from_secs(TICK_SECONDS));
        }
    }

    println!("Downloading ended.");

    Ok(())
}

/// sleep until the given HH:MM comes around, at most a day from now
fn wait_for_start(start_at: &str) -> Result<(), Box<dyn Error>> {
    let target = NaiveTime::parse_from_str(start_at, "%H:%M").map_err(|_| CliErr("Invalid start time!"))?;

    let now = Local::now().naive_local();
    let mut start = now.date().and_hms_opt(target.hour(), target.minute(), 0).unwrap();
    if start < now {
        // force next 24h
        start = start + chrono::Duration::days(1);
    }

    println!("Waiting for start time {}...", start);
    while Local::now().naive_local() < start {
        sleep(Duration::from_secs(TICK_SECONDS));
    }

    Ok(())
}
