use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::warn;
use serde_json::Value;

use crate::API_URL;

pub const POSITIONS_TIMEOUT: Duration = Duration::from_secs(5);
pub const STATIC_TIMEOUT: Duration = Duration::from_secs(30);

const POSITIONS_RESOURCE: &str = "busestrams_get?type=1&resource_id=f2e5503e927d-4ad3-9500-4ab9e55deb59";
const STOPS_RESOURCE: &str = "dbtimetable_get?id=ab75c33d-3a26-4342-b36a-6e5fef0a3ac3";

/// keyed client for the city open data endpoints
pub struct ApiClient {
    key: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(key: String, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { key, client })
    }

    /// read the api key from the `API_KEY` environment variable
    pub fn from_env(timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let key = env::var("API_KEY")?;
        Self::new(key, timeout)
    }

    /// fetch all buses active right now, dropping records older than `start_time`
    ///
    /// Returns None on transport errors and on the api's in-band connection
    /// errors (a string under `result`), so the caller can retry the tick.
    pub fn fetch_bus_positions(&self, start_time: &str) -> Option<Value> {
        let url = format!("{}{}&apikey={}", API_URL, POSITIONS_RESOURCE, self.key);

        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(err) => {
                warn!("request failed: {}", err);
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("downloading error: {}", response.status());
            return None;
        }

        let mut payload: Value = match response.json() {
            Ok(payload) => payload,
            Err(err) => {
                warn!("undecodable payload: {}", err);
                return None;
            }
        };

        match payload.get_mut("result") {
            // ignore the api's in-band connection errors
            Some(Value::String(message)) => {
                warn!("downloading error: {}", message);
                None
            }
            Some(Value::Array(records)) => {
                records.retain(|record| {
                    record
                        .get("Time")
                        .and_then(Value::as_str)
                        .map(|time| time >= start_time)
                        .unwrap_or(false)
                });
                Some(payload)
            }
            _ => {
                warn!("unexpected payload shape");
                None
            }
        }
    }

    /// save one endpoint's raw payload under `file_name`
    pub fn download_to_file(&self, resource: &str, file_name: &Path) -> Result<(), Box<dyn Error>> {
        let separator = if resource.contains('?') { '&' } else { '?' };
        let url = format!("{}{}{}apikey={}", API_URL, resource, separator, self.key);
        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            warn!("no data downloaded: {}", response.status());
            return Ok(());
        }

        fs::write(file_name, response.text()?)?;
        println!("Saved to file '{}'.", file_name.display());

        Ok(())
    }

    /// save the bus stops payload
    pub fn download_bus_stops(&self, file_name: &Path) -> Result<(), Box<dyn Error>> {
        self.download_to_file(STOPS_RESOURCE, file_name)
    }
}
