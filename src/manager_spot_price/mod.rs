mod models;

use std::time::Duration;
use chrono::{NaiveDate, TimeDelta};
use log::{info, warn};
use reqwest::blocking::Client;
use thiserror::Error;
use crate::config::ApiParameters;
use crate::models::{Area, PriceRecord, View};
use crate::manager_spot_price::models::Payload;
use crate::retry;

/// Struct for fetching spot prices and price forecasts from the pricing API
pub struct SpotPrice {
    client: Client,
    base_url: String,
    history_days: u32,
    history_limit: u32,
}

impl SpotPrice {
    /// Returns a SpotPrice struct ready for fetching prices
    ///
    /// # Arguments
    ///
    /// * 'config' - api configuration parameters
    pub fn new(config: &ApiParameters) -> Result<SpotPrice, SpotPriceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(SpotPrice {
            client,
            base_url: config.base_url.clone(),
            history_days: config.history_days,
            history_limit: config.history_limit,
        })
    }

    /// Retrieves the records backing the given view
    ///
    /// # Arguments
    ///
    /// * 'area' - price area to retrieve records for (not used by the forecast view)
    /// * 'view' - the view to retrieve records for
    /// * 'today' - the last date of the history window
    pub fn get_records(&self, area: Area, view: View, today: NaiveDate) -> Result<Vec<PriceRecord>, SpotPriceError> {
        match view {
            View::Today => retry!(|| self.get_spot_prices(area)),
            View::History => {
                let (start, end) = history_window(today, self.history_days);
                retry!(|| self.get_spot_prices_history(area, start, end))
            },
            View::Forecast => retry!(|| self.get_forecast()),
        }
    }

    /// Retrieves today's hourly spot prices for an area
    ///
    /// # Arguments
    ///
    /// * 'area' - price area
    pub fn get_spot_prices(&self, area: Area) -> Result<Vec<PriceRecord>, SpotPriceError> {
        let area = area.to_string();
        self.get_json("/api/spotprices", &[("area", area.as_str())])
    }

    /// Retrieves historical spot prices for an area
    ///
    /// # Arguments
    ///
    /// * 'area' - price area
    /// * 'start' - first date to retrieve prices for
    /// * 'end' - last date to retrieve prices for (inclusive)
    pub fn get_spot_prices_history(&self, area: Area, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceRecord>, SpotPriceError> {
        let area = area.to_string();
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let limit = self.history_limit.to_string();

        self.get_json("/api/spotprices/history", &[
            ("area", area.as_str()),
            ("start", start.as_str()),
            ("end", end.as_str()),
            ("limit", limit.as_str()),
        ])
    }

    /// Retrieves the hourly price forecast
    ///
    pub fn get_forecast(&self) -> Result<Vec<PriceRecord>, SpotPriceError> {
        self.get_json("/api/forecast", &[])
    }

    /// Makes a GET request and unwraps the record array from the response
    ///
    /// # Arguments
    ///
    /// * 'path' - path of the endpoint
    /// * 'query' - query parameters
    fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<PriceRecord>, SpotPriceError> {
        let url = format!("{}{}", self.base_url, path);
        info!("fetching {} {:?}", url, query);

        let response = self.client
            .get(&url)
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpotPriceError::Status(format!("{} returned {}", url, status)));
        }

        let json = response.text()?;
        let payload: Payload = serde_json::from_str(&json)?;

        match payload.into_records() {
            Some(records) => Ok(records),
            None => {
                warn!("no record array in response from {}", url);
                Ok(Vec::new())
            }
        }
    }
}

/// Returns the first and last date (both inclusive) of a history window ending today
///
/// # Arguments
///
/// * 'today' - last date of the window
/// * 'days' - number of days in the window
fn history_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let start = today - TimeDelta::days(days.saturating_sub(1) as i64);

    (start, today)
}

#[derive(Error, Debug)]
pub enum SpotPriceError {
    #[error("DocumentError: {0}")]
    Document(#[from] serde_json::Error),
    #[error("NetworkError: {0}")]
    Network(#[from] reqwest::Error),
    #[error("StatusError: {0}")]
    Status(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_window_spans_thirty_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, end) = history_window(today, 30);

        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(end, today);
        assert_eq!((end - start).num_days() + 1, 30);
    }

    #[test]
    fn test_history_window_single_day() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(history_window(today, 1), (today, today));
    }
}
