use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use serde::de::Error as _;
use serde_json::Value;
use thiserror::Error;

/// Raw price record as delivered by the pricing API.
///
/// Hourly records carry `time_start`, historical records carry `date`. All fields are kept
/// loosely typed so that a single malformed record doesn't fail the whole payload, it is
/// rather dropped later by the summarizer.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct PriceRecord {
    #[serde(default)]
    pub time_start: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(rename = "NOK_per_kWh", default)]
    pub nok_per_kwh: Option<Value>,
}

impl PriceRecord {
    /// Returns the price if it is present and finite, numeric strings are accepted
    pub fn price(&self) -> Option<f64> {
        let price = match self.nok_per_kwh.as_ref()? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        price.is_finite().then_some(price)
    }

    pub fn time_start(&self) -> Option<&str> {
        self.time_start.as_ref()?.as_str()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_ref()?.as_str()
    }
}

/// Norwegian electricity price areas
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Area {
    NO1,
    NO2,
    NO3,
    NO4,
    NO5,
}

impl Area {
    pub const ALL: [Area; 5] = [Area::NO1, Area::NO2, Area::NO3, Area::NO4, Area::NO5];
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for Area {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Area::NO1 => write!(f, "NO1"),
            Area::NO2 => write!(f, "NO2"),
            Area::NO3 => write!(f, "NO3"),
            Area::NO4 => write!(f, "NO4"),
            Area::NO5 => write!(f, "NO5"),
        }
    }
}

impl FromStr for Area {
    type Err = ParseParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NO1" => Ok(Area::NO1),
            "NO2" => Ok(Area::NO2),
            "NO3" => Ok(Area::NO3),
            "NO4" => Ok(Area::NO4),
            "NO5" => Ok(Area::NO5),
            _ => Err(ParseParameterError::Area(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Area {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Aggregation applied by the summarizer
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Hourly,
    DailyAverage,
}

/// What the dashboard shows, each view maps to one API endpoint
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Today,
    History,
    Forecast,
}

impl View {
    /// Returns the summarizer mode used for records of this view
    pub fn mode(&self) -> Mode {
        match self {
            View::Today | View::Forecast => Mode::Hourly,
            View::History => Mode::DailyAverage,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            View::Today => write!(f, "today"),
            View::History => write!(f, "history"),
            View::Forecast => write!(f, "forecast"),
        }
    }
}

impl FromStr for View {
    type Err = ParseParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(View::Today),
            "history" => Ok(View::History),
            "forecast" => Ok(View::Forecast),
            _ => Err(ParseParameterError::View(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// One chart ready point, label is either HH:MM or YYYY-MM-DD depending on mode
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct SeriesPoint {
    pub label: String,
    pub price: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Kpi {
    pub cheapest: SeriesPoint,
    pub priciest: SeriesPoint,
    pub average: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Summary {
    pub series: Vec<SeriesPoint>,
    pub kpi: Option<Kpi>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseParameterError {
    #[error("unknown price area: {0:?}")]
    Area(String),
    #[error("unknown view: {0:?}")]
    View(String),
}
