use std::env;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_mail::{Mail, MailError};
use crate::manager_spot_price::{SpotPrice, SpotPriceError};
use crate::models::{Area, ParseParameterError, View};

pub struct Mgr {
    pub spot_price: SpotPrice,
    pub mail: Option<Mail>,
}

/// Areas and view requested for one run
#[derive(Debug, PartialEq)]
pub struct RunParameters {
    pub areas: Vec<Area>,
    pub view: View,
}

/// Initializes and returns configuration, run parameters and a Mgr struct holding the initialized managers
///
pub fn init() -> Result<(Config, RunParameters, Mgr), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = arg_value(&args, "--config")
        .ok_or(InitializationError::MissingArgument("--config=<path>"))?;

    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting forecast24 version: {}", env!("CARGO_PKG_VERSION"));

    let params = run_parameters(&args, &config)?;

    // Instantiate structs
    let spot_price = SpotPrice::new(&config.api)?;
    let mail = config.mail.as_ref().map(Mail::new).transpose()?;

    let mgr = Mgr {
        spot_price,
        mail,
    };

    Ok((config, params, mgr))
}

/// Resolves area and view from the command line, falling back on configuration
///
/// # Arguments
///
/// * 'args' - command line arguments
/// * 'config' - configuration holding the defaults
fn run_parameters(args: &[String], config: &Config) -> Result<RunParameters, InitializationError> {
    let areas = match arg_value(args, "--area") {
        Some(a) if a.eq_ignore_ascii_case("all") => Area::ALL.to_vec(),
        Some(a) => vec![a.parse::<Area>()?],
        None => vec![config.dashboard.area],
    };
    let view = match arg_value(args, "--view") {
        Some(v) => v.parse::<View>()?,
        None => config.dashboard.view,
    };

    Ok(RunParameters { areas: areas_for_view(areas, view), view })
}

/// Returns the areas to load for a view, the forecast is the same for every area so only
/// the first requested area is kept
///
/// # Arguments
///
/// * 'areas' - requested areas
/// * 'view' - requested view
fn areas_for_view(mut areas: Vec<Area>, view: View) -> Vec<Area> {
    if view == View::Forecast {
        areas.truncate(1);
    }

    areas
}

/// Returns the value of a --name=value argument
///
/// # Arguments
///
/// * 'args' - command line arguments
/// * 'name' - argument name including the leading dashes
fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .filter_map(|a| a.split_once('='))
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

/// Error depicting errors that occur while initializing the dashboard
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("MissingArgument: {0}")]
    MissingArgument(&'static str),
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("ParameterError: {0}")]
    ParameterError(#[from] ParseParameterError),
    #[error("SpotPriceSetupError: {0}")]
    SpotPriceSetupError(#[from] SpotPriceError),
    #[error("MailSetupError: {0}")]
    MailSetupError(#[from] MailError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_arg_value() {
        let args = args(&["forecast24", "--config=/etc/forecast24.toml", "--area=NO2"]);

        assert_eq!(arg_value(&args, "--config"), Some("/etc/forecast24.toml"));
        assert_eq!(arg_value(&args, "--area"), Some("NO2"));
        assert_eq!(arg_value(&args, "--view"), None);
    }

    #[test]
    fn test_forecast_is_loaded_once() {
        assert_eq!(areas_for_view(Area::ALL.to_vec(), View::Forecast), vec![Area::NO1]);
        assert_eq!(areas_for_view(vec![Area::NO4], View::Forecast), vec![Area::NO4]);
        assert_eq!(areas_for_view(Area::ALL.to_vec(), View::Today), Area::ALL.to_vec());
        assert_eq!(areas_for_view(Area::ALL.to_vec(), View::History).len(), 5);
    }

    #[test]
    fn test_arg_value_keeps_equal_signs_in_value() {
        let args = args(&["forecast24", "--config=/tmp/a=b.toml"]);
        assert_eq!(arg_value(&args, "--config"), Some("/tmp/a=b.toml"));
    }
}
