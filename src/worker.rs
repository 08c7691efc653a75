use std::fs;
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta};
use glob::glob;
use log::{error, info, warn};
use rayon::prelude::*;
use thiserror::Error;
use crate::config::{Config, Files};
use crate::dashboard::Dashboard;
use crate::initialization::{Mgr, RunParameters};
use crate::manager_spot_price::SpotPrice;
use crate::report::AreaReport;
use crate::summarizer::summarize;

/// Runs the dashboard for all requested areas and saves one report per area
///
/// # Arguments
///
/// * 'config' - configuration
/// * 'mgr' - struct with configured managers
/// * 'params' - areas and view requested for this run
pub fn run(config: &Config, mgr: &Mgr, params: &RunParameters) -> Result<Vec<AreaReport>, WorkerError> {
    let run_start = Local::now();
    info!("Run start: {}, view: {}, areas: {:?}", run_start, params.view, params.areas);

    let reports: Vec<AreaReport> = params.areas
        .par_iter()
        .map(|area| {
            let mut dashboard = Dashboard::new(config.dashboard.area, config.dashboard.view);
            dashboard.set_area(*area);
            dashboard.set_view(params.view);
            load_area(&mgr.spot_price, dashboard, run_start, config.api.history_days)
        })
        .collect();

    for report in reports.iter() {
        if report.is_error() {
            error!("{} failed: {}", report.area, report.error.as_deref().unwrap_or_default());
        }
        info!("{} {}: {}", report.area, report.view, report.status);
        save_report(&config.files, report)?;
    }

    clean_up_files(&format!("{}*_summary.json", config.files.report_dir), run_start, config.files.retention_hours)?;

    if !reports.is_empty() && reports.iter().all(|r| r.is_error()) {
        return Err(WorkerError::AllAreasFailed(params.view.to_string()));
    }

    Ok(reports)
}

/// Fetches and summarizes records for the dashboard's area and view, driving it through one request
///
/// # Arguments
///
/// * 'spot_price' - spot price manager
/// * 'dashboard' - dashboard with the area and view selected
/// * 'run_start' - time of the run, its date ends the history window
/// * 'history_days' - number of days covered by the history view
fn load_area(spot_price: &SpotPrice, mut dashboard: Dashboard, run_start: DateTime<Local>, history_days: u32) -> AreaReport {
    let ticket = dashboard.request();

    let result = spot_price
        .get_records(ticket.area, ticket.view, run_start.date_naive())
        .map(|records| {
            let summary = summarize(&records, ticket.view.mode());
            info!("{} {}: {} records, {} series points", ticket.area, ticket.view, records.len(), summary.series.len());
            summary
        })
        .map_err(|e| e.to_string());

    if !dashboard.complete(ticket, result) {
        warn!("discarded stale result for {} {}", ticket.area, ticket.view);
    }

    AreaReport::from_dashboard(&dashboard, run_start, history_days)
}

/// Saves an area report to file
///
/// # Arguments
///
/// * 'files' - files config
/// * 'report' - the report to save
fn save_report(files: &Files, report: &AreaReport) -> Result<(), WorkerError> {
    let filename = format!("{}{}_{}_{}_summary.json", files.report_dir, report.created.format("%Y%m%d%H%M"), report.area, report.view);

    let json = serde_json::to_string_pretty(report)
        .map_err(|e| WorkerError::SaveReportError(format!("error serializing report: {}", e)))?;

    fs::write(&filename, json)
        .map_err(|e| WorkerError::SaveReportError(format!("error writing report to file: {}", e)))?;

    info!("Report saved to {}", filename);

    Ok(())
}

/// Removes any files following the pattern that are older than the retention time
///
/// # Arguments
///
/// * 'pattern' - file pattern
/// * 'gate_date_time' - the date time representing a newly created file
/// * 'retention_hours' - files older than this, relative to the gate, are removed
fn clean_up_files(pattern: &str, gate_date_time: DateTime<Local>, retention_hours: i64) -> Result<(), WorkerError> {
    let paths = glob(pattern)
        .map_err(|e| WorkerError::CleanUpError(format!("error reading files with pattern {}: {}", pattern, e)))?;

    for path in paths.flatten() {
        let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        let Some(created) = filename.get(0..12).and_then(parse_file_time) else {
            warn!("skipping clean up of {}, no timestamp prefix", filename);
            continue;
        };

        if gate_date_time.naive_local() - created > TimeDelta::hours(retention_hours) {
            fs::remove_file(&path)
                .map_err(|e| WorkerError::CleanUpError(format!("error removing file: {}", e)))?;
            info!("Removed old report {}", filename);
        }
    }

    Ok(())
}

fn parse_file_time(prefix: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(prefix, "%Y%m%d%H%M").ok()
}

/// Error depicting errors that occur while running the dashboard
///
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("error while saving report: {0:?}")]
    SaveReportError(String),
    #[error("error while cleaning up old files: {0:?}")]
    CleanUpError(String),
    #[error("no area could be loaded for view {0:?}")]
    AllAreasFailed(String),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use chrono::TimeZone;
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("forecast24-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_file_time() {
        let time = parse_file_time("202401021530").unwrap();
        assert_eq!(time.format("%Y-%m-%d %H:%M").to_string(), "2024-01-02 15:30");
        assert!(parse_file_time("summary.json").is_none());
    }

    #[test]
    fn test_clean_up_files_removes_only_old_reports() {
        let dir = temp_dir("clean-up");
        let old = dir.join("202312312300_NO1_today_summary.json");
        let recent = dir.join("202401021200_NO1_today_summary.json");
        let odd = dir.join("latest_summary.json");
        for path in [&old, &recent, &odd] {
            fs::write(path, "{}").unwrap();
        }

        let gate = Local.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let pattern = format!("{}/*_summary.json", dir.display());
        clean_up_files(&pattern, gate, 48).unwrap();

        assert!(!old.exists());
        assert!(recent.exists());
        assert!(odd.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
