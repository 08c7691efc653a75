use std::fmt;
use std::fmt::Formatter;
use chrono::{DateTime, Local};
use serde::Serialize;
use crate::dashboard::{Dashboard, ViewState};
use crate::models::{Area, Summary, View};

const BAR_WIDTH: f64 = 40.0;

/// Outcome of one dashboard run for an area, as written to report files and mails
#[derive(Serialize, Debug)]
pub struct AreaReport {
    pub created: DateTime<Local>,
    pub area: Area,
    pub view: View,
    pub history_days: u32,
    pub status: String,
    pub summary: Option<Summary>,
    pub error: Option<String>,
}

impl AreaReport {
    /// Builds a report from the current state of a dashboard
    ///
    /// # Arguments
    ///
    /// * 'dashboard' - the dashboard to report
    /// * 'created' - time of the report
    /// * 'history_days' - number of days covered by the history view
    pub fn from_dashboard(dashboard: &Dashboard, created: DateTime<Local>, history_days: u32) -> AreaReport {
        let (summary, error) = match dashboard.state() {
            ViewState::Loaded(summary) => (Some(summary.clone()), None),
            ViewState::Error(e) => (None, Some(e.clone())),
            ViewState::Idle | ViewState::Loading => (None, None),
        };

        AreaReport {
            created,
            area: dashboard.area(),
            view: dashboard.view(),
            history_days,
            status: dashboard.status_label().to_string(),
            summary,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn title(&self) -> String {
        match self.view {
            View::Today => "Today's spot price".to_string(),
            View::History => format!("Last {} days (daily average)", self.history_days),
            View::Forecast => "Price forecast".to_string(),
        }
    }

    fn unit(&self) -> &'static str {
        match self.view {
            View::History => "day",
            View::Today | View::Forecast => "hour",
        }
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for AreaReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "{} - {} [{}]", self.title(), self.area, self.status)?;

        if let Some(e) = &self.error {
            return writeln!(f, "  Could not load data for {}: {}", self.area, e);
        }

        let Some(summary) = &self.summary else {
            return writeln!(f, "  Loading…");
        };
        let Some(kpi) = &summary.kpi else {
            return writeln!(f, "  No KPI data.");
        };

        let unit = self.unit();
        writeln!(f, "  Priciest {:<5} {:>10}  {:.3} kr/kWh", unit, kpi.priciest.label, kpi.priciest.price)?;
        writeln!(f, "  Cheapest {:<5} {:>10}  {:.3} kr/kWh", unit, kpi.cheapest.label, kpi.cheapest.price)?;
        writeln!(f, "  Average price    {:>10.3}  kr/kWh", kpi.average)?;
        writeln!(f)?;

        for p in summary.series.iter() {
            writeln!(f, "  {:>10} {:>7.3} {}", p.label, p.price, bar(p.price, kpi.cheapest.price, kpi.priciest.price))?;
        }

        Ok(())
    }
}

/// Returns a text bar proportional to where the price sits between the cheapest and priciest value
///
/// # Arguments
///
/// * 'price' - the price to draw a bar for
/// * 'min' - lowest price in the series
/// * 'max' - highest price in the series
fn bar(price: f64, min: f64, max: f64) -> String {
    let span = max - min;
    let len = if span > 0.0 {
        1 + ((price - min) / span * (BAR_WIDTH - 1.0)).round() as usize
    } else {
        BAR_WIDTH as usize
    };

    "#".repeat(len)
}

#[cfg(test)]
mod tests {
    use crate::models::{Kpi, SeriesPoint};
    use super::*;

    fn report(dashboard: &Dashboard) -> AreaReport {
        AreaReport::from_dashboard(dashboard, Local::now(), 30)
    }

    #[test]
    fn test_bar_length() {
        assert_eq!(bar(0.1, 0.1, 0.5).len(), 1);
        assert_eq!(bar(0.5, 0.1, 0.5).len(), 40);
        assert_eq!(bar(0.3, 0.3, 0.3).len(), 40);
    }

    #[test]
    fn test_render_loaded_history() {
        let cheap = SeriesPoint { label: "2024-01-01".into(), price: 0.3 };
        let pricey = SeriesPoint { label: "2024-01-02".into(), price: 0.6 };
        let summary = Summary {
            series: vec![cheap.clone(), pricey.clone()],
            kpi: Some(Kpi { cheapest: cheap, priciest: pricey, average: 0.45 }),
        };
        let mut dashboard = Dashboard::new(Area::NO5, View::History);
        let ticket = dashboard.request();
        dashboard.complete(ticket, Ok(summary));

        let text = report(&dashboard).to_string();

        assert!(text.starts_with("Last 30 days (daily average) - NO5 [Live]"));
        assert!(text.contains("Priciest day   2024-01-02  0.600 kr/kWh"));
        assert!(text.contains("Cheapest day   2024-01-01  0.300 kr/kWh"));
        assert!(text.contains("0.450"));
    }

    #[test]
    fn test_render_empty_and_error() {
        let mut dashboard = Dashboard::new(Area::NO1, View::Today);
        let ticket = dashboard.request();
        dashboard.complete(ticket, Ok(Summary::default()));
        assert!(report(&dashboard).to_string().contains("No KPI data."));

        let ticket = dashboard.request();
        dashboard.complete(ticket, Err("StatusError: 503".into()));
        let report = report(&dashboard);
        assert!(report.is_error());
        assert!(report.to_string().contains("Could not load data for NO1: StatusError: 503"));
    }
}
