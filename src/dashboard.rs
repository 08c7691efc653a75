use crate::models::{Area, Summary, View};

/// State of one dashboard view
#[derive(Clone, PartialEq, Debug)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded(Summary),
    Error(String),
}

/// Identity of a fetch request issued by a dashboard
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ticket {
    generation: u64,
    pub area: Area,
    pub view: View,
}

/// Keeps the selected area and view together with the state of the latest request.
///
/// Every parameter change starts a new generation, results for tickets from an older
/// generation, or with parameters not matching the current selection, are discarded.
pub struct Dashboard {
    area: Area,
    view: View,
    generation: u64,
    state: ViewState,
}

impl Dashboard {
    pub fn new(area: Area, view: View) -> Dashboard {
        Dashboard { area, view, generation: 0, state: ViewState::Idle }
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Selects another area, any outstanding request becomes stale
    ///
    /// # Arguments
    ///
    /// * 'area' - the new area
    pub fn set_area(&mut self, area: Area) {
        if area != self.area {
            self.area = area;
            self.invalidate();
        }
    }

    /// Selects another view, any outstanding request becomes stale
    ///
    /// # Arguments
    ///
    /// * 'view' - the new view
    pub fn set_view(&mut self, view: View) {
        if view != self.view {
            self.view = view;
            self.invalidate();
        }
    }

    /// Issues a ticket for the current parameters and moves to loading
    ///
    pub fn request(&mut self) -> Ticket {
        self.generation += 1;
        self.state = ViewState::Loading;

        Ticket { generation: self.generation, area: self.area, view: self.view }
    }

    /// Applies the result of a request, returns false if the result was discarded as stale
    ///
    /// # Arguments
    ///
    /// * 'ticket' - the ticket given when the request was issued
    /// * 'result' - summary or error message from the request
    pub fn complete(&mut self, ticket: Ticket, result: Result<Summary, String>) -> bool {
        if ticket.generation != self.generation || ticket.area != self.area || ticket.view != self.view {
            return false;
        }

        self.state = match result {
            Ok(summary) => ViewState::Loaded(summary),
            Err(e) => ViewState::Error(e),
        };

        true
    }

    /// Returns the status indicator text for the current state
    ///
    pub fn status_label(&self) -> &'static str {
        match &self.state {
            ViewState::Idle => "Idle",
            ViewState::Loading => "Loading…",
            ViewState::Loaded(summary) if summary.kpi.is_none() => "No data",
            ViewState::Loaded(_) => "Live",
            ViewState::Error(_) => "Error",
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.state = ViewState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Kpi, SeriesPoint};
    use super::*;

    fn summary() -> Summary {
        let point = SeriesPoint { label: "00:00".into(), price: 1.0 };
        Summary {
            series: vec![point.clone()],
            kpi: Some(Kpi { cheapest: point.clone(), priciest: point, average: 1.0 }),
        }
    }

    #[test]
    fn test_request_then_complete() {
        let mut dashboard = Dashboard::new(Area::NO1, View::Today);
        assert_eq!(dashboard.state(), &ViewState::Idle);

        let ticket = dashboard.request();
        assert_eq!(dashboard.status_label(), "Loading…");

        assert!(dashboard.complete(ticket, Ok(summary())));
        assert_eq!(dashboard.state(), &ViewState::Loaded(summary()));
        assert_eq!(dashboard.status_label(), "Live");
    }

    #[test]
    fn test_error_result() {
        let mut dashboard = Dashboard::new(Area::NO1, View::Today);
        let ticket = dashboard.request();

        assert!(dashboard.complete(ticket, Err("timeout".into())));
        assert_eq!(dashboard.state(), &ViewState::Error("timeout".into()));
        assert_eq!(dashboard.status_label(), "Error");
    }

    #[test]
    fn test_empty_summary_shows_no_data() {
        let mut dashboard = Dashboard::new(Area::NO4, View::History);
        let ticket = dashboard.request();

        assert!(dashboard.complete(ticket, Ok(Summary::default())));
        assert_eq!(dashboard.status_label(), "No data");
    }

    #[test]
    fn test_area_change_discards_outstanding_result() {
        let mut dashboard = Dashboard::new(Area::NO1, View::Today);
        let stale = dashboard.request();

        dashboard.set_area(Area::NO2);
        assert_eq!(dashboard.state(), &ViewState::Idle);
        assert!(!dashboard.complete(stale, Ok(summary())));
        assert_eq!(dashboard.state(), &ViewState::Idle);

        let fresh = dashboard.request();
        assert_eq!(fresh.area, Area::NO2);
        assert!(dashboard.complete(fresh, Ok(Summary::default())));
    }

    #[test]
    fn test_newer_request_wins() {
        let mut dashboard = Dashboard::new(Area::NO1, View::Today);
        let first = dashboard.request();
        let second = dashboard.request();

        assert!(!dashboard.complete(first, Err("late".into())));
        assert_eq!(dashboard.state(), &ViewState::Loading);
        assert!(dashboard.complete(second, Ok(summary())));
    }

    #[test]
    fn test_switching_back_does_not_revive_old_ticket() {
        let mut dashboard = Dashboard::new(Area::NO1, View::Today);
        let stale = dashboard.request();

        dashboard.set_view(View::History);
        dashboard.set_view(View::Today);

        assert!(!dashboard.complete(stale, Ok(summary())));
    }

    #[test]
    fn test_setting_same_area_keeps_request() {
        let mut dashboard = Dashboard::new(Area::NO3, View::Forecast);
        let ticket = dashboard.request();

        dashboard.set_area(Area::NO3);

        assert!(dashboard.complete(ticket, Ok(summary())));
    }
}
