use thiserror::Error;

/// Error depicting an unrecoverable failure of a dashboard run
///
#[derive(Debug, Error)]
#[error("error while running dashboard: {0}")]
pub struct DashboardError(pub String);
