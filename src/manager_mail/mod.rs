use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use log::info;
use thiserror::Error;
use crate::config::MailParameters;
use crate::report::AreaReport;

/// Sends dashboard reports and error notifications by mail
pub struct Mail {
    sender: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl Mail {
    /// Returns a new instance of the Mail struct
    ///
    /// # Arguments
    ///
    /// * 'config' - mail configuration parameters
    pub fn new(config: &MailParameters) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.smtp_user.to_owned(), config.smtp_password.to_owned());
        let sender = SmtpTransport::relay(&config.smtp_endpoint)
            .map_err(|e| MailError::SMTPTransportError(e.to_string()))?
            .credentials(credentials)
            .build();

        let (from, to) = parse_addresses(&config.from, &config.to)?;

        Ok(Self { sender, from, to })
    }

    /// Sends the rendered area reports of a run
    ///
    /// # Arguments
    ///
    /// * 'reports' - reports of the run, one per area
    pub fn send_reports(&self, reports: &[AreaReport]) -> Result<(), MailError> {
        self.send_mail(report_subject(reports), report_body(reports))
    }

    /// Sends a notification about a failed run
    ///
    /// # Arguments
    ///
    /// * 'error' - the error message of the run
    pub fn send_error(&self, error: &str) -> Result<(), MailError> {
        self.send_mail("forecast24: run failed".to_string(), format!("Run failed: {}", error))
    }

    /// Sends a plain text mail with the given subject and body
    ///
    /// # Arguments
    ///
    /// * 'subject' - the subject of the mail
    /// * 'body' - the body of the mail
    fn send_mail(&self, subject: String, body: String) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(&subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::MessageError(e.to_string()))?;

        self.sender.send(&message)
            .map_err(|e| MailError::TransportError(e.to_string()))?;

        info!("mail sent: {}", subject);

        Ok(())
    }
}

/// Returns a subject naming the view and each area with its status, e.g. "forecast24 today: NO1 Live, NO2 Error"
///
/// # Arguments
///
/// * 'reports' - reports of the run
fn report_subject(reports: &[AreaReport]) -> String {
    let Some(first) = reports.first() else {
        return "forecast24: no areas loaded".to_string();
    };
    let areas = reports
        .iter()
        .map(|r| format!("{} {}", r.area, r.status))
        .collect::<Vec<String>>()
        .join(", ");

    format!("forecast24 {}: {}", first.view, areas)
}

/// Returns the text reports of all areas, failed areas first
///
/// # Arguments
///
/// * 'reports' - reports of the run
pub fn report_body(reports: &[AreaReport]) -> String {
    let mut ordered: Vec<&AreaReport> = reports.iter().collect();
    ordered.sort_by_key(|r| !r.is_error());

    ordered
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}

/// Parses sender and recipient into mailboxes
///
/// # Arguments
///
/// * 'from' - sender address, optionally with a display name
/// * 'to' - recipient address, optionally with a display name
fn parse_addresses(from: &str, to: &str) -> Result<(Mailbox, Mailbox), MailError> {
    let from = from.parse::<Mailbox>()
        .map_err(|e| MailError::ParseError(format!("from address: {}", e)))?;
    let to = to.parse::<Mailbox>()
        .map_err(|e| MailError::ParseError(format!("to address: {}", e)))?;

    Ok((from, to))
}

/// Error depicting errors that occur while sending emails
///
#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTPTransportError: {0}")]
    SMTPTransportError(String),
    #[error("TransportError: {0}")]
    TransportError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("MessageError: {0}")]
    MessageError(String),
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use crate::dashboard::Dashboard;
    use crate::models::{Area, Summary, View};
    use super::*;

    fn reports() -> Vec<AreaReport> {
        let mut loaded = Dashboard::new(Area::NO1, View::Today);
        let ticket = loaded.request();
        loaded.complete(ticket, Ok(Summary::default()));

        let mut failed = Dashboard::new(Area::NO2, View::Today);
        let ticket = failed.request();
        failed.complete(ticket, Err("StatusError: 500".into()));

        vec![
            AreaReport::from_dashboard(&loaded, Local::now(), 30),
            AreaReport::from_dashboard(&failed, Local::now(), 30),
        ]
    }

    #[test]
    fn test_report_subject() {
        assert_eq!(report_subject(&reports()), "forecast24 today: NO1 No data, NO2 Error");
        assert_eq!(report_subject(&[]), "forecast24: no areas loaded");
    }

    #[test]
    fn test_report_body_lists_failed_areas_first() {
        let body = report_body(&reports());

        assert!(body.starts_with("Today's spot price - NO2 [Error]"));
        assert!(body.contains("Today's spot price - NO1 [No data]"));
    }

    #[test]
    fn test_parse_addresses() {
        let (from, to) = parse_addresses("Forecast24 <noreply@example.com>", "ops@example.com").unwrap();
        assert_eq!(from.name.as_deref(), Some("Forecast24"));
        assert_eq!(to.email.to_string(), "ops@example.com");
    }

    #[test]
    fn test_parse_addresses_rejects_garbage() {
        assert!(matches!(parse_addresses("not an address", "ops@example.com"), Err(MailError::ParseError(_))));
    }
}
