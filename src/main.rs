use rayon::ThreadPoolBuilder;
use anyhow::Result;
use log::error;
use crate::errors::DashboardError;
use crate::initialization::init;
use crate::manager_mail::report_body;
use crate::worker::run;

mod manager_spot_price;
mod errors;
mod manager_mail;
mod config;
mod initialization;
mod logging;
mod macros;
mod dashboard;
mod report;
mod summarizer;
pub mod models;
mod worker;

fn main() -> Result<()> {
    ThreadPoolBuilder::new().num_threads(2).build_global()?;

    // Load config and set up all managers. If initialization fails, we are pretty much out of luck
    // and can't even log or send notification mail.
    let (config, params, mgr) = match init() {
        Ok((c, p, m)) => (c, p, m),
        Err(e) => {
            return Err(DashboardError(format!("Initialization failed: {}", e)))?;
        }
    };

    match run(&config, &mgr, &params) {
        Ok(reports) => {
            println!("{}", report_body(&reports));
            if let Some(mail) = &mgr.mail {
                mail.send_reports(&reports)?;
            }
        },
        Err(e) => {
            error!("Run failed: {}", e);
            if let Some(mail) = &mgr.mail {
                mail.send_error(&e.to_string())?;
            }
            return Err(DashboardError(e.to_string()))?;
        }
    }

    Ok(())
}
