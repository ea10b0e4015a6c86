use crate::config::Config;
use crate::logging::init_logging;
use crate::mailer::{BrevoMailer, LogNotifier, Notifier};
use crate::pipeline::run_alert;
use crate::scraper::ListingScraper;
use anyhow::{Context, Result};
use tracing::{error, info};

mod config;
mod db;
mod domain;
mod errors;
mod logging;
mod mailer;
mod pipeline;
mod scraper;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Configuration first: the log sink location comes from it
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Configuration error: {e:#}");
            std::process::exit(2);
        }
    };

    // 2️⃣ Logging; the guard flushes the file writer on drop
    let _guard = match init_logging(&config.log) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("❌ Logging setup failed: {e:#}");
            std::process::exit(2);
        }
    };

    // 3️⃣ One run
    if let Err(e) = run(&config) {
        error!("Error in main process: {e:#}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let scraper = ListingScraper::new(
        config.listings_base_url.clone(),
        config.search.clone(),
        config.http_timeout,
    )
    .context("failed to build HTTP client")?;

    let notifier: Box<dyn Notifier> = match &config.mail {
        Some(mail) => Box::new(
            BrevoMailer::new(mail.clone(), config.http_timeout)
                .context("failed to build mail client")?,
        ),
        None => Box::new(LogNotifier),
    };

    let summary = run_alert(config, |page| scraper.fetch_page(page), notifier.as_ref())?;

    info!(
        pages = summary.pages_fetched,
        fetched = summary.listings_fetched,
        normalized = summary.listings_normalized,
        stop = ?summary.fetch_stop,
        merge = %summary.merge,
        matches = summary.matches,
        notified = summary.notified,
        "run complete"
    );
    info!("{}", "=".repeat(50));
    Ok(())
}
