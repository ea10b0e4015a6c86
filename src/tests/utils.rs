use crate::config::{Config, LogConfig};
use crate::domain::{FilterCriteria, NormalizePolicy, NormalizedListing};
use crate::mailer::{MailerError, Notifier};
use crate::scraper::{ScraperError, SearchParams};
use crate::templates::Report;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

/// Config pointing at `store_path` with the stock alert thresholds.
pub fn test_config(store_path: &Path) -> Config {
    Config {
        listings_base_url: "http://localhost/api/properties".to_string(),
        search: SearchParams {
            scope: "c969-c213-c569-c577".to_string(),
            max_price: Some(500000),
        },
        page_cap: 50,
        http_timeout: Duration::from_secs(5),
        store_path: store_path.to_path_buf(),
        criteria: FilterCriteria {
            max_price: 150000.0,
            max_bedrooms: 1,
            max_price_per_m2: 2600,
        },
        normalize_policy: NormalizePolicy::FailBatch,
        log: LogConfig {
            dir: None,
            file_name: "test.log".to_string(),
            level: "debug".to_string(),
        },
        mail: None,
    }
}

pub fn listing(id: &str) -> NormalizedListing {
    NormalizedListing {
        id: id.to_string(),
        price: 100000.0,
        area: 50.0,
        price_per_m2: 2000,
        community: "Achrafiyeh".to_string(),
        district: "Beirut".to_string(),
        bedrooms: Some(1),
        bathrooms: Some(1),
        furnished: Some(false),
        title: format!("Listing {id}"),
        client_name: "Acme Realty".to_string(),
        client_phone: "+961 1 234".to_string(),
        agent_full_name: "Rita Haddad".to_string(),
        agent_phone: "+961 3 555".to_string(),
        created_at: "2024-09-01T10:30:00Z".to_string(),
        reference: format!("RE-{id}"),
    }
}

/// An API document with the fields the normalizer needs.
pub fn doc(id: i64, price: i64, area: i64, bedrooms: i64, community: i64) -> Value {
    json!({
        "id": id,
        "price": price,
        "area": area,
        "community_id": community,
        "district_id": 28,
        "bedroom_value": bedrooms,
        "bathroom_value": 1,
        "furnished": 0,
        "title_en": format!("Flat {id}"),
        "created_at": "2024-09-01T10:30:00Z",
        "reference": format!("RE-{id}"),
        "client": { "display_name": "Acme Realty", "phone": "+961 1 234" },
        "agent": { "first_name": "Rita", "last_name": "Haddad", "phone": "+961 3 555" }
    })
}

/// Serves `pages[n - 1]` for page `n`, recording which pages were asked for.
/// Pages past the end come back empty.
pub struct ScriptedPages {
    pages: Vec<Result<Vec<Value>, ScraperError>>,
    pub requested: Vec<u32>,
}

impl ScriptedPages {
    pub fn new(pages: Vec<Result<Vec<Value>, ScraperError>>) -> Self {
        Self {
            pages,
            requested: Vec::new(),
        }
    }

    pub fn fetch(&mut self, page: u32) -> Result<Vec<Value>, ScraperError> {
        self.requested.push(page);
        match self.pages.get_mut(page as usize - 1) {
            Some(slot) => std::mem::replace(slot, Ok(Vec::new())),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<Report>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, report: &Report) -> Result<(), MailerError> {
        self.sent.borrow_mut().push(report.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _report: &Report) -> Result<(), MailerError> {
        Err(MailerError::RequestFailed("connection refused".to_string()))
    }
}
