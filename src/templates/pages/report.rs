use crate::db::MergeOutcome;
use crate::domain::{CityAggregate, NormalizedListing};
use crate::templates::{divider, email_layout, labelled};
use chrono::{DateTime, NaiveDateTime};
use maud::html;

pub const SUBJECT_MATCHES: &str = "Property Alert: Matches Found";
pub const SUBJECT_NO_MATCHES: &str = "Property Alert: No Matches Found";

/// A rendered alert, ready for a notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub subject: String,
    pub html: String,
}

/// `2024-09-01T10:30:00Z` -> `September 01, 2024 10:30 AM`. Anything that
/// does not parse is shown as it came.
pub fn format_created_at(raw: &str) -> String {
    const OUT: &str = "%B %d, %Y %I:%M %p";

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ")
        .map(|dt| dt.format(OUT).to_string())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.format(OUT).to_string()))
        .unwrap_or_else(|_| raw.to_string())
}

pub fn render_report(
    aggregates: &[CityAggregate],
    merge: &MergeOutcome,
    fetch_failure: Option<&str>,
    matches: &[&NormalizedListing],
) -> Report {
    let subject = if matches.is_empty() {
        SUBJECT_NO_MATCHES
    } else {
        SUBJECT_MATCHES
    };

    let content = html! {
        h2 { "Average Price per Square Meter for Each City:" }
        @for agg in aggregates {
            b { (agg.city) ": " } (format!("{:.2} $/m²", agg.average_price_per_m2)) br;
        }

        br;
        b { (format!("CSV Update: {merge}")) } br;

        @if let Some(reason) = fetch_failure {
            b { (reason) } br;
        }

        @if matches.is_empty() {
            "No matching properties found."
        } @else {
            h2 { (format!("Properties Matching Your Criteria ({}):", matches.len())) }
            @for listing in matches {
                (labelled("Created at", format_created_at(&listing.created_at)))
                (labelled("Title", listing.title.as_str()))
                (labelled("Price", format!("{}$", listing.price)))
                (labelled("Community", listing.community.as_str()))
                (labelled("Bedrooms", listing.bedrooms.map(|b| b.to_string()).unwrap_or_default()))
                (labelled("Area", format!("{} m²", listing.area)))
                (labelled("Price per m²", format!("{} $/m²", listing.price_per_m2)))
                (labelled("Contact", format!("{} ({})", listing.client_name, listing.client_phone)))
                (labelled("Reference", listing.reference.as_str()))
                (divider())
            }
        }
    };

    Report {
        subject: subject.to_string(),
        html: email_layout(subject, content).into_string(),
    }
}
