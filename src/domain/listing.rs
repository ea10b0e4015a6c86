// src/domain/listing.rs

use crate::domain::localities::resolve_locality;
use crate::scraper::models::{RawListing, Scalar};
use serde::{Deserialize, Serialize};

/// Column order of the store file. Must match the field order of
/// [`NormalizedListing`], which is what the csv serializer writes.
pub const STORE_COLUMNS: [&str; 16] = [
    "ID",
    "price",
    "area",
    "price_per_m2",
    "community",
    "district",
    "bedroom_value",
    "bathroom_value",
    "furnished",
    "title_en",
    "client.display_name",
    "client.phone",
    "agent.full_name",
    "agent.phone",
    "created_at",
    "reference",
];

/// A listing flattened to the fixed schema we store and report on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    #[serde(rename = "ID")]
    pub id: String,
    pub price: f64,
    pub area: f64,
    pub price_per_m2: i64,
    pub community: String,
    pub district: String,
    #[serde(rename = "bedroom_value")]
    pub bedrooms: Option<i64>,
    #[serde(rename = "bathroom_value")]
    pub bathrooms: Option<i64>,
    pub furnished: Option<bool>,
    #[serde(rename = "title_en")]
    pub title: String,
    #[serde(rename = "client.display_name")]
    pub client_name: String,
    #[serde(rename = "client.phone")]
    pub client_phone: String,
    #[serde(rename = "agent.full_name")]
    pub agent_full_name: String,
    #[serde(rename = "agent.phone")]
    pub agent_phone: String,
    pub created_at: String,
    pub reference: String,
}

/// Canonical identifier form used on both sides of the store comparison.
/// Stored ids may have been written by other tools as `123.0`.
pub fn canonical_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(int_part) = trimmed.strip_suffix(".0") {
        if !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit()) {
            return int_part.to_string();
        }
    }
    trimmed.to_string()
}

/// `round(price / area)`, rounding half away from zero.
pub fn price_per_area(price: f64, area: f64) -> i64 {
    (price / area).round() as i64
}

/// `first + " " + last`, trimmed; either part may be missing.
pub fn agent_full_name(first: Option<&str>, last: Option<&str>) -> String {
    format!("{} {}", first.unwrap_or(""), last.unwrap_or(""))
        .trim()
        .to_string()
}

impl NormalizedListing {
    /// Flattens a raw API document. Returns the name of the first required
    /// field that is missing or unusable.
    pub fn from_raw(raw: &RawListing) -> Result<Self, &'static str> {
        let id = raw
            .id
            .as_ref()
            .map(|s| canonical_id(&s.to_text()))
            .filter(|s| !s.is_empty())
            .ok_or("id")?;

        let price = raw
            .price
            .as_ref()
            .and_then(Scalar::as_f64)
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or("price")?;

        let area = raw
            .area
            .as_ref()
            .and_then(Scalar::as_f64)
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or("area")?;

        let text = |s: &Option<Scalar>| s.as_ref().map(Scalar::to_text).unwrap_or_default();
        let locality = |s: &Option<Scalar>| resolve_locality(&text(s));

        let client = raw.client.as_ref();
        let agent = raw.agent.as_ref();

        Ok(NormalizedListing {
            id,
            price,
            area,
            price_per_m2: price_per_area(price, area),
            community: locality(&raw.community_id),
            district: locality(&raw.district_id),
            bedrooms: raw.bedroom_value.as_ref().and_then(Scalar::as_i64),
            bathrooms: raw.bathroom_value.as_ref().and_then(Scalar::as_i64),
            furnished: raw.furnished.as_ref().and_then(Scalar::as_bool),
            title: raw.title_en.clone().unwrap_or_default(),
            client_name: client
                .and_then(|c| c.display_name.clone())
                .unwrap_or_default(),
            client_phone: client.map(|c| text(&c.phone)).unwrap_or_default(),
            agent_full_name: agent_full_name(
                agent.and_then(|a| a.first_name.as_deref()),
                agent.and_then(|a| a.last_name.as_deref()),
            ),
            agent_phone: agent.map(|a| text(&a.phone)).unwrap_or_default(),
            created_at: raw.created_at.clone().unwrap_or_default(),
            reference: text(&raw.reference),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(doc: serde_json::Value) -> RawListing {
        serde_json::from_value(doc).unwrap()
    }

    #[test]
    fn price_per_area_rounds_half_up() {
        assert_eq!(price_per_area(100000.0, 50.0), 2000);
        assert_eq!(price_per_area(125.0, 2.0), 63);
        assert_eq!(price_per_area(124.0, 3.0), 41);
        assert_eq!(price_per_area(0.0, 80.0), 0);
    }

    #[test]
    fn agent_name_tolerates_missing_parts() {
        assert_eq!(agent_full_name(Some("Rita"), Some("Haddad")), "Rita Haddad");
        assert_eq!(agent_full_name(Some("Rita"), None), "Rita");
        assert_eq!(agent_full_name(None, Some("Haddad")), "Haddad");
        assert_eq!(agent_full_name(None, None), "");
    }

    #[test]
    fn canonical_id_unifies_numeric_renderings() {
        assert_eq!(canonical_id("123"), "123");
        assert_eq!(canonical_id(" 123 "), "123");
        assert_eq!(canonical_id("123.0"), "123");
        assert_eq!(canonical_id("abc.0"), "abc.0");
        assert_eq!(canonical_id("12.5"), "12.5");
    }

    #[test]
    fn from_raw_projects_and_derives_fields() {
        let listing = NormalizedListing::from_raw(&raw(json!({
            "id": 88123,
            "price": 100000,
            "area": 50,
            "community_id": 969,
            "district_id": "4242",
            "bedroom_value": 1,
            "bathroom_value": "2",
            "furnished": true,
            "title_en": "Sunny flat",
            "created_at": "2024-09-01T10:30:00Z",
            "reference": "RE-1",
            "client": { "display_name": "Acme Realty", "phone": "+961 1 234" },
            "agent": { "first_name": "Rita", "phone": "+961 3 555" },
            "slug": "sunny-flat"
        })))
        .unwrap();

        assert_eq!(listing.id, "88123");
        assert_eq!(listing.price_per_m2, 2000);
        assert_eq!(listing.community, "Achrafiyeh");
        assert_eq!(listing.district, "4242");
        assert_eq!(listing.bedrooms, Some(1));
        assert_eq!(listing.bathrooms, Some(2));
        assert_eq!(listing.furnished, Some(true));
        assert_eq!(listing.agent_full_name, "Rita");
        assert_eq!(listing.client_phone, "+961 1 234");
        assert_eq!(listing.reference, "RE-1");
    }

    #[test]
    fn from_raw_rejects_missing_or_zero_area() {
        let missing = raw(json!({ "id": 1, "price": 1000 }));
        let zero = raw(json!({ "id": 1, "price": 1000, "area": 0 }));

        assert_eq!(NormalizedListing::from_raw(&missing), Err("area"));
        assert_eq!(NormalizedListing::from_raw(&zero), Err("area"));
    }

    #[test]
    fn from_raw_rejects_missing_id_and_price() {
        assert_eq!(
            NormalizedListing::from_raw(&raw(json!({ "price": 1, "area": 1 }))),
            Err("id")
        );
        assert_eq!(
            NormalizedListing::from_raw(&raw(json!({ "id": "x", "area": 1 }))),
            Err("price")
        );
        assert_eq!(
            NormalizedListing::from_raw(&raw(json!({ "id": "x", "price": -5, "area": 1 }))),
            Err("price")
        );
    }
}
