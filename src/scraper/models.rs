use serde::Deserialize;

// doc
//  ├── id
//  ├── price
//  ├── area
//  ├── community_id
//  ├── district_id
//  ├── bedroom_value
//  ├── bathroom_value
//  ├── furnished
//  ├── title_en
//  ├── created_at
//  ├── reference
//  ├── client
//  │    ├── display_name
//  │    └── phone
//  └── agent
//       ├── first_name
//       ├── last_name
//       └── phone

/// One listing document as returned by the API. Everything is optional here;
/// required fields are enforced when the listing is normalized.
#[derive(Debug, Deserialize, Default)]
pub struct RawListing {
    pub id: Option<Scalar>,
    pub price: Option<Scalar>,
    pub area: Option<Scalar>,

    pub community_id: Option<Scalar>,
    pub district_id: Option<Scalar>,

    pub bedroom_value: Option<Scalar>,
    pub bathroom_value: Option<Scalar>,
    pub furnished: Option<Scalar>,

    pub title_en: Option<String>,
    pub created_at: Option<String>,
    pub reference: Option<Scalar>,

    pub client: Option<Contact>,
    pub agent: Option<Agent>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Contact {
    pub display_name: Option<String>,
    pub phone: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Agent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<Scalar>,
}

/// The API is not consistent about numbers: ids, codes and counts show up
/// both as JSON numbers and as strings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Bool(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Scalar::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| Scalar::Float(s.parse().ok()?).as_i64())
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Int(n) => Some(*n != 0),
            Scalar::Float(f) => Some(*f != 0.0),
            Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
        }
    }

    /// String form used for ids, codes and free text. Integral floats lose
    /// their fractional part so `969.0` and `969` read the same.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) if f.fract() == 0.0 && f.is_finite() => (*f as i64).to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}
