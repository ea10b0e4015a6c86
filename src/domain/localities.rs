// src/domain/localities.rs

/// Locality codes used by the listings API for the areas we track.
const LOCALITIES: &[(&str, &str)] = &[
    ("969", "Achrafiyeh"),
    ("213", "Gemayzeh"),
    ("569", "Mar Mikhael"),
    ("28", "Beirut"),
    ("577", "Badaro"),
];

/// Maps a community/district code to its name. Unknown codes come back as-is.
pub fn resolve_locality(code: &str) -> String {
    LOCALITIES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| code.to_string())
}
