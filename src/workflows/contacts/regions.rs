use super::outcome::{FallbackReason, FieldOutcome};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

const COUNTRIES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("UK", "United Kingdom"),
    ("CAN", "Canada"),
    ("AUS", "Australia"),
    ("DEU", "Germany"),
    ("FRA", "France"),
    ("ITA", "Italy"),
    ("JPN", "Japan"),
    ("CHN", "China"),
    ("RUS", "Russia"),
    ("IND", "India"),
    ("BRA", "Brazil"),
    ("ZAF", "South Africa"),
    ("MEX", "Mexico"),
];

struct StateTable {
    by_abbreviation: HashMap<&'static str, &'static str>,
    by_name: HashMap<&'static str, &'static str>,
}

static STATE_TABLE: OnceLock<StateTable> = OnceLock::new();
static COUNTRY_TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn state_table() -> &'static StateTable {
    STATE_TABLE.get_or_init(|| {
        let mut by_abbreviation = HashMap::with_capacity(US_STATES.len());
        let mut by_name = HashMap::with_capacity(US_STATES.len());
        for (abbreviation, name) in US_STATES {
            by_abbreviation.insert(*abbreviation, *name);
            by_name.insert(*name, *abbreviation);
        }
        StateTable {
            by_abbreviation,
            by_name,
        }
    })
}

fn country_table() -> &'static HashMap<&'static str, &'static str> {
    COUNTRY_TABLE.get_or_init(|| COUNTRIES.iter().copied().collect())
}

/// Abbreviation and full name of a US state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePair {
    pub abbreviation: String,
    pub full_name: String,
}

impl StatePair {
    fn identity(value: &str) -> Self {
        Self {
            abbreviation: value.to_string(),
            full_name: value.to_string(),
        }
    }
}

/// Resolves a state abbreviation (any case) or full name (any casing of its
/// words) to the canonical pair.
pub fn resolve_state(value: &str) -> FieldOutcome<StatePair> {
    let table = state_table();

    let upper = value.to_uppercase();
    if let Some((abbreviation, name)) = table.by_abbreviation.get_key_value(upper.as_str()) {
        return FieldOutcome::Transformed(StatePair {
            abbreviation: abbreviation.to_string(),
            full_name: name.to_string(),
        });
    }

    let titled = title_case(value);
    if let Some((name, abbreviation)) = table.by_name.get_key_value(titled.as_str()) {
        return FieldOutcome::Transformed(StatePair {
            abbreviation: abbreviation.to_string(),
            full_name: name.to_string(),
        });
    }

    FieldOutcome::fallback(value, FallbackReason::LookupMiss)
}

impl FieldOutcome<StatePair> {
    /// Unknown input comes back as both halves of the pair.
    pub fn into_pair(self) -> StatePair {
        match self {
            FieldOutcome::Transformed(pair) => pair,
            FieldOutcome::Fallback { original, .. } => StatePair::identity(&original),
        }
    }
}

/// Total variant of [`resolve_state`].
pub fn normalize_state(value: &str) -> StatePair {
    resolve_state(value).into_pair()
}

pub(crate) fn is_state_token(value: &str) -> bool {
    let table = state_table();
    let stripped: String = value.chars().filter(|c| *c != '.').collect();
    table
        .by_abbreviation
        .contains_key(stripped.to_uppercase().as_str())
        || table.by_name.contains_key(title_case(value).as_str())
}

pub fn resolve_country(value: &str) -> FieldOutcome<String> {
    match country_table().get(value) {
        Some(name) => FieldOutcome::Transformed(name.to_string()),
        None => FieldOutcome::fallback(value, FallbackReason::LookupMiss),
    }
}

/// Expands a country code; lookups are exact and case-sensitive.
pub fn normalize_country(value: &str) -> String {
    resolve_country(value).into_value()
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub(crate) fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            output.push(ch);
            previous_is_letter = false;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(abbreviation: &str, full_name: &str) -> StatePair {
        StatePair {
            abbreviation: abbreviation.to_string(),
            full_name: full_name.to_string(),
        }
    }

    #[test]
    fn state_table_is_a_bijection_over_fifty_states() {
        let table = state_table();
        assert_eq!(table.by_abbreviation.len(), 50);
        assert_eq!(table.by_name.len(), 50);
        for (abbreviation, name) in US_STATES {
            assert_eq!(normalize_state(abbreviation), pair(abbreviation, name));
            assert_eq!(normalize_state(name), pair(abbreviation, name));
        }
    }

    #[test]
    fn state_matching_ignores_case() {
        assert_eq!(normalize_state("ca"), pair("CA", "California"));
        assert_eq!(normalize_state("new york"), pair("NY", "New York"));
        assert_eq!(normalize_state("NORTH DAKOTA"), pair("ND", "North Dakota"));
    }

    #[test]
    fn state_normalization_is_idempotent() {
        for input in ["tx", "Texas", "rhode island", "Ontario", "", "  CA"] {
            let first = normalize_state(input);
            assert_eq!(normalize_state(&first.abbreviation), first, "input {input:?}");
        }
    }

    #[test]
    fn unknown_state_falls_back_to_identity() {
        assert_eq!(normalize_state("Ontario"), pair("Ontario", "Ontario"));
        assert_eq!(
            resolve_state("Ontario").reason(),
            Some(FallbackReason::LookupMiss)
        );
    }

    #[test]
    fn country_lookup_is_exact() {
        assert_eq!(normalize_country("USA"), "United States");
        assert_eq!(normalize_country("ZAF"), "South Africa");
        assert_eq!(normalize_country("usa"), "usa");
        assert_eq!(normalize_country("Narnia"), "Narnia");
    }

    #[test]
    fn state_tokens_accept_dotted_abbreviations() {
        assert!(is_state_token("il"));
        assert!(is_state_token("N.Y."));
        assert!(is_state_token("oregon"));
        assert!(!is_state_token("Springfield"));
    }

    #[test]
    fn title_case_restarts_after_non_letters() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("o'neil-SMITH"), "O'Neil-Smith");
    }
}
