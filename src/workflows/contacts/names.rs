use super::options::NameCase;
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("email pattern compiles")
    })
}

/// Recases a first or last name. Content is not validated.
pub fn normalize_name(value: &str, case: NameCase) -> String {
    match case {
        NameCase::Upper => value.to_uppercase(),
        NameCase::Capitalize => {
            let mut chars = value.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        }
    }
}

/// Syntactic check only; no mail server lookup.
pub fn validate_email(value: &str) -> bool {
    email_pattern().is_match(&value.to_lowercase())
}
