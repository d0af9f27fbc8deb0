//! Rule-based US address tagging.
//!
//! Tokens are labeled with the usual postal component names and regrouped in
//! the order they appeared. Commas and semicolons only mark segment boundaries.

use super::outcome::{FallbackReason, FieldOutcome};
use super::regions::is_state_token;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

const STREET_TYPES: &[&str] = &[
    "st", "street", "ave", "av", "avenue", "rd", "road", "blvd", "boulevard", "dr", "drive", "ln",
    "lane", "ct", "court", "way", "pl", "place", "ter", "terrace", "cir", "circle", "pkwy",
    "parkway", "hwy", "highway", "sq", "square", "trl", "trail", "pike", "loop", "row", "aly",
    "alley", "plz", "plaza", "expy", "expressway", "fwy", "freeway",
];

const DIRECTIONALS: &[&str] = &[
    "n", "s", "e", "w", "ne", "nw", "se", "sw", "north", "south", "east", "west", "northeast",
    "northwest", "southeast", "southwest",
];

const OCCUPANCY_TYPES: &[&str] = &[
    "apt", "apartment", "suite", "ste", "unit", "rm", "room", "fl", "floor", "bldg", "building",
    "lot", "#",
];

static ZIP_PATTERN: OnceLock<Regex> = OnceLock::new();

fn zip_pattern() -> &'static Regex {
    ZIP_PATTERN.get_or_init(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("zip pattern compiles"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressLabel {
    AddressNumber,
    StreetNamePreDirectional,
    StreetName,
    StreetNamePostType,
    StreetNamePostDirectional,
    OccupancyType,
    OccupancyIdentifier,
    #[serde(rename = "USPSBoxType")]
    UspsBoxType,
    #[serde(rename = "USPSBoxID")]
    UspsBoxId,
    PlaceName,
    StateName,
    ZipCode,
}

impl AddressLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddressNumber => "AddressNumber",
            Self::StreetNamePreDirectional => "StreetNamePreDirectional",
            Self::StreetName => "StreetName",
            Self::StreetNamePostType => "StreetNamePostType",
            Self::StreetNamePostDirectional => "StreetNamePostDirectional",
            Self::OccupancyType => "OccupancyType",
            Self::OccupancyIdentifier => "OccupancyIdentifier",
            Self::UspsBoxType => "USPSBoxType",
            Self::UspsBoxId => "USPSBoxID",
            Self::PlaceName => "PlaceName",
            Self::StateName => "StateName",
            Self::ZipCode => "ZipCode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    StreetAddress,
    PoBox,
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub components: Vec<(AddressLabel, String)>,
    pub kind: AddressKind,
}

impl ParsedAddress {
    pub fn get(&self, label: AddressLabel) -> Option<&str> {
        self.components
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, value)| value.as_str())
    }

    /// Component values in parse order, separated by single spaces.
    pub fn joined(&self) -> String {
        self.components
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("address is empty")]
    Empty,
    #[error("no postal components recognized in '{0}'")]
    Unrecognized(String),
    #[error("label {label} appears more than once in '{input}'")]
    RepeatedLabel { label: &'static str, input: String },
}

struct Token<'a> {
    text: &'a str,
    segment: usize,
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    input
        .split([',', ';'])
        .enumerate()
        .flat_map(|(segment, part)| {
            part.split_whitespace()
                .map(move |text| Token { text, segment })
        })
        .collect()
}

fn simplified(token: &str) -> String {
    token
        .chars()
        .filter(|ch| *ch != '.')
        .collect::<String>()
        .to_lowercase()
}

fn is_street_type(token: &str) -> bool {
    STREET_TYPES.contains(&simplified(token).as_str())
}

fn is_directional(token: &str) -> bool {
    DIRECTIONALS.contains(&simplified(token).as_str())
}

fn is_occupancy_type(token: &str) -> bool {
    OCCUPANCY_TYPES.contains(&simplified(token).as_str())
}

fn is_house_number(token: &str) -> bool {
    token.chars().next().is_some_and(|ch| ch.is_ascii_digit())
}

/// Labels the components of `input`.
pub fn tag(input: &str) -> Result<ParsedAddress, AddressParseError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(AddressParseError::Empty);
    }

    let mut labels = vec![AddressLabel::PlaceName; tokens.len()];
    let mut end = tokens.len();

    let has_zip = zip_pattern().is_match(tokens[end - 1].text);
    if has_zip {
        labels[end - 1] = AddressLabel::ZipCode;
        end -= 1;
    }

    let state_start = find_state(&tokens, end, has_zip);
    if let Some(start) = state_start {
        labels[start..end].fill(AddressLabel::StateName);
        end = start;
    }

    let kind = if end > 0 && is_po_box(&tokens) {
        let box_type_len: usize = if simplified(tokens[0].text) == "pobox" { 1 } else { 2 };
        let box_type_end = box_type_len.min(end);
        labels[..box_type_end].fill(AddressLabel::UspsBoxType);
        if box_type_end < end {
            labels[box_type_end] = AddressLabel::UspsBoxId;
        }
        AddressKind::PoBox
    } else if end > 0 && is_house_number(tokens[0].text) {
        labels[0] = AddressLabel::AddressNumber;
        let cursor = tag_street(&tokens, &mut labels, 1, end);
        tag_occupancy(&tokens, &mut labels, cursor, end);
        AddressKind::StreetAddress
    } else {
        AddressKind::Ambiguous
    };

    if kind == AddressKind::Ambiguous && !has_zip && state_start.is_none() {
        return Err(AddressParseError::Unrecognized(input.to_string()));
    }

    group_components(input, &tokens, &labels, kind)
}

fn find_state(tokens: &[Token<'_>], end: usize, has_zip: bool) -> Option<usize> {
    for width in (1..=3).rev() {
        if width > end {
            continue;
        }
        let start = end - width;
        let window = &tokens[start..end];
        if window.iter().any(|token| token.segment != window[0].segment) {
            continue;
        }
        let candidate = window
            .iter()
            .map(|token| token.text)
            .collect::<Vec<_>>()
            .join(" ");
        if !is_state_token(&candidate) {
            continue;
        }

        let starts_segment = start == 0 || tokens[start - 1].segment != tokens[start].segment;
        if has_zip || starts_segment || start >= 3 {
            return Some(start);
        }
    }
    None
}

fn is_po_box(tokens: &[Token<'_>]) -> bool {
    let first = simplified(tokens[0].text);
    if first == "pobox" {
        return true;
    }
    first == "po"
        && tokens
            .get(1)
            .is_some_and(|token| simplified(token.text) == "box")
}

/// Labels directional, street name and type tokens after the house number.
fn tag_street(
    tokens: &[Token<'_>],
    labels: &mut [AddressLabel],
    mut cursor: usize,
    end: usize,
) -> usize {
    if cursor + 1 < end && is_directional(tokens[cursor].text) {
        labels[cursor] = AddressLabel::StreetNamePreDirectional;
        cursor += 1;
    }
    if cursor >= end {
        return cursor;
    }

    let street_start = cursor;
    let segment = tokens[street_start].segment;
    let segment_end = (street_start..end)
        .find(|&index| tokens[index].segment != segment)
        .unwrap_or(end);

    let street_type = (street_start + 1..segment_end).find(|&index| is_street_type(tokens[index].text));
    match street_type {
        Some(type_index) => {
            labels[street_start..type_index].fill(AddressLabel::StreetName);
            labels[type_index] = AddressLabel::StreetNamePostType;
            cursor = type_index + 1;
            if cursor < segment_end && is_directional(tokens[cursor].text) {
                labels[cursor] = AddressLabel::StreetNamePostDirectional;
                cursor += 1;
            }
            cursor
        }
        None => {
            let name_end = (street_start..segment_end)
                .find(|&index| is_occupancy_type(tokens[index].text))
                .unwrap_or(segment_end);
            labels[street_start..name_end].fill(AddressLabel::StreetName);
            name_end
        }
    }
}

fn tag_occupancy(tokens: &[Token<'_>], labels: &mut [AddressLabel], mut cursor: usize, end: usize) {
    while cursor < end {
        let text = tokens[cursor].text;
        if is_occupancy_type(text) && cursor + 1 < end {
            labels[cursor] = AddressLabel::OccupancyType;
            labels[cursor + 1] = AddressLabel::OccupancyIdentifier;
            cursor += 2;
        } else if text.len() > 1 && text.starts_with('#') {
            labels[cursor] = AddressLabel::OccupancyIdentifier;
            cursor += 1;
        } else {
            break;
        }
    }
}

fn group_components(
    input: &str,
    tokens: &[Token<'_>],
    labels: &[AddressLabel],
    kind: AddressKind,
) -> Result<ParsedAddress, AddressParseError> {
    let mut components: Vec<(AddressLabel, String)> = Vec::new();
    for (token, label) in tokens.iter().zip(labels) {
        match components.last_mut() {
            Some((last, value)) if *last == *label => {
                value.push(' ');
                value.push_str(token.text);
            }
            _ => {
                if components.iter().any(|(seen, _)| seen == label) {
                    return Err(AddressParseError::RepeatedLabel {
                        label: label.label(),
                        input: input.to_string(),
                    });
                }
                components.push((*label, token.text.to_string()));
            }
        }
    }

    Ok(ParsedAddress { components, kind })
}

/// Re-joins the tagged components of `raw`, or returns it untouched.
pub fn normalize_address(raw: &str, street_label: bool) -> FieldOutcome<String> {
    match tag(raw) {
        Ok(parsed) => {
            let joined = parsed.joined();
            if street_label {
                FieldOutcome::Transformed(joined.replace("Address", "Street"))
            } else {
                FieldOutcome::Transformed(joined)
            }
        }
        Err(AddressParseError::Empty) => FieldOutcome::fallback(raw, FallbackReason::Empty),
        Err(err) => {
            debug!(error = %err, "address did not parse");
            FieldOutcome::fallback(raw, FallbackReason::ParseFailure)
        }
    }
}
