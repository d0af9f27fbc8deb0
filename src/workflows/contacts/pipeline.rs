use super::address::normalize_address;
use super::names::{normalize_name, validate_email};
use super::options::{NormalizerOptions, OutputMode};
use super::outcome::{FallbackReason, FieldOutcome};
use super::parser::{ContactRecord, ContactTable};
use super::phone::normalize_phone;
use super::regions::{resolve_country, resolve_state};
use super::titles::normalize_job_title;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const STATE_ABBREVIATION_COLUMN: &str = "State Abbreviation";
pub const EMAIL_VALID_COLUMN: &str = "Email Valid";

/// Source columns the normalizer knows how to clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Address,
    Phone,
    State,
    Country,
    JobTitle,
    FirstName,
    LastName,
    Email,
}

impl ContactField {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Address,
            Self::Phone,
            Self::State,
            Self::Country,
            Self::JobTitle,
            Self::FirstName,
            Self::LastName,
            Self::Email,
        ]
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::Phone => "Phone",
            Self::State => "State",
            Self::Country => "Country",
            Self::JobTitle => "Job Title",
            Self::FirstName => "FirstName",
            Self::LastName => "LastName",
            Self::Email => "Email",
        }
    }

    const fn standardized_column(self) -> &'static str {
        match self {
            Self::Address => "Standardized Address",
            Self::Phone => "Standardized Phone",
            Self::State => "Standardized State",
            Self::Country => "Standardized Country",
            Self::JobTitle => "Standardized Job Title",
            Self::FirstName => "Standardized FirstName",
            Self::LastName => "Standardized LastName",
            Self::Email => EMAIL_VALID_COLUMN,
        }
    }

    /// Columns written for this field, in output order.
    pub fn destination_columns(self, mode: OutputMode) -> Vec<&'static str> {
        let primary = match (self, mode) {
            (Self::Email, _) => EMAIL_VALID_COLUMN,
            (Self::JobTitle, _) | (_, OutputMode::Append) => self.standardized_column(),
            (_, OutputMode::Overwrite) => self.column(),
        };

        match self {
            Self::State => vec![STATE_ABBREVIATION_COLUMN, primary],
            _ => vec![primary],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub normalized: usize,
    pub fallback: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub rows: usize,
    pub processed_at: DateTime<Utc>,
    pub fields: BTreeMap<ContactField, FieldStats>,
    pub valid_emails: usize,
    pub invalid_emails: usize,
}

impl BatchSummary {
    pub fn fallbacks(&self) -> usize {
        self.fields.values().map(|stats| stats.fallback).sum()
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub table: ContactTable,
    pub summary: BatchSummary,
}

#[derive(Default)]
struct Tally {
    fields: BTreeMap<ContactField, FieldStats>,
    valid_emails: usize,
    invalid_emails: usize,
}

impl Tally {
    fn record<T>(&mut self, field: ContactField, outcome: &FieldOutcome<T>) {
        let stats = self.fields.entry(field).or_default();
        match outcome.reason() {
            None => stats.normalized += 1,
            Some(reason) => {
                stats.fallback += 1;
                if reason != FallbackReason::Empty {
                    debug!(field = field.column(), reason = reason.label(), "kept original value");
                }
            }
        }
    }
}

/// Applies every field normalizer to contact rows according to one set of options.
#[derive(Debug, Clone, Default)]
pub struct ContactNormalizer {
    options: NormalizerOptions,
}

impl ContactNormalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Input headers followed by any destination columns they do not already contain.
    pub fn output_headers(&self, input_headers: &[String]) -> Vec<String> {
        let mut headers = input_headers.to_vec();
        for field in ContactField::ordered() {
            if !input_headers.iter().any(|header| header == field.column()) {
                continue;
            }
            for column in field.destination_columns(self.options.output_mode) {
                if !headers.iter().any(|header| header == column) {
                    headers.push(column.to_string());
                }
            }
        }
        headers
    }

    pub fn normalize_record(&self, record: &ContactRecord) -> ContactRecord {
        self.apply(record, &mut Tally::default())
    }

    pub fn normalize_table(&self, table: &ContactTable) -> NormalizedBatch {
        let mut tally = Tally::default();
        let records: Vec<ContactRecord> = table
            .records()
            .iter()
            .map(|record| self.apply(record, &mut tally))
            .collect();

        let summary = BatchSummary {
            rows: table.len(),
            processed_at: Utc::now(),
            fields: tally.fields,
            valid_emails: tally.valid_emails,
            invalid_emails: tally.invalid_emails,
        };
        info!(
            rows = summary.rows,
            fallbacks = summary.fallbacks(),
            invalid_emails = summary.invalid_emails,
            "contact batch normalized"
        );

        NormalizedBatch {
            table: ContactTable::new(self.output_headers(table.headers()), records),
            summary,
        }
    }

    fn apply(&self, record: &ContactRecord, tally: &mut Tally) -> ContactRecord {
        let options = &self.options;
        let mode = options.output_mode;
        let mut output = record.clone();

        for field in ContactField::ordered() {
            let Some(raw) = record.get(field.column()) else {
                continue;
            };
            // Source cells keep their padding; normalizers see the trimmed value.
            let value = raw.trim();
            let columns = field.destination_columns(mode);

            match field {
                ContactField::Address => {
                    let outcome = normalize_address(value, options.street_label);
                    tally.record(field, &outcome);
                    output.set(columns[0], outcome.into_value());
                }
                ContactField::Phone => {
                    let outcome =
                        normalize_phone(value, options.phone_format, options.phone_region);
                    tally.record(field, &outcome);
                    output.set(columns[0], outcome.into_value());
                }
                ContactField::State => {
                    let outcome = resolve_state(value);
                    tally.record(field, &outcome);
                    let pair = outcome.into_pair();
                    output.set(columns[0], pair.abbreviation);
                    output.set(columns[1], pair.full_name);
                }
                ContactField::Country => {
                    let outcome = resolve_country(value);
                    tally.record(field, &outcome);
                    output.set(columns[0], outcome.into_value());
                }
                ContactField::JobTitle => {
                    let outcome = normalize_job_title(
                        value,
                        options.title_catalog.titles(),
                        options.title_min_score,
                    );
                    tally.record(field, &outcome);
                    output.set(columns[0], outcome.into_value());
                }
                ContactField::FirstName | ContactField::LastName => {
                    let outcome: FieldOutcome<String> =
                        FieldOutcome::Transformed(normalize_name(value, options.name_case));
                    tally.record(field, &outcome);
                    output.set(columns[0], outcome.into_value());
                }
                ContactField::Email => {
                    let valid = validate_email(raw);
                    if valid {
                        tally.valid_emails += 1;
                    } else {
                        tally.invalid_emails += 1;
                    }
                    output.set(columns[0], bool_cell(valid));
                }
            }
        }

        output
    }
}

fn bool_cell(value: bool) -> String {
    let label = if value { "True" } else { "False" };
    label.to_string()
}
