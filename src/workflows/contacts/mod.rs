pub mod address;
pub mod fuzzy;
mod names;
mod options;
mod outcome;
mod parser;
mod phone;
mod pipeline;
mod regions;
mod titles;

use std::io::Read;
use std::path::Path;

pub use address::{normalize_address, AddressKind, AddressLabel, AddressParseError, ParsedAddress};
pub use names::{normalize_name, validate_email};
pub use options::{NameCase, NormalizerOptions, OutputMode, PhoneFormat, PhoneRegion, TitleCatalog};
pub use outcome::{FallbackReason, FieldOutcome};
pub use parser::{ContactRecord, ContactTable, TableView};
pub use phone::normalize_phone;
pub use pipeline::{
    BatchSummary, ContactField, ContactNormalizer, FieldStats, NormalizedBatch,
    EMAIL_VALID_COLUMN, STATE_ABBREVIATION_COLUMN,
};
pub use regions::{normalize_country, normalize_state, resolve_country, resolve_state, StatePair};
pub use titles::normalize_job_title;

/// Default file name for processed exports.
pub const PROCESSED_FILE_NAME: &str = "contacts_processed.csv";

#[derive(Debug, thiserror::Error)]
pub enum ContactImportError {
    #[error("failed to read contact file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid contact CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{0}' is missing from the contact file")]
    MissingColumn(String),
    #[error("processed contacts are not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub struct ContactImporter;

impl ContactImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ContactTable, ContactImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ContactTable, ContactImportError> {
        Ok(parser::parse_table(reader)?)
    }
}

/// Reads, optionally projects, and normalizes one contact file in a single pass.
pub fn cleanup_reader<R: Read>(
    reader: R,
    columns: Option<&[String]>,
    normalizer: &ContactNormalizer,
) -> Result<NormalizedBatch, ContactImportError> {
    let table = ContactImporter::from_reader(reader)?;
    let table = match columns {
        Some(columns) => table.select(columns)?,
        None => table,
    };
    Ok(normalizer.normalize_table(&table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CONTACTS: &str = "\
FirstName,LastName,Email,Phone,State,Country,Job Title,Address
ada,LOVELACE,Ada@Example.com,212.555.0100,ny,UK,Data Scientst,\"123 Main St, Springfield, IL 62704\"
grace,hopper,grace@navy,not-a-phone,Ontario,Narnia,product mgr,
";

    #[test]
    fn cleanup_reader_appends_standardized_columns() {
        let batch = cleanup_reader(Cursor::new(CONTACTS), None, &ContactNormalizer::default())
            .expect("cleanup succeeds");

        let first = &batch.table.records()[0];
        assert_eq!(first.get("Standardized FirstName"), Some("Ada"));
        assert_eq!(first.get("Standardized LastName"), Some("Lovelace"));
        assert_eq!(first.get("Email Valid"), Some("True"));
        assert_eq!(first.get("Standardized Phone"), Some("(212) 555-0100"));
        assert_eq!(first.get("State Abbreviation"), Some("NY"));
        assert_eq!(first.get("Standardized State"), Some("New York"));
        assert_eq!(first.get("Standardized Country"), Some("United Kingdom"));
        assert_eq!(first.get("Standardized Job Title"), Some("Data Scientist"));
        assert_eq!(
            first.get("Standardized Address"),
            Some("123 Main St Springfield IL 62704")
        );

        let second = &batch.table.records()[1];
        assert_eq!(second.get("Email Valid"), Some("False"));
        assert_eq!(second.get("Standardized Phone"), Some("not-a-phone"));
        assert_eq!(second.get("Standardized State"), Some("Ontario"));
        assert_eq!(second.get("Standardized Country"), Some("Narnia"));
        assert_eq!(second.get("Standardized Address"), Some(""));
    }

    #[test]
    fn cleanup_reader_projects_columns_first() {
        let columns = vec!["Phone".to_string(), "State".to_string()];
        let batch = cleanup_reader(
            Cursor::new(CONTACTS),
            Some(columns.as_slice()),
            &ContactNormalizer::default(),
        )
        .expect("cleanup succeeds");

        assert_eq!(
            batch.table.headers(),
            [
                "Phone",
                "State",
                "Standardized Phone",
                "State Abbreviation",
                "Standardized State"
            ]
        );
    }

    #[test]
    fn duplicate_columns_survive_cleanup() {
        let batch = cleanup_reader(
            Cursor::new("Phone,Phone\n111,222\n"),
            None,
            &ContactNormalizer::default(),
        )
        .expect("cleanup succeeds");

        let csv = batch.table.to_csv_string().expect("csv writes");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Phone,Phone.1,Standardized Phone"));
        let row = lines.next().expect("one row");
        assert!(row.starts_with("111,222,"), "{row}");
    }

    #[test]
    fn missing_projected_column_aborts_the_batch() {
        let columns = vec!["Fax".to_string()];
        let error = cleanup_reader(
            Cursor::new(CONTACTS),
            Some(columns.as_slice()),
            &ContactNormalizer::default(),
        )
        .expect_err("missing column");
        assert!(matches!(error, ContactImportError::MissingColumn(_)));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error =
            ContactImporter::from_path("./does-not-exist.csv").expect_err("expected io error");

        match error {
            ContactImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
