use super::ContactImportError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

/// One CSV row as an ordered column name to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    fields: Vec<(String, String)>,
}

impl ContactRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces the value of `column`, appending the column when it is new.
    pub fn set(&mut self, column: &str, value: String) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContactRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Header row plus records, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactTable {
    headers: Vec<String>,
    records: Vec<ContactRecord>,
}

/// Plain rows for display.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ContactTable {
    pub fn new(headers: Vec<String>, records: Vec<ContactRecord>) -> Self {
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }

    /// Keeps only `columns`, in the given order. Every column must exist.
    pub fn select(&self, columns: &[String]) -> Result<Self, ContactImportError> {
        if let Some(missing) = columns.iter().find(|column| !self.has_column(column)) {
            return Err(ContactImportError::MissingColumn(missing.clone()));
        }

        let records: Vec<ContactRecord> = self
            .records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| {
                        let value = record.get(column).unwrap_or_default();
                        (column.clone(), value.to_string())
                    })
                    .collect()
            })
            .collect();

        Ok(Self::new(columns.to_vec(), records))
    }

    fn row(&self, record: &ContactRecord) -> Vec<String> {
        self.headers
            .iter()
            .map(|header| record.get(header).unwrap_or_default().to_string())
            .collect()
    }

    pub fn view(&self) -> TableView {
        TableView {
            headers: self.headers.clone(),
            rows: self.records.iter().map(|record| self.row(record)).collect(),
        }
    }

    pub fn preview(&self, limit: usize) -> TableView {
        TableView {
            headers: self.headers.clone(),
            rows: self
                .records
                .iter()
                .take(limit)
                .map(|record| self.row(record))
                .collect(),
        }
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for record in &self.records {
            csv_writer.write_record(self.row(record))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ContactImportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Reads a header row and records; ragged rows are rejected by the CSV reader.
/// Only headers are trimmed. Cell values are kept exactly as written.
pub(crate) fn parse_table<R: Read>(reader: R) -> Result<ContactTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = unique_headers(
        csv_reader
            .headers()?
            .iter()
            .map(|header| header.trim_start_matches('\u{feff}').to_string()),
    );

    let mut records: Vec<ContactRecord> = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let record: ContactRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    Ok(ContactTable::new(headers, records))
}

/// Renames repeated headers to `Name.1`, `Name.2`, ... so every column stays addressable.
fn unique_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for header in raw {
        let mut name = header.clone();
        if seen.contains(&name) {
            let suffix = suffixes.entry(header.clone()).or_insert(0);
            while seen.contains(&name) {
                *suffix += 1;
                name = format!("{header}.{suffix}");
            }
        }
        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "FirstName,State,Phone\nada,ca,212.555.0100\ngrace, NY ,\n";

    #[test]
    fn parses_headers_and_keeps_values_verbatim() {
        let table = parse_table(Cursor::new(SAMPLE)).expect("parse");
        assert_eq!(table.headers(), ["FirstName", "State", "Phone"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].get("State"), Some(" NY "));
        assert_eq!(table.records()[1].get("Phone"), Some(""));
        assert_eq!(table.records()[0].get("Email"), None);
    }

    #[test]
    fn strips_byte_order_mark_from_first_header() {
        let table = parse_table(Cursor::new("\u{feff}Email\na@b.io\n")).expect("parse");
        assert!(table.has_column("Email"));
    }

    #[test]
    fn duplicate_headers_get_numeric_suffixes() {
        let table = parse_table(Cursor::new(" Phone ,Phone,Phone.1,Phone\n111,222,333,444\n"))
            .expect("parse");
        assert_eq!(table.headers(), ["Phone", "Phone.1", "Phone.1.1", "Phone.2"]);
        assert_eq!(table.view().rows[0], vec!["111", "222", "333", "444"]);
    }

    #[test]
    fn ragged_rows_fail_the_batch() {
        let error = parse_table(Cursor::new("A,B\n1,2\n3\n")).expect_err("ragged row");
        assert!(matches!(error.kind(), csv::ErrorKind::UnequalLengths { .. }));
    }

    #[test]
    fn select_projects_and_reports_missing_columns() {
        let table = parse_table(Cursor::new(SAMPLE)).expect("parse");
        let selected = table
            .select(&["Phone".to_string(), "FirstName".to_string()])
            .expect("columns exist");
        assert_eq!(selected.headers(), ["Phone", "FirstName"]);
        assert_eq!(selected.view().rows[0], vec!["212.555.0100", "ada"]);

        let error = table
            .select(&["Address".to_string()])
            .expect_err("missing column");
        assert!(matches!(error, ContactImportError::MissingColumn(column) if column == "Address"));
    }

    #[test]
    fn record_set_replaces_or_appends() {
        let mut record: ContactRecord = [("State", "ca")].into_iter().collect();
        record.set("State", "California".to_string());
        record.set("State Abbreviation", "CA".to_string());
        assert_eq!(
            record.columns().collect::<Vec<_>>(),
            vec!["State", "State Abbreviation"]
        );
        assert_eq!(record.get("State"), Some("California"));
    }

    #[test]
    fn writes_csv_in_header_order() {
        let table = parse_table(Cursor::new(SAMPLE)).expect("parse");
        let csv = table.to_csv_string().expect("write");
        assert_eq!(csv, "FirstName,State,Phone\nada,ca,212.555.0100\ngrace, NY ,\n");
        assert_eq!(table.preview(1).rows.len(), 1);
    }
}
