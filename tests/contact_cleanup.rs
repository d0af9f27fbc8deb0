use contact_cleanup::workflows::contacts::{
    cleanup_reader, normalize_state, ContactField, ContactImportError, ContactImporter,
    ContactNormalizer, FallbackReason, NameCase, NormalizerOptions, OutputMode, PhoneFormat,
    EMAIL_VALID_COLUMN, STATE_ABBREVIATION_COLUMN,
};
use std::io::Cursor;
use std::path::PathBuf;

const CONTACTS: &str = "\
FirstName,LastName,Email,Phone,State,Country,Job Title,Address
ada,LOVELACE,Ada@Example.com,212.555.0100,ny,UK,Data Scientst,\"123 Main St, Springfield, IL 62704\"
grace,hopper,grace@navy,not-a-phone,Ontario,Narnia,Chief Wizard,
alan,turing,alan@bletchley.org.uk,(415) 555-0132,california,USA,product manager,
";

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("contact-cleanup-{}-{name}", std::process::id()))
}

#[test]
fn file_round_trip_keeps_originals_and_adds_standardized_columns() {
    let input = scratch_path("input.csv");
    let output = scratch_path("processed.csv");
    std::fs::write(&input, CONTACTS).expect("write input fixture");

    let table = ContactImporter::from_path(&input).expect("input parses");
    let batch = ContactNormalizer::default().normalize_table(&table);
    let file = std::fs::File::create(&output).expect("create output");
    batch.table.write_csv(file).expect("write output");

    let processed = ContactImporter::from_path(&output).expect("output parses");
    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&output).ok();

    assert_eq!(processed.len(), 3);
    assert_eq!(&processed.headers()[..8], table.headers());
    assert!(processed.has_column(STATE_ABBREVIATION_COLUMN));
    assert!(processed.has_column(EMAIL_VALID_COLUMN));

    let alan = &processed.records()[2];
    assert_eq!(alan.get("Phone"), Some("(415) 555-0132"));
    assert_eq!(alan.get("Standardized Phone"), Some("(415) 555-0132"));
    assert_eq!(alan.get("Standardized State"), Some("California"));
    assert_eq!(alan.get(STATE_ABBREVIATION_COLUMN), Some("CA"));
    assert_eq!(alan.get("Standardized Country"), Some("United States"));
    assert_eq!(alan.get("Standardized Job Title"), Some("Product Manager"));
    assert_eq!(alan.get(EMAIL_VALID_COLUMN), Some("True"));
}

#[test]
fn overwrite_mode_replaces_source_columns() {
    let normalizer = ContactNormalizer::new(NormalizerOptions {
        phone_format: PhoneFormat::E164,
        name_case: NameCase::Upper,
        output_mode: OutputMode::Overwrite,
        ..NormalizerOptions::default()
    });

    let batch = cleanup_reader(Cursor::new(CONTACTS), None, &normalizer).expect("cleanup succeeds");
    let ada = &batch.table.records()[0];

    assert_eq!(ada.get("FirstName"), Some("ADA"));
    assert_eq!(ada.get("LastName"), Some("LOVELACE"));
    assert_eq!(ada.get("Phone"), Some("+12125550100"));
    assert_eq!(ada.get("State"), Some("New York"));
    assert_eq!(ada.get(STATE_ABBREVIATION_COLUMN), Some("NY"));
    assert_eq!(ada.get("Email"), Some("Ada@Example.com"));
    assert_eq!(ada.get("Job Title"), Some("Data Scientst"));
    assert_eq!(ada.get("Standardized Job Title"), Some("Data Scientist"));
    assert!(ada.get("Standardized Phone").is_none());
}

#[test]
fn summary_counts_fallbacks_per_field() {
    let batch = cleanup_reader(Cursor::new(CONTACTS), None, &ContactNormalizer::default())
        .expect("cleanup succeeds");
    let summary = &batch.summary;

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.valid_emails, 2);
    assert_eq!(summary.invalid_emails, 1);

    let phone = summary.fields[&ContactField::Phone];
    assert_eq!((phone.normalized, phone.fallback), (2, 1));
    let country = summary.fields[&ContactField::Country];
    assert_eq!((country.normalized, country.fallback), (2, 1));
    let address = summary.fields[&ContactField::Address];
    assert_eq!((address.normalized, address.fallback), (1, 2));
}

#[test]
fn weak_title_matches_keep_the_original_when_threshold_set() {
    let strict = ContactNormalizer::new(NormalizerOptions {
        title_min_score: Some(95),
        ..NormalizerOptions::default()
    });
    let batch = cleanup_reader(Cursor::new(CONTACTS), None, &strict).expect("cleanup succeeds");
    let grace = &batch.table.records()[1];
    assert_eq!(grace.get("Standardized Job Title"), Some("Chief Wizard"));

    let outcome = contact_cleanup::workflows::contacts::normalize_job_title(
        "Chief Wizard",
        &["Chief Executive Officer", "Data Scientist"],
        Some(95),
    );
    assert_eq!(outcome.reason(), Some(FallbackReason::WeakMatch));
}

#[test]
fn state_columns_are_stable_under_reprocessing() {
    let batch = cleanup_reader(Cursor::new(CONTACTS), None, &ContactNormalizer::default())
        .expect("cleanup succeeds");

    for record in batch.table.records() {
        let abbreviation = record
            .get(STATE_ABBREVIATION_COLUMN)
            .expect("abbreviation column present");
        let full_name = record.get("Standardized State").expect("state column present");
        let again = normalize_state(abbreviation);
        assert_eq!(again.abbreviation, abbreviation);
        assert_eq!(again.full_name, full_name);
    }
}

#[test]
fn ragged_rows_abort_the_batch() {
    let error = cleanup_reader(
        Cursor::new("FirstName,Phone\nada,212.555.0100,extra\n"),
        None,
        &ContactNormalizer::default(),
    )
    .expect_err("ragged row rejected");
    assert!(matches!(error, ContactImportError::Csv(_)));
}
