use crate::config::AppConfig;
use crate::error::AppError;
use crate::server;
use crate::telemetry;
use crate::workflows::contacts::{
    BatchSummary, ContactImportError, ContactImporter, ContactNormalizer, NameCase,
    NormalizerOptions, OutputMode, PhoneFormat, PhoneRegion, TableView, TitleCatalog,
    PROCESSED_FILE_NAME,
};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "contact-cleanup",
    about = "Standardize contact lists from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Normalize a contact CSV file and write the processed copy
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OptionOverrides {
    /// Phone output format (national or e164)
    #[arg(long)]
    pub(crate) phone_format: Option<PhoneFormat>,
    /// Region assumed for numbers without a country code, or `none`
    #[arg(long)]
    pub(crate) phone_region: Option<PhoneRegion>,
    /// Casing applied to first and last names (capitalize or upper)
    #[arg(long)]
    pub(crate) name_case: Option<NameCase>,
    /// Append `Standardized <col>` columns or overwrite the originals
    #[arg(long)]
    pub(crate) output_mode: Option<OutputMode>,
    /// Job title catalog used for fuzzy matching (small or expanded)
    #[arg(long)]
    pub(crate) title_catalog: Option<TitleCatalog>,
    /// Keep the original title when the best match scores below this
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) title_min_score: Option<u8>,
    /// Leave the word `Address` untouched in normalized addresses
    #[arg(long)]
    pub(crate) no_street_label: bool,
}

impl OptionOverrides {
    pub(crate) fn apply(self, mut options: NormalizerOptions) -> NormalizerOptions {
        if let Some(format) = self.phone_format {
            options.phone_format = format;
        }
        if let Some(region) = self.phone_region {
            options.phone_region = region;
        }
        if let Some(case) = self.name_case {
            options.name_case = case;
        }
        if let Some(mode) = self.output_mode {
            options.output_mode = mode;
        }
        if let Some(catalog) = self.title_catalog {
            options.title_catalog = catalog;
        }
        if self.title_min_score.is_some() {
            options.title_min_score = self.title_min_score;
        }
        if self.no_street_label {
            options.street_label = false;
        }
        options
    }
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Contact CSV to read
    #[arg(long)]
    input: PathBuf,
    /// Destination for the processed CSV
    #[arg(long, default_value = PROCESSED_FILE_NAME)]
    output: PathBuf,
    /// Restrict the input to these columns before normalizing
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
    /// Number of rows to print from the original and processed tables
    #[arg(long, default_value_t = 5)]
    preview: usize,
    #[command(flatten)]
    overrides: OptionOverrides,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Normalize(args) => run_normalize(args),
    }
}

fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let NormalizeArgs {
        input,
        output,
        columns,
        preview,
        overrides,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let normalizer = ContactNormalizer::new(overrides.apply(config.normalizer));

    let original = ContactImporter::from_path(&input)?;
    let original = if columns.is_empty() {
        original
    } else {
        original.select(&columns)?
    };

    let batch = normalizer.normalize_table(&original);

    let file = File::create(&output)?;
    batch
        .table
        .write_csv(BufWriter::new(file))
        .map_err(ContactImportError::from)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = batch.summary.rows,
        "processed contact file"
    );

    render_summary(&batch.summary);
    if preview > 0 {
        render_table("Original data", &original.preview(preview));
        render_table("Processed data", &batch.table.preview(preview));
    }
    println!("\nWrote {}", output.display());

    Ok(())
}

fn render_summary(summary: &BatchSummary) {
    println!("Contact cleanup summary");
    println!(
        "Rows processed: {} (at {})",
        summary.rows,
        summary.processed_at.to_rfc3339()
    );

    if summary.fields.is_empty() {
        println!("No recognized contact columns found");
    }
    for (field, stats) in &summary.fields {
        println!(
            "- {}: {} normalized, {} kept as-is",
            field.column(),
            stats.normalized,
            stats.fallback
        );
    }

    if summary.valid_emails + summary.invalid_emails > 0 {
        println!(
            "Emails: {} valid, {} invalid",
            summary.valid_emails, summary.invalid_emails
        );
    }
}

fn render_table(title: &str, view: &TableView) {
    println!("\n{title}");
    println!("{}", view.headers.join(" | "));
    for row in &view.rows {
        println!("{}", row.join(" | "));
    }
}
