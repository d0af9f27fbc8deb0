use super::options::{PhoneFormat, PhoneRegion};
use super::outcome::{FallbackReason, FieldOutcome};
use phonenumber::Mode;
use tracing::debug;

/// Parses `raw` and renders it in `format`; unparseable input is returned as-is.
pub fn normalize_phone(raw: &str, format: PhoneFormat, region: PhoneRegion) -> FieldOutcome<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldOutcome::fallback(raw, FallbackReason::Empty);
    }

    let number = match phonenumber::parse(region.0, trimmed) {
        Ok(number) => number,
        Err(err) => {
            debug!(error = %err, %region, "phone number did not parse");
            return FieldOutcome::fallback(raw, FallbackReason::ParseFailure);
        }
    };

    let mode = match format {
        PhoneFormat::National => Mode::National,
        PhoneFormat::E164 => Mode::E164,
    };

    FieldOutcome::Transformed(number.format().mode(mode).to_string())
}
