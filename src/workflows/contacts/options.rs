use phonenumber::country;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Target representation for parsed phone numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneFormat {
    /// `(XXX) XXX-XXXX` for North American numbers.
    #[default]
    National,
    /// `+<country code><subscriber digits>`.
    E164,
}

impl FromStr for PhoneFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "national" => Ok(Self::National),
            "e164" | "e.164" => Ok(Self::E164),
            other => Err(format!("unknown phone format '{other}' (expected national or e164)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    /// First character uppercased, the remainder lowercased.
    #[default]
    Capitalize,
    Upper,
}

impl FromStr for NameCase {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "capitalize" => Ok(Self::Capitalize),
            "upper" | "uppercase" => Ok(Self::Upper),
            other => Err(format!("unknown name case '{other}' (expected capitalize or upper)")),
        }
    }
}

/// Whether normalized values replace their source column or sit beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Append,
    Overwrite,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "append" | "append_standardized" => Ok(Self::Append),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!("unknown output mode '{other}' (expected append or overwrite)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleCatalog {
    Small,
    #[default]
    Expanded,
}

impl FromStr for TitleCatalog {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "expanded" => Ok(Self::Expanded),
            other => Err(format!("unknown title catalog '{other}' (expected small or expanded)")),
        }
    }
}

/// Default dialing region used when a number carries no `+<country code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneRegion(pub Option<country::Id>);

impl Default for PhoneRegion {
    fn default() -> Self {
        Self(Some(country::Id::US))
    }
}

impl FromStr for PhoneRegion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self(None));
        }

        trimmed
            .to_ascii_uppercase()
            .parse::<country::Id>()
            .map(|id| Self(Some(id)))
            .map_err(|_| format!("unknown phone region '{trimmed}'"))
    }
}

impl fmt::Display for PhoneRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id:?}"),
            None => write!(f, "none"),
        }
    }
}

/// Knobs that distinguished the historical revisions of the cleanup tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerOptions {
    pub phone_format: PhoneFormat,
    pub phone_region: PhoneRegion,
    pub name_case: NameCase,
    pub output_mode: OutputMode,
    pub title_catalog: TitleCatalog,
    /// Matches scoring below this are left as the original title.
    pub title_min_score: Option<u8>,
    /// Rewrite the literal word `Address` to `Street` in parsed addresses.
    pub street_label: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            phone_format: PhoneFormat::default(),
            phone_region: PhoneRegion::default(),
            name_case: NameCase::default(),
            output_mode: OutputMode::default(),
            title_catalog: TitleCatalog::default(),
            title_min_score: None,
            street_label: true,
        }
    }
}
