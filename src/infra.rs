use crate::workflows::contacts::ContactNormalizer;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    /// Normalizer built from the loaded configuration; requests may override it.
    pub(crate) normalizer: Arc<ContactNormalizer>,
}

/// Parses an optional query value through the option's `FromStr`; blank means unset.
pub(crate) fn deserialize_optional_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| value.parse::<T>().map_err(serde::de::Error::custom))
        .transpose()
}

/// Splits `A,B,C` into trimmed column names.
pub(crate) fn deserialize_column_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    let columns = opt.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|column| !column.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    });
    Ok(columns.filter(|columns| !columns.is_empty()))
}

/// Optional `0..=100` score; anything else is rejected.
pub(crate) fn deserialize_optional_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|raw| {
            raw.trim()
                .parse::<u8>()
                .ok()
                .filter(|score| *score <= 100)
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("'{raw}' is not a score between 0 and 100"))
                })
        })
        .transpose()
}
