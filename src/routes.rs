use crate::error::AppError;
use crate::infra::{
    deserialize_column_list, deserialize_optional_option, deserialize_optional_score, AppState,
};
use crate::workflows::contacts::{
    BatchSummary, ContactImporter, ContactNormalizer, ContactTable, NameCase, NormalizedBatch,
    NormalizerOptions, OutputMode, PhoneFormat, PhoneRegion, TableView, TitleCatalog,
    PROCESSED_FILE_NAME,
};
use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Per-request overrides of the configured normalizer options.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NormalizeQuery {
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub(crate) phone_format: Option<PhoneFormat>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub(crate) phone_region: Option<PhoneRegion>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub(crate) name_case: Option<NameCase>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub(crate) output_mode: Option<OutputMode>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub(crate) title_catalog: Option<TitleCatalog>,
    #[serde(default, deserialize_with = "deserialize_optional_score")]
    pub(crate) title_min_score: Option<u8>,
    #[serde(default)]
    pub(crate) street_label: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_column_list")]
    pub(crate) columns: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) rows: Option<usize>,
}

impl NormalizeQuery {
    fn options(&self, base: &NormalizerOptions) -> NormalizerOptions {
        NormalizerOptions {
            phone_format: self.phone_format.unwrap_or(base.phone_format),
            phone_region: self.phone_region.unwrap_or(base.phone_region),
            name_case: self.name_case.unwrap_or(base.name_case),
            output_mode: self.output_mode.unwrap_or(base.output_mode),
            title_catalog: self.title_catalog.unwrap_or(base.title_catalog),
            title_min_score: self.title_min_score.or(base.title_min_score),
            street_label: self.street_label.unwrap_or(base.street_label),
        }
    }

    fn process(
        &self,
        state: &AppState,
        body: &[u8],
    ) -> Result<(ContactTable, NormalizedBatch), AppError> {
        let table = ContactImporter::from_reader(body)?;
        let table = match &self.columns {
            Some(columns) => table.select(columns)?,
            None => table,
        };

        let batch = if self.has_overrides() {
            ContactNormalizer::new(self.options(state.normalizer.options())).normalize_table(&table)
        } else {
            state.normalizer.normalize_table(&table)
        };
        Ok((table, batch))
    }

    fn has_overrides(&self) -> bool {
        self.phone_format.is_some()
            || self.phone_region.is_some()
            || self.name_case.is_some()
            || self.output_mode.is_some()
            || self.title_catalog.is_some()
            || self.title_min_score.is_some()
            || self.street_label.is_some()
    }
}

/// Parses and normalizes an upload on the blocking pool.
async fn process_upload(
    state: AppState,
    query: NormalizeQuery,
    body: Bytes,
) -> Result<(ContactTable, NormalizedBatch), AppError> {
    tokio::task::spawn_blocking(move || query.process(&state, &body))
        .await
        .map_err(|err| AppError::Server(axum::Error::new(err)))?
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) summary: BatchSummary,
    pub(crate) original: TableView,
    pub(crate) processed: TableView,
}

pub(crate) fn contact_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/contacts/normalize", post(normalize_endpoint))
        .route("/api/v1/contacts/preview", post(preview_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn normalize_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<NormalizeQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let (_, batch) = process_upload(state, query, body).await?;
    let csv = batch.table.to_csv_string()?;

    info!(
        rows = batch.summary.rows,
        fallbacks = batch.summary.fallbacks(),
        "served processed contacts"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{PROCESSED_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}

pub(crate) async fn preview_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<NormalizeQuery>,
    body: Bytes,
) -> Result<Json<PreviewResponse>, AppError> {
    let rows = query.rows.unwrap_or(DEFAULT_PREVIEW_ROWS);
    let (original, batch) = process_upload(state, query, body).await?;

    Ok(Json(PreviewResponse {
        original: original.preview(rows),
        processed: batch.table.preview(rows),
        summary: batch.summary,
    }))
}
