use anyhow::anyhow;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Local;
use serde::Deserialize;
use tracing::{info, warn};

use crate::canvas::PdfCanvas;
use crate::errors::AppError;
use crate::report::images::decode_image;
use crate::report::model::{
    ChartSource, CompetitorRecord, Currency, PropertyFacts, ValuationMetrics,
};
use crate::report::ReportInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub property: PropertyFacts,
    #[serde(default)]
    pub metrics: ValuationMetrics,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub competitors: Vec<CompetitorRecord>,
    /// Pre-rendered revenue chart. Takes precedence over the distribution.
    #[serde(default)]
    pub chart_png_base64: Option<String>,
    /// Twelve monthly shares, January first.
    #[serde(default)]
    pub monthly_revenue_distribution: Option<Vec<Option<f64>>>,
}

impl ReportRequest {
    /// Validates the request and converts it into engine input.
    ///
    /// A chart that is valid base64 but not a decodable image is dropped with a
    /// warning; the monthly distribution is used instead when present. Decoding
    /// runs on the blocking pool.
    pub async fn into_input(self) -> Result<ReportInput, AppError> {
        validate_metrics(&self.metrics)?;

        let bitmap = match self.chart_png_base64.as_deref().map(str::trim) {
            Some(encoded) if !encoded.is_empty() => {
                let raw = STANDARD.decode(encoded).map_err(|e| {
                    AppError::Validation(format!("chart_png_base64 is not valid base64: {e}"))
                })?;
                let decoded = tokio::task::spawn_blocking(move || decode_image(&raw))
                    .await
                    .map_err(|e| AppError::Internal(anyhow!("chart decode task failed: {e}")))?;
                match decoded {
                    Ok(image) => Some(image),
                    Err(e) => {
                        warn!("Chart image could not be decoded, ignoring it: {e}");
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(ReportInput {
            property: self.property,
            metrics: self.metrics,
            currency: self.currency,
            competitors: self.competitors,
            chart: ChartSource {
                bitmap,
                monthly_distribution: self.monthly_revenue_distribution,
            },
        })
    }
}

fn validate_metrics(metrics: &ValuationMetrics) -> Result<(), AppError> {
    if let Some(occupancy) = metrics.occupancy {
        if !occupancy.is_finite() || !(0.0..=1.0).contains(&occupancy) {
            return Err(AppError::Validation(format!(
                "occupancy must be a fraction between 0 and 1, got {occupancy}"
            )));
        }
    }
    if let Some(rate) = metrics.average_daily_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(AppError::Validation(format!(
                "average_daily_rate must be non-negative, got {rate}"
            )));
        }
    }
    Ok(())
}

/// POST /api/v1/reports
/// Renders the valuation report and returns it as a PDF attachment.
pub async fn handle_create_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Response, AppError> {
    let input = req.into_input().await?;
    let assembler = &state.assembler;

    let canvas = PdfCanvas::new(&assembler.config().geometry);
    let generated_at = Local::now().naive_local();
    let report = assembler.generate(&input, canvas, generated_at).await?;

    info!(
        file = %report.file_name,
        pages = report.page_count,
        competitors = input.competitors.len(),
        "Report served"
    );

    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}
