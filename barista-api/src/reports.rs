use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use barista_export::{render_orders_csv, render_orders_pdf, render_summary_csv, CsvExporter, PdfExporter};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reports/orders.csv", get(orders_csv))
        .route("/api/reports/summary.csv", get(summary_csv))
        .route("/api/reports/orders.pdf", get(orders_pdf))
        .route("/api/reports/export", post(export_reports))
}

/// GET /api/reports/orders.csv
async fn orders_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = state.service.list_orders().await;
    let report = render_orders_csv(&orders)?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], report))
}

/// GET /api/reports/summary.csv
async fn summary_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = state.service.list_orders().await;
    let report = render_summary_csv(&orders)?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], report))
}

/// GET /api/reports/orders.pdf
async fn orders_pdf(State(state): State<AppState>) -> impl IntoResponse {
    let orders = state.service.list_orders().await;
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        render_orders_pdf(&orders),
    )
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub files: Vec<String>,
}

/// POST /api/reports/export
/// Write report files into the configured reports directory
async fn export_reports(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<(StatusCode, Json<ExportResponse>), AppError> {
    let orders = state.service.list_orders().await;

    let files = match req.format {
        ExportFormat::Csv => {
            let exporter = CsvExporter::new(&state.reports.dir)?;
            vec![
                exporter.export_orders(&orders)?,
                exporter.export_summary(&orders)?,
            ]
        }
        ExportFormat::Pdf => {
            let exporter = PdfExporter::new(&state.reports.dir)?;
            vec![exporter.export_orders(&orders)?]
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ExportResponse {
            files: files
                .into_iter()
                .map(|path| path.display().to_string())
                .collect(),
        }),
    ))
}
