use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::TimeSec;
use crate::error::AppError;
use crate::report;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub overtime: Option<bool>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
}

fn parse_format(raw: Option<&str>) -> Result<OutputFormat, AppError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("json") => Ok(OutputFormat::Json),
        Some("csv") => Ok(OutputFormat::Csv),
        Some(_) => Err(AppError::BadRequest("format must be json or csv".to_string())),
    }
}

pub async fn get_points(
    Query(params): Query<PointsQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let start = params
        .start
        .map(TimeSec::new)
        .ok_or_else(|| AppError::BadRequest("start is required".to_string()))?;
    let end = params
        .end
        .map(TimeSec::new)
        .ok_or_else(|| AppError::BadRequest("end is required".to_string()))?;
    if start > end {
        return Err(AppError::BadRequest("start must be <= end".to_string()));
    }
    let format = parse_format(params.format.as_deref())?;

    let report = state.pipeline.run(start, end, params.overtime).await?;

    match format {
        OutputFormat::Json => Ok(Json(report).into_response()),
        OutputFormat::Csv => {
            let body = report::to_csv(&report.results)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::HeaderName::from_static("x-points-digest"), report.digest),
                ],
                body,
            )
                .into_response())
        }
    }
}
