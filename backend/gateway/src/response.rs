//! HTTP rendering of scan outcomes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use pillscan_core::{ScanError, ScanReport};

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

/// A scan error on its way out of a handler.
#[derive(Debug)]
pub struct ScanFailure(pub ScanError);

impl From<ScanError> for ScanFailure {
    fn from(err: ScanError) -> Self {
        Self(err)
    }
}

pub fn status_for(err: &ScanError) -> StatusCode {
    match err {
        ScanError::MissingInput => StatusCode::BAD_REQUEST,
        ScanError::NoMatchFound { .. } | ScanError::LowConfidenceMatch { .. } => {
            StatusCode::NOT_FOUND
        }
        ScanError::ExtractionFailed(_) | ScanError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ScanFailure {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody {
            error: self.0.to_string(),
            extracted_text: self.0.extracted_text().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

/// `200` body: the report minus internal fields.
pub fn success(report: ScanReport) -> Response {
    (StatusCode::OK, Json(report)).into_response()
}
