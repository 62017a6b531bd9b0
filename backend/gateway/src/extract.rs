//! Label scan endpoint (`POST /extract_text`).
//!
//! Accepts a multipart form with an `image` file field and runs it through the
//! scan pipeline.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::response::{success, ErrorBody, ScanFailure};
use crate::server::GatewayState;

/// Multipart field carrying the label photo.
pub const IMAGE_FIELD: &str = "image";

/// Handler for `POST /extract_text`.
pub async fn extract_text(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    // A body that is not multipart at all has no image field either.
    let image = match multipart {
        Ok(multipart) => match read_image(multipart).await {
            Ok(image) => image,
            Err(resp) => return resp,
        },
        Err(rejection) => {
            warn!(%request_id, error = %rejection, "Request is not multipart");
            None
        }
    };

    if let Some(bytes) = &image {
        info!(%request_id, bytes = bytes.len(), "Received label image");
    }

    match state.pipeline.scan(request_id, image.as_deref()).await {
        Ok(report) => success(report),
        Err(err) => ScanFailure(err).into_response(),
    }
}

/// Pull the first `image` field out of the form, skipping any others.
async fn read_image(mut multipart: Multipart) -> Result<Option<Bytes>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(multipart_error(e)),
        };
        if field.name() == Some(IMAGE_FIELD) {
            return field.bytes().await.map(Some).map_err(multipart_error);
        }
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> Response {
    warn!(error = %err, "Malformed multipart body");
    (
        err.status(),
        Json(ErrorBody {
            error: err.body_text(),
            extracted_text: None,
        }),
    )
        .into_response()
}
