use actix_web::{error::JsonPayloadError, web};

use crate::errors::AppError;

/// Malformed JSON bodies get the same error envelope as every other failure.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        json_payload_error(err).into()
    }));
}

fn json_payload_error(err: JsonPayloadError) -> AppError {
    match err {
        JsonPayloadError::ContentType => {
            AppError::InvalidInput("Request must be application/json".to_string())
        }
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            AppError::PayloadTooLarge("JSON body is too large".to_string())
        }
        other => AppError::InvalidInput(format!("JSON payload error: {}", other)),
    }
}
