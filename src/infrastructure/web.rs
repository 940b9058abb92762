use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::http::{header, Method};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{errors::AppError, settings::AppConfig};

// Room for the text parts sent alongside the image
const FORM_TEXT_ALLOWANCE: usize = 256 * 1024;

/// CORS policy from `cors_allowed_origins`; `*` allows any origin.
pub fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();

    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Size limits for multipart project forms; errors render as `AppError`.
pub fn multipart_config(config: &AppConfig) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .memory_limit(config.max_image_bytes + FORM_TEXT_ALLOWANCE)
        .total_limit(config.max_image_bytes + FORM_TEXT_ALLOWANCE)
        .error_handler(|err, _req| AppError::from(err).into())
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` filter; production logs are JSON.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt().with_env_filter(filter).with_target(true);

    let result = if config.is_production() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {}", e);
    }
}
