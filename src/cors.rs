use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DEVELOPMENT_ORIGINS: Vec<Regex> = [
        r"^https?://(localhost|127\.0\.0\.1|0\.0\.0\.0)(:\d+)?$",
        r"^https?://10\.\d+\.\d+\.\d+(:\d+)?$",
        r"^https?://172\.(1[6-9]|2\d|3[01])\.\d+\.\d+(:\d+)?$",
        r"^https?://192\.168\.\d+\.\d+(:\d+)?$",
        r"^https?://169\.254\.\d+\.\d+(:\d+)?$",
        r"^https?://[\d.]+:\d+$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
    static ref LOCALHOST_ORIGIN: Regex = Regex::new(r"^https?://localhost(:\d+)?$").unwrap();
}

/// Which browser origins may call the API.
#[derive(Debug, Clone, Default)]
pub struct CorsSettings {
    /// Origins allowed verbatim (`CORS_ALLOWED_ORIGINS`).
    pub allowed_origins: Vec<String>,
    /// Also allow localhost and private-network origins.
    pub development: bool,
}

impl CorsSettings {
    /// Parses a comma-separated origin list. `*` and empty entries are
    /// dropped; `*` alone yields an empty list.
    pub fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(String::from)
            .collect()
    }
}

pub fn is_allowed_origin(origin: &str, settings: &CorsSettings) -> bool {
    if settings.allowed_origins.iter().any(|allowed| allowed == origin) {
        return true;
    }
    if settings.development {
        return DEVELOPMENT_ORIGINS.iter().any(|re| re.is_match(origin));
    }
    // No explicit list in production: HTTPS origins and localhost only.
    settings.allowed_origins.is_empty()
        && (origin.starts_with("https://") || LOCALHOST_ORIGIN.is_match(origin))
}

pub fn build_cors(settings: CorsSettings) -> Cors {
    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            origin
                .to_str()
                .map(|origin| is_allowed_origin(origin, &settings))
                .unwrap_or(false)
        })
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH", "HEAD"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(86400)
}
