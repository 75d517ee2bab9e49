// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

pub const SUPPORTED_LANGS: &[&str] = &["en", "th"];
const DEFAULT_LANG: &str = "en";

// Idioma da resposta, vindo do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    /// Primeiro idioma do cabeçalho que temos catálogo ("th-TH" -> "th").
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let lang = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str).into_iter().find_map(|tag| {
                    let primary = tag.split('-').next().unwrap_or(&tag).to_lowercase();
                    SUPPORTED_LANGS
                        .iter()
                        .find(|lang| **lang == primary)
                        .map(|lang| lang.to_string())
                })
            })
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
