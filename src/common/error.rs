// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erro de domínio. Os services só conhecem este tipo; a tradução para HTTP
// acontece em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Filtro desconhecido: {0}")]
    UnknownFilter(String),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("JSON inválido")]
    InvalidImport,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão negada: {0}")]
    Forbidden(String),

    #[error("Linha {line} não produz {product}")]
    IncompatibleLine { line: String, product: String },

    #[error("Slot {slot} da linha {line} já está ocupado")]
    SlotOccupied { line: String, slot: usize },

    #[error("Pedido {0} não pode ser programado")]
    OrderNotSchedulable(String),

    #[error("Pedido {0} passa do fim do calendário")]
    ScheduleOutOfRange(String),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro de CSV: {0}")]
    CsvError(#[from] csv::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// O corpo de erro que vai para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    /// Converte o erro de domínio numa resposta HTTP já traduzida.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        let (status, key, args): (StatusCode, &str, Vec<(&str, String)>) = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            store.translate(lang, key, &[])
                        })
                        .collect();
                    details.insert(camel_case(&field.to_string()), messages);
                }
                return ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.translate(lang, "validation_failed", &[]),
                    details: Some(json!(details)),
                };
            }
            AppError::UnknownFilter(key) => (
                StatusCode::BAD_REQUEST,
                "unknown_filter",
                vec![("key", key.clone())],
            ),
            AppError::ResourceNotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                vec![("what", what.clone())],
            ),
            AppError::InvalidImport => (StatusCode::BAD_REQUEST, "invalid_json", vec![]),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", vec![])
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", vec![]),
            AppError::Forbidden(slug) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                vec![("permission", slug.clone())],
            ),
            AppError::IncompatibleLine { line, product } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "incompatible_line",
                vec![("line", line.clone()), ("product", product.clone())],
            ),
            AppError::SlotOccupied { line, slot } => (
                StatusCode::CONFLICT,
                "slot_occupied",
                vec![("line", line.clone()), ("slot", slot.to_string())],
            ),
            AppError::OrderNotSchedulable(order) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "order_not_schedulable",
                vec![("order", order.clone())],
            ),
            AppError::ScheduleOutOfRange(order) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "schedule_out_of_range",
                vec![("order", order.clone())],
            ),
            // Todos os outros erros viram 500. O `tracing` loga a mensagem detalhada.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", vec![])
            }
        };

        let args: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
        ApiError {
            status,
            error: store.translate(lang, key, &args),
            details: None,
        }
    }
}

// Os corpos JSON são camelCase; os detalhes usam o mesmo nome de campo.
// `__all__` (erros de schema do validator) fica como está.
fn camel_case(field: &str) -> String {
    if field.starts_with("__") {
        return field.to_string();
    }
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
