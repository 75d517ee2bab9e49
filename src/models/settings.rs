// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::rules::not_blank;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    #[schema(example = "Siam Precision Parts Co., Ltd.")]
    pub company_name: String,

    #[schema(example = "0105558000000")]
    pub tax_id: Option<String>,

    #[schema(example = "99/9 Moo 5, Bang Na, Bangkok")]
    pub address: Option<String>,

    #[schema(example = "+66 2 000 0000")]
    pub phone: Option<String>,

    #[schema(example = "planning@example.co.th")]
    pub email: Option<String>,

    #[schema(example = "Asia/Bangkok")]
    pub timezone: String,

    /// Tamanho de página padrão das listas
    #[schema(example = 10)]
    pub default_page_size: usize,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            tax_id: None,
            address: None,
            phone: None,
            email: None,
            timezone: "Asia/Bangkok".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            updated_at: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(custom(function = "not_blank", message = "company_name_required"))]
    #[schema(example = "Minha Fábrica")]
    pub company_name: String,

    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,

    #[validate(email(message = "email_invalid"))]
    pub email: Option<String>,

    pub timezone: Option<String>,

    #[validate(range(min = 1, max = 200, message = "page_size_range"))]
    pub default_page_size: Option<usize>,
}
