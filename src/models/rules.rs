// src/models/rules.rs
//
// Validações customizadas compartilhadas pelos formulários.
// O `code` do erro é a chave de tradução.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Campo obrigatório: só espaços conta como vazio, já que o valor é gravado aparado.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn must_be_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("must_be_positive"));
    }
    Ok(())
}

pub fn must_not_be_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("must_not_be_negative"));
    }
    Ok(())
}

pub fn percent_range(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percent_out_of_range"));
    }
    Ok(())
}

pub fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn opt_decimal(value: &Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}
