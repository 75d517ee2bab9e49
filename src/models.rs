pub mod access;
pub mod auth;
pub mod dashboard;
pub mod master;
pub mod orders;
pub mod planning;
pub mod rules;
pub mod settings;

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::common::listing::Record;
use crate::models::access::Screen;

/// Um registro editável por formulário: o rascunho validado vira a linha.
pub trait Resource: Record {
    type Draft: Validate + DeserializeOwned + Send + Sync + 'static;

    /// Tela usada nas checagens de permissão
    const SCREEN: Screen;

    /// Nome curto para logs, mensagens e nome de arquivo exportado
    const LABEL: &'static str;

    fn from_draft(id: i64, draft: Self::Draft) -> Self;
}
