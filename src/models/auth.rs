// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::rules::not_blank;

// Dados para login. Não há senha: o usuário só precisa existir e estar ativo.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(custom(function = "not_blank", message = "username_required"))]
    #[schema(example = "admin")]
    pub username: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // Subject (user_id)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}
