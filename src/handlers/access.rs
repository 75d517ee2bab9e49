// src/handlers/access.rs
//
// Matriz de permissões por grupo. Editar a matriz só exige estar logado.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::access::{GroupMatrix, Permission, PermissionKind, Screen, TogglePermissionPayload},
};

// GET /api/access/screens
#[utoipa::path(
    get,
    path = "/api/access/screens",
    tag = "Access",
    responses((status = 200, description = "Telas da matriz, na ordem de exibição", body = [Screen])),
    security(("api_jwt" = []))
)]
pub async fn list_screens(_user: AuthenticatedUser) -> Json<Vec<Screen>> {
    Json(Screen::ALL.to_vec())
}

// GET /api/access/groups/{id}/permissions
#[utoipa::path(
    get,
    path = "/api/access/groups/{id}/permissions",
    tag = "Access",
    params(("id" = i64, Path, description = "ID do grupo")),
    responses((status = 200, description = "Uma linha por tela; células ausentes vêm todas falsas", body = GroupMatrix)),
    security(("api_jwt" = []))
)]
pub async fn get_matrix(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupMatrix>, ApiError> {
    let matrix = app_state
        .access_service
        .matrix(group_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(matrix))
}

// PUT /api/access/groups/{id}/permissions/{screen}/{kind}
#[utoipa::path(
    put,
    path = "/api/access/groups/{id}/permissions/{screen}/{kind}",
    tag = "Access",
    params(
        ("id" = i64, Path, description = "ID do grupo"),
        ("screen" = Screen, Path, description = "Tela"),
        ("kind" = PermissionKind, Path, description = "view | add | edit | delete")
    ),
    request_body = TogglePermissionPayload,
    responses((status = 200, description = "Célula gravada", body = Permission)),
    security(("api_jwt" = []))
)]
pub async fn toggle_permission(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path((group_id, screen, kind)): Path<(i64, Screen, PermissionKind)>,
    Json(payload): Json<TogglePermissionPayload>,
) -> Result<Json<Permission>, ApiError> {
    let permission = app_state
        .access_service
        .toggle(group_id, screen, kind, payload.value)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(permission))
}

// POST /api/access/groups/{id}/permissions/grant-all
#[utoipa::path(
    post,
    path = "/api/access/groups/{id}/permissions/grant-all",
    tag = "Access",
    params(("id" = i64, Path, description = "ID do grupo")),
    responses((status = 200, description = "Todas as telas liberadas", body = GroupMatrix)),
    security(("api_jwt" = []))
)]
pub async fn grant_all(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupMatrix>, ApiError> {
    let matrix = app_state
        .access_service
        .set_all(group_id, true)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(matrix))
}

// POST /api/access/groups/{id}/permissions/revoke-all
#[utoipa::path(
    post,
    path = "/api/access/groups/{id}/permissions/revoke-all",
    tag = "Access",
    params(("id" = i64, Path, description = "ID do grupo")),
    responses((status = 200, description = "Todas as telas bloqueadas", body = GroupMatrix)),
    security(("api_jwt" = []))
)]
pub async fn revoke_all(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupMatrix>, ApiError> {
    let matrix = app_state
        .access_service
        .set_all(group_id, false)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(matrix))
}
