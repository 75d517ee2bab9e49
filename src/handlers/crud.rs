// src/handlers/crud.rs
//
// Handlers genéricos de cadastro. Cada tipo de registro só diz de onde vem o
// seu service; rotas, permissões e respostas são as mesmas para todos.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::{
        error::{ApiError, AppError},
        export::ExportFormat,
        listing::{ListQuery, Page},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::ensure_permission},
    models::{
        access::{Group, PermissionKind, User},
        master::{BomLine, Machine, Product, RoutingLine, Supplier, Warehouse},
        orders::Order,
        Resource,
    },
    services::crud_service::CrudService,
};

#[async_trait]
pub trait Routable: Resource {
    fn service(app_state: &AppState) -> &CrudService<Self>;

    /// `true` se a linha existia e foi excluída.
    async fn remove(app_state: &AppState, id: i64) -> Result<bool, AppError> {
        Self::service(app_state).delete(id).await
    }
}

impl Routable for Order {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.order_service
    }
}

impl Routable for Product {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.product_service
    }
}

impl Routable for Machine {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.machine_service
    }
}

impl Routable for BomLine {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.bom_service
    }
}

impl Routable for RoutingLine {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.routing_service
    }
}

impl Routable for Supplier {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.supplier_service
    }
}

impl Routable for Warehouse {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.warehouse_service
    }
}

impl Routable for User {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.user_service
    }
}

#[async_trait]
impl Routable for Group {
    fn service(app_state: &AppState) -> &CrudService<Self> {
        &app_state.group_service
    }

    // Sem isso um grupo novo que reaproveite o id herdaria a matriz do antigo
    async fn remove(app_state: &AppState, id: i64) -> Result<bool, AppError> {
        app_state
            .access_service
            .delete_group(&app_state.group_service, id)
            .await
    }
}

/// `GET|POST /`, `GET|PUT|DELETE /{id}`, `GET /export`, `POST /import`, `GET /columns`
pub fn crud_routes<T: Routable>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/export", get(export::<T>))
        .route("/import", post(import::<T>))
        .route("/columns", get(columns::<T>))
        .route(
            "/{id}",
            get(get_one::<T>).put(update::<T>).delete(delete::<T>),
        )
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ColumnInfo {
    pub key: String,
    pub header: String,
}

// GET /
pub async fn list<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<T>>, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::View)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = app_state
        .settings_repo
        .get_settings()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let query = ListQuery::from_params(&params, settings.default_page_size, T::filter_keys())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let page = T::service(&app_state)
        .list(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// GET /{id}
pub async fn get_one<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<T>, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::View)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let record = T::service(&app_state)
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(record))
}

// POST /
pub async fn create<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(draft): Json<T::Draft>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::Add)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let saved = T::service(&app_state)
        .save(None, draft)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(saved.record)))
}

// PUT /{id}
pub async fn update<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(draft): Json<T::Draft>,
) -> Result<Json<T>, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::Edit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let saved = T::service(&app_state)
        .save(Some(id), draft)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(saved.record))
}

// DELETE /{id}
pub async fn delete<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::Delete)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let removed = T::remove(&app_state, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if !removed {
        return Err(AppError::ResourceNotFound(format!("{} {}", T::LABEL, id))
            .to_api_error(&locale, &app_state.i18n_store));
    }

    Ok(StatusCode::NO_CONTENT)
}

// GET /export?format=json|csv
pub async fn export<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::View)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let file = T::service(&app_state)
        .export(params.format)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    ))
}

// POST /import  (corpo: array JSON de rascunhos)
pub async fn import<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::Add)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let inserted = T::service(&app_state)
        .import(&body)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(inserted)))
}

// GET /columns
pub async fn columns<T: Routable>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Json<Vec<ColumnInfo>>, ApiError> {
    ensure_permission(&app_state, &user, T::SCREEN, PermissionKind::View)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(
        T::columns()
            .iter()
            .map(|c| ColumnInfo {
                key: c.key.to_string(),
                header: c.header.to_string(),
            })
            .collect(),
    ))
}
