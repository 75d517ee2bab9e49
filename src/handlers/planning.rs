// src/handlers/planning.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermPlanningEdit, PermPlanningView, RequirePermission},
    },
    models::planning::{AssignPayload, GanttQuery, GanttView, PlanningBoard, UnassignPayload},
};

// GET /api/planning/board
#[utoipa::path(
    get,
    path = "/api/planning/board",
    tag = "Planning",
    responses(
        (status = 200, description = "Linhas, slots e backlog", body = PlanningBoard),
        (status = 403, description = "Sem a permissão planning:view")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_board(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermPlanningView>,
) -> Result<Json<PlanningBoard>, ApiError> {
    let board = app_state
        .planning_service
        .board()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(board))
}

// POST /api/planning/board/assign
#[utoipa::path(
    post,
    path = "/api/planning/board/assign",
    tag = "Planning",
    request_body = AssignPayload,
    responses(
        (status = 200, description = "Quadro atualizado", body = PlanningBoard),
        (status = 404, description = "Pedido, linha ou slot inexistente"),
        (status = 409, description = "Slot ocupado por outro pedido"),
        (status = 422, description = "Linha incompatível ou pedido fechado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermPlanningEdit>,
    Json(payload): Json<AssignPayload>,
) -> Result<Json<PlanningBoard>, ApiError> {
    let board = app_state
        .planning_service
        .assign(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(board))
}

// POST /api/planning/board/unassign
#[utoipa::path(
    post,
    path = "/api/planning/board/unassign",
    tag = "Planning",
    request_body = UnassignPayload,
    responses(
        (status = 200, description = "Pedido de volta ao backlog", body = PlanningBoard)
    ),
    security(("api_jwt" = []))
)]
pub async fn unassign(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermPlanningEdit>,
    Json(payload): Json<UnassignPayload>,
) -> Result<Json<PlanningBoard>, ApiError> {
    let board = app_state
        .planning_service
        .unassign(payload.order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(board))
}

// GET /api/planning/gantt?pxPerHour=&scrollLeft=&zoom=&cursorX=
#[utoipa::path(
    get,
    path = "/api/planning/gantt",
    tag = "Planning",
    params(
        ("pxPerHour" = Option<f64>, Query, description = "Escala (4..480 px/h)"),
        ("scrollLeft" = Option<f64>, Query, description = "Scroll horizontal em px"),
        ("zoom" = Option<f64>, Query, description = "Fator de zoom"),
        ("cursorX" = Option<f64>, Query, description = "Âncora do zoom em px")
    ),
    responses(
        (status = 200, description = "Barras e viewport resultante", body = GanttView)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_gantt(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermPlanningView>,
    Query(query): Query<GanttQuery>,
) -> Result<Json<GanttView>, ApiError> {
    let view = app_state
        .planning_service
        .gantt(query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}
