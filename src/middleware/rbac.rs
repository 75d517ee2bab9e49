// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::access::{PermissionKind, Screen},
};

/// Consulta a matriz do grupo do usuário. Usado direto pelos handlers genéricos,
/// onde a tela vem do tipo do registro.
pub async fn ensure_permission(
    app_state: &AppState,
    user: &AuthenticatedUser,
    screen: Screen,
    kind: PermissionKind,
) -> Result<(), AppError> {
    let allowed = app_state
        .access_service
        .allows(user.0.group_id, screen, kind)
        .await?;

    if !allowed {
        let slug = format!("{}:{}", screen.as_str(), kind.as_str());
        tracing::warn!("⛔ {} sem a permissão {}", user.0.username, slug);
        return Err(AppError::Forbidden(slug));
    }
    Ok(())
}

/// O que é uma permissão: uma célula (tela, tipo) da matriz
pub trait PermissionDef: Send + Sync + 'static {
    fn screen() -> Screen;
    fn kind() -> PermissionKind;
}

/// O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        ensure_permission(&app_state, &user, T::screen(), T::kind())
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermDashboardView;
impl PermissionDef for PermDashboardView {
    fn screen() -> Screen { Screen::Dashboard }
    fn kind() -> PermissionKind { PermissionKind::View }
}

pub struct PermPlanningView;
impl PermissionDef for PermPlanningView {
    fn screen() -> Screen { Screen::Planning }
    fn kind() -> PermissionKind { PermissionKind::View }
}

pub struct PermPlanningEdit;
impl PermissionDef for PermPlanningEdit {
    fn screen() -> Screen { Screen::Planning }
    fn kind() -> PermissionKind { PermissionKind::Edit }
}

pub struct PermSettingsView;
impl PermissionDef for PermSettingsView {
    fn screen() -> Screen { Screen::Settings }
    fn kind() -> PermissionKind { PermissionKind::View }
}

pub struct PermSettingsEdit;
impl PermissionDef for PermSettingsEdit {
    fn screen() -> Screen { Screen::Settings }
    fn kind() -> PermissionKind { PermissionKind::Edit }
}
