// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::common;

// Os cadastros genéricos (/api/orders, /api/master/*, /api/access/{users,groups})
// aparecem aqui só pelos schemas; as rotas seguem o mesmo formato para todos.
#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Access ---
        handlers::access::list_screens,
        handlers::access::get_matrix,
        handlers::access::toggle_permission,
        handlers::access::grant_all,
        handlers::access::revoke_all,

        // --- Planning ---
        handlers::planning::get_board,
        handlers::planning::assign,
        handlers::planning::unassign,
        handlers::planning::get_gantt,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
    ),
    components(
        schemas(
            // --- Listagem ---
            common::export::ExportFormat,
            handlers::crud::ColumnInfo,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::Order,
            models::orders::OrderDraft,

            // --- Master data ---
            models::master::Product,
            models::master::ProductDraft,
            models::master::MachineStatus,
            models::master::Machine,
            models::master::MachineDraft,
            models::master::BomLine,
            models::master::BomLineDraft,
            models::master::RoutingLine,
            models::master::RoutingLineDraft,
            models::master::Supplier,
            models::master::SupplierDraft,
            models::master::Warehouse,
            models::master::WarehouseDraft,

            // --- Access ---
            models::access::Screen,
            models::access::PermissionKind,
            models::access::PermissionFlags,
            models::access::Permission,
            models::access::MatrixRow,
            models::access::GroupMatrix,
            models::access::TogglePermissionPayload,
            models::access::User,
            models::access::UserDraft,
            models::access::Group,
            models::access::GroupDraft,
            models::access::MeResponse,

            // --- Auth ---
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Planning ---
            models::planning::ProductionLine,
            models::planning::BoardCard,
            models::planning::BoardSlot,
            models::planning::BoardLane,
            models::planning::PlanningBoard,
            models::planning::AssignPayload,
            models::planning::UnassignPayload,
            models::planning::GanttBar,
            models::planning::GanttView,

            // --- Dashboard / Settings ---
            models::dashboard::DashboardSummary,
            models::settings::CompanySettings,
            models::settings::UpdateSettingsRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Login sem senha e emissão de token"),
        (name = "Users", description = "Usuário logado e suas permissões"),
        (name = "Access", description = "Matriz de permissões grupo × tela"),
        (name = "Planning", description = "Quadro de programação e Gantt"),
        (name = "Dashboard", description = "Indicadores de pedidos e máquinas"),
        (name = "Settings", description = "Configurações da empresa")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
