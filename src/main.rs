//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::handlers::crud::crud_routes;
use crate::middleware::auth::auth_guard;
use crate::models::{
    access::{Group, User},
    master::{BomLine, Machine, Product, RoutingLine, Supplier, Warehouse},
    orders::Order,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(config)?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Swagger em http://{}/swagger-ui", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let master_routes = Router::new()
        .nest("/products", crud_routes::<Product>())
        .nest("/machines", crud_routes::<Machine>())
        .nest("/bom-lines", crud_routes::<BomLine>())
        .nest("/routings", crud_routes::<RoutingLine>())
        .nest("/suppliers", crud_routes::<Supplier>())
        .nest("/warehouses", crud_routes::<Warehouse>());

    let access_routes = Router::new()
        .nest("/users", crud_routes::<User>())
        .nest("/groups", crud_routes::<Group>())
        .route("/screens", get(handlers::access::list_screens))
        .route(
            "/groups/{id}/permissions",
            get(handlers::access::get_matrix),
        )
        .route(
            "/groups/{id}/permissions/{screen}/{kind}",
            put(handlers::access::toggle_permission),
        )
        .route(
            "/groups/{id}/permissions/grant-all",
            post(handlers::access::grant_all),
        )
        .route(
            "/groups/{id}/permissions/revoke-all",
            post(handlers::access::revoke_all),
        );

    let planning_routes = Router::new()
        .route("/board", get(handlers::planning::get_board))
        .route("/board/assign", post(handlers::planning::assign))
        .route("/board/unassign", post(handlers::planning::unassign))
        .route("/gantt", get(handlers::planning::get_gantt));

    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/orders", crud_routes::<Order>())
        .nest("/api/master", master_routes)
        .nest("/api/access", access_routes)
        .nest("/api/planning", planning_routes)
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route(
            "/api/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::db::seed::SeedData;

    fn app() -> Router {
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".into(),
            jwt_secret: "segredo-de-teste".into(),
            token_ttl_hours: 1,
            seed_demo_data: true,
            planning_horizon_start: NaiveDate::from_ymd_opt(2024, 1, 8)
                .and_then(|d| d.and_hms_opt(6, 0, 0)),
        };
        build_router(AppState::from_seed(config, SeedData::demo()).unwrap())
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn login(app: &Router, username: &str) -> String {
        let response = send(
            app,
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "username": username }).to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn authed(method: &str, uri: &str, token: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
    }

    fn json_body(value: Value) -> Body {
        Body::from(value.to_string())
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = send(&app(), Request::get("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let response = send(&app(), Request::get("/api/orders").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn unknown_user_cannot_log_in() {
        let response = send(
            &app(),
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({ "username": "ghost" })))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_lists_filters_and_paginates_orders() {
        let app = app();
        let token = login(&app, "admin").await;

        let response = send(
            &app,
            authed("GET", "/api/orders?status=pending&pageSize=1&page=2", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        assert_eq!(page["total"], 2);
        assert_eq!(page["totalPages"], 2);
        assert_eq!(page["rows"][0]["id"], 4);
        assert_eq!(page["queryKey"], "q=&status=pending");
    }

    #[tokio::test]
    async fn unknown_filter_key_is_rejected() {
        let app = app();
        let token = login(&app, "admin").await;
        let response = send(
            &app,
            authed("GET", "/api/orders?colour=red", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validation_errors_are_translated() {
        let app = app();
        let token = login(&app, "admin").await;

        for order_number in ["", "   "] {
            let response = send(
                &app,
                authed("POST", "/api/orders", &token)
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::ACCEPT_LANGUAGE, "th-TH,th;q=0.9")
                    .body(json_body(
                        json!({ "orderNumber": order_number, "customerId": "CUST-001" }),
                    ))
                    .unwrap(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            let details = body["details"].as_object().unwrap();
            assert_eq!(details.len(), 1);
            assert_eq!(details["orderNumber"][0], "Order Number ห้ามว่าง");
        }

        // nada foi gravado
        let response = send(
            &app,
            authed("GET", "/api/orders", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(body_json(response).await["total"], 5);
    }

    #[tokio::test]
    async fn create_update_delete_round_trip() {
        let app = app();
        let token = login(&app, "admin").await;

        let response = send(
            &app,
            authed("POST", "/api/orders", &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({
                    "orderNumber": "ORD-9",
                    "customerId": "CUST-009",
                    "productCode": "FG-1002",
                    "quantity": 40
                })))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], 6);

        let response = send(
            &app,
            authed("PUT", "/api/orders/6", &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({
                    "orderNumber": "ORD-9",
                    "customerId": "CUST-009",
                    "quantity": 41,
                    "status": "released"
                })))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "released");

        let delete = || authed("DELETE", "/api/orders/6", &token).body(Body::empty()).unwrap();
        assert_eq!(send(&app, delete()).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(send(&app, delete()).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn planner_is_limited_by_the_permission_matrix() {
        let app = app();
        let planner = login(&app, "planner").await;
        let delete = || authed("DELETE", "/api/orders/1", &planner).body(Body::empty()).unwrap();

        let response = send(&app, delete()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("orders:delete"));

        // Qualquer usuário logado edita a matriz
        let response = send(
            &app,
            authed("PUT", "/api/access/groups/2/permissions/orders/delete", &planner)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({ "value": true })))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["canDelete"], true);

        assert_eq!(send(&app, delete()).await.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn me_lists_granted_permissions() {
        let app = app();
        let token = login(&app, "planner").await;
        let response = send(&app, authed("GET", "/api/users/me", &token).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let me = body_json(response).await;
        assert_eq!(me["username"], "planner");
        let permissions: Vec<&str> = me["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(permissions.contains(&"orders:view"));
        assert!(permissions.contains(&"planning:edit"));
        assert!(!permissions.contains(&"orders:delete"));
    }

    #[tokio::test]
    async fn import_reports_invalid_json() {
        let app = app();
        let token = login(&app, "admin").await;
        let response = send(
            &app,
            authed("POST", "/api/master/warehouses/import", &token)
                .body(Body::from("[{ broken"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid JSON");
    }

    #[tokio::test]
    async fn csv_export_has_header_row_and_attachment_name() {
        let app = app();
        let token = login(&app, "admin").await;
        let response = send(
            &app,
            authed("GET", "/api/orders/export?format=csv", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"order.csv\""
        );
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(text.starts_with("ID,Order Number,Customer"));
        assert_eq!(text.lines().count(), 6);
    }

    #[tokio::test]
    async fn planning_board_enforces_compatibility() {
        let app = app();
        let token = login(&app, "planner").await;

        let assign = |line: &str| {
            authed("POST", "/api/planning/board/assign", &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({ "orderId": 1, "lineCode": line, "slotIndex": 0 })))
                .unwrap()
        };

        assert_eq!(
            send(&app, assign("LINE-B")).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let response = send(&app, assign("LINE-A")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let board = body_json(response).await;
        assert_eq!(board["lanes"][0]["slots"][0]["card"]["orderId"], 1);

        let response = send(
            &app,
            authed("GET", "/api/planning/gantt?pxPerHour=60", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let gantt = body_json(response).await;
        assert_eq!(gantt["bars"][0]["widthPx"], 750.0);
    }

    #[tokio::test]
    async fn settings_update_requires_settings_edit() {
        let app = app();
        let update = |token: &str| {
            authed("PUT", "/api/settings", token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({ "companyName": "Acme", "defaultPageSize": 2 })))
                .unwrap()
        };

        let planner = login(&app, "planner").await;
        assert_eq!(send(&app, update(&planner)).await.status(), StatusCode::FORBIDDEN);

        let admin = login(&app, "admin").await;
        assert_eq!(send(&app, update(&admin)).await.status(), StatusCode::OK);

        // o novo tamanho de página vale para as listas
        let response = send(&app, authed("GET", "/api/orders", &admin).body(Body::empty()).unwrap()).await;
        let page = body_json(response).await;
        assert_eq!(page["pageSize"], 2);
        assert_eq!(page["rows"].as_array().unwrap().len(), 2);
    }
}
