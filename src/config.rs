// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;
use chrono::{NaiveDateTime, NaiveTime, Utc};

use crate::{
    common::{i18n::I18nStore, listing::Record},
    db::{
        seed::{self, SeedData},
        CrudRepository, MemoryTable, PlanningRepository, SettingsRepository,
    },
    models::{
        access::{Group, User},
        master::{BomLine, Machine, Product, RoutingLine, Supplier, Warehouse},
        orders::Order,
    },
    services::{
        access_service::AccessService, auth::AuthService, crud_service::CrudService,
        dashboard_service::DashboardService, planning_service::PlanningService,
    },
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub seed_demo_data: bool,
    pub planning_horizon_start: Option<NaiveDateTime>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(v) => v
                .parse::<i64>()
                .with_context(|| format!("TOKEN_TTL_HOURS inválido: {}", v))?,
            Err(_) => 12,
        };

        let seed_demo_data = match env::var("SEED_DEMO_DATA") {
            Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => true,
        };

        let planning_horizon_start = match env::var("PLANNING_HORIZON_START") {
            Ok(v) => Some(
                NaiveDateTime::parse_from_str(v.trim(), "%Y-%m-%dT%H:%M:%S")
                    .with_context(|| format!("PLANNING_HORIZON_START inválido: {}", v))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            token_ttl_hours,
            seed_demo_data,
            planning_horizon_start,
        })
    }

    /// Início do Gantt: o configurado, ou hoje às 06:00.
    pub fn horizon_start(&self) -> NaiveDateTime {
        self.planning_horizon_start.unwrap_or_else(|| {
            Utc::now()
                .date_naive()
                .and_time(NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default())
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub i18n_store: I18nStore,

    // --- Cadastros ---
    pub order_service: CrudService<Order>,
    pub product_service: CrudService<Product>,
    pub machine_service: CrudService<Machine>,
    pub bom_service: CrudService<BomLine>,
    pub routing_service: CrudService<RoutingLine>,
    pub supplier_service: CrudService<Supplier>,
    pub warehouse_service: CrudService<Warehouse>,
    pub user_service: CrudService<User>,
    pub group_service: CrudService<Group>,

    pub access_service: AccessService,
    pub auth_service: AuthService,
    pub planning_service: PlanningService,
    pub dashboard_service: DashboardService,
    pub settings_repo: SettingsRepository,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let seed = if config.seed_demo_data {
            tracing::info!("🌱 Carregando dados de demonstração");
            SeedData::demo()
        } else {
            SeedData::bootstrap()
        };
        Self::from_seed(config, seed)
    }

    // --- Monta o grafo de dependências ---
    pub fn from_seed(config: AppConfig, seed: SeedData) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;

        let order_service: CrudService<Order> = CrudService::new(table(seed.orders));
        let product_service: CrudService<Product> = CrudService::new(table(seed.products));
        let machine_service: CrudService<Machine> = CrudService::new(table(seed.machines));
        let user_service: CrudService<User> = CrudService::new(table(seed.users));

        let planning_repo = PlanningRepository::new(seed::production_lines());
        let planning_service = PlanningService::new(
            planning_repo.clone(),
            order_service.clone(),
            product_service.clone(),
            config.horizon_start(),
        );
        let dashboard_service =
            DashboardService::new(order_service.clone(), machine_service.clone(), planning_repo);
        let auth_service = AuthService::new(
            user_service.clone(),
            config.jwt_secret.clone(),
            config.token_ttl_hours,
        );

        Ok(Self {
            config: Arc::new(config),
            i18n_store,
            order_service,
            product_service,
            machine_service,
            bom_service: CrudService::new(table(seed.bom_lines)),
            routing_service: CrudService::new(table(seed.routings)),
            supplier_service: CrudService::new(table(seed.suppliers)),
            warehouse_service: CrudService::new(table(seed.warehouses)),
            user_service,
            group_service: CrudService::new(table(seed.groups)),
            access_service: AccessService::new(MemoryTable::new(seed.permissions)),
            auth_service,
            planning_service,
            dashboard_service,
            settings_repo: SettingsRepository::new(seed.settings),
        })
    }
}

fn table<T: Record>(rows: Vec<T>) -> Arc<dyn CrudRepository<T>> {
    Arc::new(MemoryTable::new(rows))
}
