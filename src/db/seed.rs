// src/db/seed.rs
//
// Dados de demonstração carregados na inicialização (SEED_DEMO_DATA=true).

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::{
    access::{Group, Permission, PermissionFlags, Screen, User},
    master::{BomLine, Machine, MachineStatus, Product, RoutingLine, Supplier, Warehouse},
    orders::{Order, OrderStatus},
    planning::ProductionLine,
    settings::CompanySettings,
};

pub const ADMIN_GROUP_ID: i64 = 1;
pub const PLANNER_GROUP_ID: i64 = 2;

#[derive(Default)]
pub struct SeedData {
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub machines: Vec<Machine>,
    pub bom_lines: Vec<BomLine>,
    pub routings: Vec<RoutingLine>,
    pub suppliers: Vec<Supplier>,
    pub warehouses: Vec<Warehouse>,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub permissions: Vec<Permission>,
    pub settings: Option<CompanySettings>,
}

impl SeedData {
    /// Só o mínimo para alguém conseguir entrar: grupo admin com tudo liberado.
    pub fn bootstrap() -> Self {
        Self {
            users: vec![user(1, "admin", "Administrator", ADMIN_GROUP_ID)],
            groups: vec![Group {
                group_id: ADMIN_GROUP_ID,
                name: "Administrators".into(),
                description: Some("Full access".into()),
            }],
            permissions: full_access(ADMIN_GROUP_ID, 1),
            ..Default::default()
        }
    }

    pub fn demo() -> Self {
        let today = Utc::now().date_naive();
        let mut seed = Self::bootstrap();

        seed.users.push(user(2, "planner", "Production Planner", PLANNER_GROUP_ID));
        seed.users.push(User {
            is_active: false,
            ..user(3, "former", "Former Employee", PLANNER_GROUP_ID)
        });
        seed.groups.push(Group {
            group_id: PLANNER_GROUP_ID,
            name: "Planners".into(),
            description: Some("Orders and planning board".into()),
        });
        let next = seed.permissions.len() as i64 + 1;
        seed.permissions.extend([
            Permission {
                permission_id: next,
                group_id: PLANNER_GROUP_ID,
                screen: Screen::Orders,
                flags: PermissionFlags {
                    can_view: true,
                    can_add: true,
                    can_edit: true,
                    can_delete: false,
                },
            },
            Permission {
                permission_id: next + 1,
                group_id: PLANNER_GROUP_ID,
                screen: Screen::Planning,
                flags: PermissionFlags {
                    can_view: true,
                    can_add: false,
                    can_edit: true,
                    can_delete: false,
                },
            },
            Permission {
                permission_id: next + 2,
                group_id: PLANNER_GROUP_ID,
                screen: Screen::Products,
                flags: PermissionFlags {
                    can_view: true,
                    ..PermissionFlags::default()
                },
            },
        ]);

        seed.orders = vec![
            order(1, "ORD-2024-001", "CUST-001", "FG-1001", 500, today + Duration::days(3), OrderStatus::Pending),
            order(2, "ORD-2024-002", "CUST-002", "FG-1002", 120, today - Duration::days(2), OrderStatus::Completed),
            order(3, "ORD-2024-003", "CUST-001", "FG-2001", 80, today + Duration::days(5), OrderStatus::Released),
            order(4, "ORD-2024-004", "CUST-003", "FG-1001", 300, today + Duration::days(12), OrderStatus::Pending),
            order(5, "ORD-2024-005", "CUST-004", "FG-2002", 60, today + Duration::days(1), OrderStatus::Cancelled),
        ];

        seed.products = vec![
            product(1, "FG-1001", "Mounting Bracket A", "FG", "PCS", Decimal::new(15, 1)),
            product(2, "FG-1002", "Mounting Bracket B", "FG", "PCS", Decimal::new(18, 1)),
            product(3, "FG-2001", "Gear Housing", "FG", "PCS", Decimal::new(42, 1)),
            product(4, "FG-2002", "Gear Cover", "FG", "PCS", Decimal::new(30, 1)),
            product(5, "RM-STEEL-2MM", "Steel Sheet 2mm", "RM", "KG", Decimal::ZERO),
            product(6, "RM-AL-BILLET", "Aluminium Billet", "RM", "KG", Decimal::ZERO),
        ];

        seed.machines = vec![
            machine(1, "PRS-01", "Press 200T", "PRESS", MachineStatus::Active, &["stamping", "bending"]),
            machine(2, "PRS-02", "Press 110T", "PRESS", MachineStatus::Standby, &["stamping"]),
            machine(3, "CNC-01", "CNC Lathe 1", "CNC", MachineStatus::Active, &["turning", "drilling"]),
            machine(4, "CNC-02", "CNC Mill 1", "CNC", MachineStatus::Down, &["milling"]),
        ];

        seed.bom_lines = vec![
            BomLine {
                id: 1,
                fg_code: "FG-1001".into(),
                component_code: "RM-STEEL-2MM".into(),
                usage: Decimal::new(35, 2),
                unit_code: "KG".into(),
                substitute: None,
                scrap_pct: Some(Decimal::new(25, 1)),
            },
            BomLine {
                id: 2,
                fg_code: "FG-2001".into(),
                component_code: "RM-AL-BILLET".into(),
                usage: Decimal::new(12, 1),
                unit_code: "KG".into(),
                substitute: Some("RM-AL-BILLET-B".into()),
                scrap_pct: None,
            },
        ];

        seed.routings = vec![
            routing(1, "FG-1001", 20, "WC-BEND", Decimal::new(8, 1), None),
            routing(2, "FG-1001", 10, "WC-STAMP", Decimal::new(5, 1), Some("DIE-A")),
            routing(3, "FG-2001", 10, "WC-TURN", Decimal::new(32, 1), None),
            routing(4, "FG-2001", 20, "WC-DRILL", Decimal::ONE, None),
        ];

        seed.suppliers = vec![Supplier {
            id: 1,
            code: "SUP-001".into(),
            name: "Siam Steel Co., Ltd.".into(),
            contact_name: Some("Khun Anan".into()),
            phone: Some("+66 2 123 4567".into()),
            email: Some("sales@siamsteel.example".into()),
            address: Some("Samut Prakan".into()),
        }];

        seed.warehouses = vec![
            Warehouse {
                id: 1,
                code: "WH-RM".into(),
                name: "Raw Material Store".into(),
                location: Some("Building 1".into()),
                manager: None,
            },
            Warehouse {
                id: 2,
                code: "WH-FG".into(),
                name: "Finished Goods".into(),
                location: Some("Building 2".into()),
                manager: Some("Khun Mali".into()),
            },
        ];

        seed.settings = Some(CompanySettings {
            company_name: "Demo Precision Parts".into(),
            ..CompanySettings::default()
        });

        seed
    }
}

/// Tabela estática de compatibilidade linha → produtos.
pub fn production_lines() -> Vec<ProductionLine> {
    vec![
        ProductionLine {
            line_code: "LINE-A".into(),
            name: "Press Line A".into(),
            compatible_products: vec!["FG-1001".into(), "FG-1002".into()],
            slot_count: 6,
        },
        ProductionLine {
            line_code: "LINE-B".into(),
            name: "Machining Line B".into(),
            compatible_products: vec!["FG-2001".into(), "FG-2002".into()],
            slot_count: 6,
        },
        ProductionLine {
            line_code: "LINE-C".into(),
            name: "Flex Cell C".into(),
            compatible_products: vec!["FG-1002".into(), "FG-2002".into()],
            slot_count: 4,
        },
    ]
}

fn full_access(group_id: i64, first_id: i64) -> Vec<Permission> {
    Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, &screen)| Permission {
            permission_id: first_id + i as i64,
            group_id,
            screen,
            flags: PermissionFlags::all(true),
        })
        .collect()
}

fn user(id: i64, username: &str, full_name: &str, group_id: i64) -> User {
    User {
        user_id: id,
        username: username.into(),
        full_name: full_name.into(),
        email: None,
        group_id,
        is_active: true,
    }
}

fn order(
    id: i64,
    number: &str,
    customer: &str,
    product: &str,
    quantity: i64,
    due: NaiveDate,
    status: OrderStatus,
) -> Order {
    Order {
        id,
        order_number: number.into(),
        customer_id: customer.into(),
        product_code: product.into(),
        quantity: Decimal::from(quantity),
        due_date: Some(due),
        status,
        remarks: None,
    }
}

fn product(id: i64, number: &str, name: &str, category: &str, unit: &str, rate: Decimal) -> Product {
    Product {
        id,
        product_number: number.into(),
        name: name.into(),
        category: category.into(),
        unit_code: unit.into(),
        std_rate_min: rate,
    }
}

fn machine(
    id: i64,
    code: &str,
    name: &str,
    kind: &str,
    status: MachineStatus,
    capabilities: &[&str],
) -> Machine {
    Machine {
        machine_id: id,
        machine_code: code.into(),
        name: name.into(),
        machine_type: kind.into(),
        status,
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
    }
}

fn routing(
    id: i64,
    fg: &str,
    op_no: i32,
    work_center: &str,
    std_time: Decimal,
    setup_key: Option<&str>,
) -> RoutingLine {
    RoutingLine {
        id,
        fg_code: fg.into(),
        op_no,
        work_center: work_center.into(),
        std_time_min: std_time,
        setup_key: setup_key.map(str::to_string),
    }
}
