// src/models/orders.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::listing::{Column, Record};
use crate::models::{access::Screen, rules::{must_be_positive, not_blank}, Resource};

// --- Enums ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Released,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Released,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Released => "released",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Pedidos ainda abertos podem ir para o quadro de planejamento.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Released)
    }
}

// --- Pedido de produção ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "ORD-2024-001")]
    pub order_number: String,
    #[schema(example = "CUST-001")]
    pub customer_id: String,
    #[schema(example = "FG-1001")]
    pub product_code: String,
    #[schema(example = "500")]
    pub quantity: Decimal,
    pub due_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub remarks: Option<String>,
}

// O formulário de pedido (criação e edição)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[validate(custom(function = "not_blank", message = "order_number_required"))]
    #[schema(example = "ORD-9")]
    pub order_number: String,

    #[validate(custom(function = "not_blank", message = "customer_required"))]
    #[schema(example = "CUST-001")]
    pub customer_id: String,

    #[serde(default)]
    #[schema(example = "FG-1001")]
    pub product_code: String,

    #[validate(custom(function = "must_be_positive"))]
    #[serde(default = "default_quantity")]
    #[schema(example = "100")]
    pub quantity: Decimal,

    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: OrderStatus,

    pub remarks: Option<String>,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

impl Resource for Order {
    type Draft = OrderDraft;
    const SCREEN: Screen = Screen::Orders;
    const LABEL: &'static str = "order";

    fn from_draft(id: i64, draft: OrderDraft) -> Self {
        Self {
            id,
            order_number: draft.order_number.trim().to_string(),
            customer_id: draft.customer_id.trim().to_string(),
            product_code: draft.product_code.trim().to_string(),
            quantity: draft.quantity,
            due_date: draft.due_date,
            status: draft.status,
            remarks: draft.remarks,
        }
    }
}

impl Record for Order {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.customer_id.clone(),
            self.product_code.clone(),
            self.remarks.clone().unwrap_or_default(),
        ]
    }

    fn filter_keys() -> &'static [&'static str] {
        &["status", "customerId", "productCode"]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.as_str().to_string()),
            "customerId" => Some(self.customer_id.clone()),
            "productCode" => Some(self.product_code.clone()),
            _ => None,
        }
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |o| o.id.to_string()),
            Column::new("orderNumber", "Order Number", |o| o.order_number.clone()),
            Column::new("customerId", "Customer", |o| o.customer_id.clone()),
            Column::new("productCode", "Product", |o| o.product_code.clone()),
            Column::new("quantity", "Qty", |o| o.quantity.to_string()),
            Column::new("dueDate", "Due Date", |o| {
                o.due_date.map(|d| d.to_string()).unwrap_or_default()
            }),
            Column::new("status", "Status", |o| o.status.as_str().to_string()),
            Column::new("remarks", "Remarks", |o| o.remarks.clone().unwrap_or_default()),
        ]
    }
}
