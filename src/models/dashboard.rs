// src/models/dashboard.rs

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_orders: usize,
    /// status -> quantidade (todos os status aparecem, mesmo com zero)
    pub orders_by_status: BTreeMap<String, usize>,
    pub machines_by_status: BTreeMap<String, usize>,
    /// Máquinas ativas / total, em %
    #[schema(example = 87.5)]
    pub machine_availability_pct: f64,
    /// Pendentes ou liberados com entrega nos próximos 7 dias
    pub orders_due_this_week: usize,
    pub scheduled_orders: usize,
    pub backlog_orders: usize,
}
