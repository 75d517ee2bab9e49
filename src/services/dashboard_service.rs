// src/services/dashboard_service.rs

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::PlanningRepository,
    models::{
        dashboard::DashboardSummary,
        master::{Machine, MachineStatus},
        orders::{Order, OrderStatus},
    },
    services::crud_service::CrudService,
};

#[derive(Clone)]
pub struct DashboardService {
    orders: CrudService<Order>,
    machines: CrudService<Machine>,
    planning_repo: PlanningRepository,
}

impl DashboardService {
    pub fn new(
        orders: CrudService<Order>,
        machines: CrudService<Machine>,
        planning_repo: PlanningRepository,
    ) -> Self {
        Self {
            orders,
            machines,
            planning_repo,
        }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        self.summary_on(Utc::now().date_naive()).await
    }

    pub async fn summary_on(&self, today: NaiveDate) -> Result<DashboardSummary, AppError> {
        let orders = self.orders.all().await?;
        let machines = self.machines.all().await?;
        let board = self.planning_repo.board().await;

        let mut orders_by_status: BTreeMap<String, usize> = OrderStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for order in &orders {
            *orders_by_status
                .entry(order.status.as_str().to_string())
                .or_default() += 1;
        }

        let mut machines_by_status: BTreeMap<String, usize> = MachineStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for machine in &machines {
            *machines_by_status
                .entry(machine.status.as_str().to_string())
                .or_default() += 1;
        }

        let active = machines
            .iter()
            .filter(|m| m.status == MachineStatus::Active)
            .count();
        let machine_availability_pct = if machines.is_empty() {
            0.0
        } else {
            (active as f64 / machines.len() as f64 * 1000.0).round() / 10.0
        };

        let week_end = today + Duration::days(7);
        let open: Vec<&Order> = orders.iter().filter(|o| o.status.is_open()).collect();
        let orders_due_this_week = open
            .iter()
            .filter(|o| matches!(o.due_date, Some(d) if d >= today && d <= week_end))
            .count();
        let scheduled_orders = open.iter().filter(|o| board.is_scheduled(o.id)).count();

        Ok(DashboardSummary {
            total_orders: orders.len(),
            orders_by_status,
            machines_by_status,
            machine_availability_pct,
            orders_due_this_week,
            scheduled_orders,
            backlog_orders: open.len() - scheduled_orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{seed, MemoryTable};

    #[tokio::test]
    async fn summary_counts_the_demo_data() {
        let data = seed::SeedData::demo();
        let planning_repo = PlanningRepository::new(seed::production_lines());
        planning_repo
            .modify(|board| {
                if let Some(slots) = board.line_mut("LINE-A") {
                    slots[0] = Some(1);
                }
            })
            .await;

        let service = DashboardService::new(
            CrudService::new(Arc::new(MemoryTable::new(data.orders))),
            CrudService::new(Arc::new(MemoryTable::new(data.machines))),
            planning_repo,
        );
        let summary = service.get_summary().await.unwrap();

        assert_eq!(summary.total_orders, 5);
        assert_eq!(summary.orders_by_status["pending"], 2);
        assert_eq!(summary.orders_by_status["cancelled"], 1);
        assert_eq!(summary.machines_by_status["down"], 1);
        assert_eq!(summary.machine_availability_pct, 50.0);
        // pedidos 1 (+3 dias) e 3 (+5 dias); o 5 vence amanhã mas está cancelado
        assert_eq!(summary.orders_due_this_week, 2);
        assert_eq!(summary.scheduled_orders, 1);
        assert_eq!(summary.backlog_orders, 2);
    }

    #[tokio::test]
    async fn empty_tables_do_not_divide_by_zero() {
        let service = DashboardService::new(
            CrudService::new(Arc::new(MemoryTable::<Order>::new(Vec::new()))),
            CrudService::new(Arc::new(MemoryTable::<Machine>::new(Vec::new()))),
            PlanningRepository::new(Vec::new()),
        );
        let summary = service.get_summary().await.unwrap();
        assert_eq!(summary.machine_availability_pct, 0.0);
        assert_eq!(summary.orders_by_status.len(), OrderStatus::ALL.len());
    }
}
