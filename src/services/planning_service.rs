// src/services/planning_service.rs

use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    common::error::AppError,
    db::PlanningRepository,
    models::{
        master::Product,
        orders::Order,
        planning::{
            AssignPayload, BoardCard, BoardLane, BoardSlot, GanttBar, GanttQuery, GanttView,
            PlanningBoard,
        },
    },
    services::{
        crud_service::CrudService,
        gantt::{hours_between, Viewport, DEFAULT_PX_PER_HOUR},
    },
};

#[derive(Clone)]
pub struct PlanningService {
    repo: PlanningRepository,
    orders: CrudService<Order>,
    products: CrudService<Product>,
    horizon_start: NaiveDateTime,
}

impl PlanningService {
    pub fn new(
        repo: PlanningRepository,
        orders: CrudService<Order>,
        products: CrudService<Product>,
        horizon_start: NaiveDateTime,
    ) -> Self {
        Self {
            repo,
            orders,
            products,
            horizon_start,
        }
    }

    /// Monta o quadro: raias com seus slots e o backlog de pedidos abertos fora do quadro.
    /// Ids de pedidos que sumiram da tabela aparecem como slot vazio.
    pub async fn board(&self) -> Result<PlanningBoard, AppError> {
        let orders = self.orders.all().await?;
        let by_id: HashMap<i64, &Order> = orders.iter().map(|o| (o.id, o)).collect();
        let state = self.repo.board().await;

        let lanes = self
            .repo
            .lines()
            .iter()
            .map(|line| {
                let slots = state
                    .slots
                    .iter()
                    .find(|(code, _)| *code == line.line_code)
                    .map(|(_, slots)| slots.clone())
                    .unwrap_or_default();

                BoardLane {
                    line: line.clone(),
                    slots: slots
                        .iter()
                        .enumerate()
                        .map(|(slot_index, occupant)| BoardSlot {
                            slot_index,
                            card: occupant.and_then(|id| by_id.get(&id)).map(|o| card(o)),
                        })
                        .collect(),
                }
            })
            .collect();

        let backlog = orders
            .iter()
            .filter(|o| o.status.is_open() && !state.is_scheduled(o.id))
            .map(card)
            .collect();

        Ok(PlanningBoard { lanes, backlog })
    }

    /// Solta um pedido num slot. Se ele já estava em outro slot, muda de lugar.
    pub async fn assign(&self, payload: AssignPayload) -> Result<PlanningBoard, AppError> {
        let order = self.orders.get(payload.order_id).await?;
        if !order.status.is_open() {
            return Err(AppError::OrderNotSchedulable(order.order_number));
        }

        let line = self
            .repo
            .find_line(&payload.line_code)
            .ok_or_else(|| AppError::ResourceNotFound(format!("line {}", payload.line_code)))?;

        if !line.accepts(&order.product_code) {
            tracing::warn!(
                "Linha {} recusou o produto {} (pedido {})",
                line.line_code,
                order.product_code,
                order.order_number
            );
            return Err(AppError::IncompatibleLine {
                line: line.line_code.clone(),
                product: order.product_code,
            });
        }

        if payload.slot_index >= line.slot_count {
            return Err(AppError::ResourceNotFound(format!(
                "slot {} {}",
                line.line_code, payload.slot_index
            )));
        }

        let line_code = line.line_code.clone();
        let order_id = order.id;
        let slot_index = payload.slot_index;

        self.repo
            .modify(|board| {
                let current = board
                    .line_mut(&line_code)
                    .and_then(|slots| slots.get(slot_index).copied())
                    .flatten();
                if matches!(current, Some(id) if id != order_id) {
                    return Err(AppError::SlotOccupied {
                        line: line_code.clone(),
                        slot: slot_index,
                    });
                }

                board.remove(order_id);
                if let Some(slot) = board
                    .line_mut(&line_code)
                    .and_then(|slots| slots.get_mut(slot_index))
                {
                    *slot = Some(order_id);
                }
                Ok(())
            })
            .await?;

        tracing::info!(
            "📌 Pedido {} programado em {} / slot {}",
            order.order_number,
            line_code,
            slot_index
        );
        self.board().await
    }

    /// Devolve o pedido ao backlog. Pedido fora do quadro não é erro.
    pub async fn unassign(&self, order_id: i64) -> Result<PlanningBoard, AppError> {
        let removed = self.repo.modify(|board| board.remove(order_id)).await;
        if removed {
            tracing::info!("↩️ Pedido {} voltou para o backlog", order_id);
        }
        self.board().await
    }

    /// Barras do Gantt: em cada linha, os slots ocupados em sequência a partir
    /// do início do horizonte.
    pub async fn gantt(&self, query: GanttQuery) -> Result<GanttView, AppError> {
        let mut viewport = Viewport::new(
            query.px_per_hour.unwrap_or(DEFAULT_PX_PER_HOUR),
            query.scroll_left.unwrap_or(0.0),
        );
        if let Some(factor) = query.zoom {
            viewport = viewport.zoom_at(factor, query.cursor_x.unwrap_or(0.0));
        }

        let orders = self.orders.all().await?;
        let products = self.products.all().await?;
        let rates: HashMap<&str, Decimal> = products
            .iter()
            .map(|p| (p.product_number.as_str(), p.std_rate_min))
            .collect();
        let state = self.repo.board().await;

        let mut bars = Vec::new();
        for (line_code, slots) in &state.slots {
            let mut cursor = self.horizon_start;
            for order_id in slots.iter().flatten() {
                let Some(order) = orders.iter().find(|o| o.id == *order_id) else {
                    continue;
                };
                let rate = rates
                    .get(order.product_code.as_str())
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let (minutes, capped) = run_minutes(order.quantity, rate);
                if capped {
                    tracing::warn!(
                        "Pedido {} passa de {} min; barra cortada no limite",
                        order.order_number,
                        MAX_RUN_MINUTES
                    );
                }
                let end = TimeDelta::try_minutes(minutes)
                    .and_then(|run| cursor.checked_add_signed(run))
                    .ok_or_else(|| AppError::ScheduleOutOfRange(order.order_number.clone()))?;

                let (left_px, width_px) = viewport.bar_geometry(
                    hours_between(self.horizon_start, cursor),
                    hours_between(cursor, end),
                );
                bars.push(GanttBar {
                    order_id: order.id,
                    order_number: order.order_number.clone(),
                    line_code: line_code.clone(),
                    start: cursor,
                    end,
                    left_px,
                    width_px,
                    capped,
                });
                cursor = end;
            }
        }

        Ok(GanttView {
            origin: self.horizon_start,
            px_per_hour: viewport.px_per_hour,
            scroll_left: viewport.scroll_left,
            bars,
        })
    }
}

fn card(order: &Order) -> BoardCard {
    BoardCard {
        order_id: order.id,
        order_number: order.order_number.clone(),
        product_code: order.product_code.clone(),
        status: order.status,
    }
}

/// Maior barra desenhada: um ano de produção contínua.
pub const MAX_RUN_MINUTES: i64 = 366 * 24 * 60;

/// quantidade × minutos padrão por unidade, arredondado para cima, entre 1 e
/// `MAX_RUN_MINUTES`. O `bool` diz se o valor foi cortado no limite.
fn run_minutes(quantity: Decimal, std_rate_min: Decimal) -> (i64, bool) {
    let minutes = quantity.checked_mul(std_rate_min).map(|m| m.ceil());
    match minutes.and_then(|m| m.to_i64()) {
        Some(m) if m <= MAX_RUN_MINUTES => (m.max(1), false),
        _ => (MAX_RUN_MINUTES, true),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::db::{seed, MemoryTable};
    use crate::models::orders::{OrderDraft, OrderStatus};

    fn service() -> PlanningService {
        let data = seed::SeedData::demo();
        let start = NaiveDate::from_ymd_opt(2024, 1, 8)
            .and_then(|d| d.and_hms_opt(6, 0, 0))
            .unwrap();
        PlanningService::new(
            PlanningRepository::new(seed::production_lines()),
            CrudService::new(Arc::new(MemoryTable::new(data.orders))),
            CrudService::new(Arc::new(MemoryTable::new(data.products))),
            start,
        )
    }

    fn assign(order_id: i64, line: &str, slot: usize) -> AssignPayload {
        AssignPayload {
            order_id,
            line_code: line.into(),
            slot_index: slot,
        }
    }

    #[tokio::test]
    async fn backlog_holds_open_unscheduled_orders() {
        let board = service().board().await.unwrap();
        let ids: Vec<i64> = board.backlog.iter().map(|c| c.order_id).collect();
        // 2 está concluído e 5 cancelado
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(board.lanes.len(), 3);
        assert!(board.lanes.iter().all(|l| l.slots.iter().all(|s| s.card.is_none())));
    }

    #[tokio::test]
    async fn assign_respects_the_compatibility_table() {
        let service = service();

        // pedido 1 é FG-1001: LINE-A aceita, LINE-B não
        let err = service.assign(assign(1, "LINE-B", 0)).await.unwrap_err();
        assert!(matches!(err, AppError::IncompatibleLine { .. }));

        let board = service.assign(assign(1, "LINE-A", 2)).await.unwrap();
        let lane = &board.lanes[0];
        assert_eq!(lane.slots[2].card.as_ref().map(|c| c.order_id), Some(1));
        assert!(!board.backlog.iter().any(|c| c.order_id == 1));
    }

    #[tokio::test]
    async fn occupied_slot_is_a_conflict_but_moving_an_order_frees_its_old_slot() {
        let service = service();
        service.assign(assign(1, "LINE-A", 0)).await.unwrap();

        let err = service.assign(assign(4, "LINE-A", 0)).await.unwrap_err();
        assert!(matches!(err, AppError::SlotOccupied { slot: 0, .. }));

        // reatribuir ao mesmo slot é idempotente
        service.assign(assign(1, "LINE-A", 0)).await.unwrap();

        let board = service.assign(assign(1, "LINE-A", 3)).await.unwrap();
        assert!(board.lanes[0].slots[0].card.is_none());
        assert_eq!(board.lanes[0].slots[3].card.as_ref().map(|c| c.order_id), Some(1));
    }

    #[tokio::test]
    async fn closed_orders_and_bad_targets_are_rejected() {
        let service = service();

        let err = service.assign(assign(2, "LINE-A", 0)).await.unwrap_err();
        assert!(matches!(err, AppError::OrderNotSchedulable(_)));

        let err = service.assign(assign(1, "LINE-Z", 0)).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        let err = service.assign(assign(1, "LINE-A", 6)).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        let err = service.assign(assign(99, "LINE-A", 0)).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn unassign_returns_the_order_to_the_backlog() {
        let service = service();
        service.assign(assign(3, "LINE-B", 1)).await.unwrap();

        let board = service.unassign(3).await.unwrap();
        assert!(board.backlog.iter().any(|c| c.order_id == 3));
        assert!(board.lanes[1].slots[1].card.is_none());

        // de novo: nada a remover, sem erro
        assert!(service.unassign(3).await.is_ok());
    }

    #[tokio::test]
    async fn gantt_lays_bars_back_to_back() {
        let service = service();
        service.assign(assign(4, "LINE-A", 1)).await.unwrap();
        service.assign(assign(1, "LINE-A", 0)).await.unwrap();

        let view = service
            .gantt(GanttQuery {
                px_per_hour: Some(60.0),
                ..GanttQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(view.bars.len(), 2);
        let (first, second) = (&view.bars[0], &view.bars[1]);

        // pedido 1: 500 × 1.5 min = 750 min
        assert_eq!(first.order_id, 1);
        assert_eq!(first.start, view.origin);
        assert_eq!((first.end - first.start).num_minutes(), 750);
        assert_eq!(first.left_px, 0.0);
        assert_eq!(first.width_px, 750.0);

        // pedido 4 começa onde o 1 termina: 300 × 1.5 = 450 min
        assert_eq!(second.start, first.end);
        assert_eq!((second.end - second.start).num_minutes(), 450);
        assert_eq!(second.left_px, 750.0);
    }

    #[tokio::test]
    async fn gantt_applies_zoom_and_scroll() {
        let service = service();
        service.assign(assign(1, "LINE-A", 0)).await.unwrap();

        let view = service
            .gantt(GanttQuery {
                px_per_hour: Some(40.0),
                scroll_left: Some(100.0),
                zoom: Some(2.0),
                cursor_x: Some(100.0),
            })
            .await
            .unwrap();

        // hora sob o cursor: (100 + 100) / 40 = 5h → scroll = 5 × 80 - 100
        assert_eq!(view.px_per_hour, 80.0);
        assert_eq!(view.scroll_left, 300.0);
        assert_eq!(view.bars[0].left_px, -300.0);
    }

    #[test]
    fn run_time_has_a_one_minute_floor() {
        assert_eq!(run_minutes(Decimal::from(10), Decimal::ZERO), (1, false));
        assert_eq!(run_minutes(Decimal::new(5, 1), Decimal::ONE), (1, false));
        assert_eq!(run_minutes(Decimal::from(3), Decimal::new(25, 1)), (8, false));
    }

    #[test]
    fn run_time_is_capped_instead_of_overflowing() {
        assert_eq!(
            run_minutes(Decimal::from(1_000_000_000_000_i64), Decimal::new(15, 1)),
            (MAX_RUN_MINUTES, true)
        );
        // produto que estoura o Decimal
        assert_eq!(run_minutes(Decimal::MAX, Decimal::MAX), (MAX_RUN_MINUTES, true));
        assert_eq!(run_minutes(Decimal::from(MAX_RUN_MINUTES), Decimal::ONE), (MAX_RUN_MINUTES, false));
    }

    fn huge_order() -> OrderDraft {
        OrderDraft {
            order_number: "ORD-2024-001".into(),
            customer_id: "CUST-001".into(),
            product_code: "FG-1001".into(),
            quantity: Decimal::from(1_000_000_000_000_i64),
            due_date: None,
            status: OrderStatus::Pending,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn gantt_caps_a_huge_order_and_keeps_laying_out() {
        let service = service();
        service.orders.save(Some(1), huge_order()).await.unwrap();
        service.assign(assign(1, "LINE-A", 0)).await.unwrap();
        service.assign(assign(4, "LINE-A", 1)).await.unwrap();

        let view = service.gantt(GanttQuery::default()).await.unwrap();

        assert_eq!(view.bars.len(), 2);
        let (first, second) = (&view.bars[0], &view.bars[1]);
        assert!(first.capped);
        assert_eq!((first.end - first.start).num_minutes(), MAX_RUN_MINUTES);
        assert!(!second.capped);
        assert_eq!(second.start, first.end);
        assert_eq!((second.end - second.start).num_minutes(), 450);
    }

    #[tokio::test]
    async fn gantt_past_the_calendar_end_is_a_typed_error() {
        let data = seed::SeedData::demo();
        let service = PlanningService::new(
            PlanningRepository::new(seed::production_lines()),
            CrudService::new(Arc::new(MemoryTable::new(data.orders))),
            CrudService::new(Arc::new(MemoryTable::new(data.products))),
            NaiveDateTime::MAX,
        );
        service.assign(assign(1, "LINE-A", 0)).await.unwrap();

        let err = service.gantt(GanttQuery::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ScheduleOutOfRange(n) if n == "ORD-2024-001"));
    }

    #[tokio::test]
    async fn stale_order_ids_are_skipped() {
        let service = service();
        service.assign(assign(1, "LINE-A", 0)).await.unwrap();
        service.orders.delete(1).await.unwrap();

        let board = service.board().await.unwrap();
        assert!(board.lanes[0].slots[0].card.is_none());
        assert!(service.gantt(GanttQuery::default()).await.unwrap().bars.is_empty());
    }
}
