// src/models/planning.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::orders::OrderStatus;

/// Linha de produção com a tabela estática de compatibilidade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionLine {
    #[schema(example = "LINE-A")]
    pub line_code: String,
    #[schema(example = "Press Line A")]
    pub name: String,
    #[schema(example = json!(["FG-1001", "FG-1002"]))]
    pub compatible_products: Vec<String>,
    #[schema(example = 6)]
    pub slot_count: usize,
}

impl ProductionLine {
    pub fn accepts(&self, product_code: &str) -> bool {
        self.compatible_products.iter().any(|p| p == product_code)
    }
}

/// Estado do quadro: `slots[linha][posição] = id do pedido`.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub slots: Vec<(String, Vec<Option<i64>>)>,
}

impl BoardState {
    pub fn for_lines(lines: &[ProductionLine]) -> Self {
        Self {
            slots: lines
                .iter()
                .map(|l| (l.line_code.clone(), vec![None; l.slot_count]))
                .collect(),
        }
    }

    pub fn line_mut(&mut self, line_code: &str) -> Option<&mut Vec<Option<i64>>> {
        self.slots
            .iter_mut()
            .find(|(code, _)| code == line_code)
            .map(|(_, slots)| slots)
    }

    /// Onde o pedido está agora, se estiver no quadro.
    pub fn position_of(&self, order_id: i64) -> Option<(String, usize)> {
        self.slots.iter().find_map(|(code, slots)| {
            slots
                .iter()
                .position(|s| *s == Some(order_id))
                .map(|idx| (code.clone(), idx))
        })
    }

    pub fn remove(&mut self, order_id: i64) -> bool {
        let mut removed = false;
        for (_, slots) in self.slots.iter_mut() {
            for slot in slots.iter_mut() {
                if *slot == Some(order_id) {
                    *slot = None;
                    removed = true;
                }
            }
        }
        removed
    }

    pub fn is_scheduled(&self, order_id: i64) -> bool {
        self.position_of(order_id).is_some()
    }
}

// --- Respostas ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub order_id: i64,
    pub order_number: String,
    pub product_code: String,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardSlot {
    pub slot_index: usize,
    pub card: Option<BoardCard>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardLane {
    #[serde(flatten)]
    pub line: ProductionLine,
    pub slots: Vec<BoardSlot>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanningBoard {
    pub lanes: Vec<BoardLane>,
    /// Pedidos abertos fora do quadro
    pub backlog: Vec<BoardCard>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPayload {
    #[schema(example = 3)]
    pub order_id: i64,
    #[schema(example = "LINE-A")]
    pub line_code: String,
    #[schema(example = 0)]
    pub slot_index: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnassignPayload {
    pub order_id: i64,
}

// --- Gantt ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GanttBar {
    pub order_id: i64,
    pub order_number: String,
    pub line_code: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Posição em pixels já descontado o scroll
    pub left_px: f64,
    pub width_px: f64,
    /// A barra foi cortada no tamanho máximo desenhável
    pub capped: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GanttView {
    pub origin: NaiveDateTime,
    pub px_per_hour: f64,
    pub scroll_left: f64,
    pub bars: Vec<GanttBar>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GanttQuery {
    pub px_per_hour: Option<f64>,
    pub scroll_left: Option<f64>,
    /// Fator de zoom (>1 aproxima, <1 afasta)
    pub zoom: Option<f64>,
    /// Posição do cursor (px) que fica fixa durante o zoom
    pub cursor_x: Option<f64>,
}
