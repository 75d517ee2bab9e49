// src/db/planning_repo.rs

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::planning::{BoardState, ProductionLine};

// Linhas (tabela estática) + ocupação dos slots do quadro
#[derive(Clone)]
pub struct PlanningRepository {
    lines: Arc<Vec<ProductionLine>>,
    board: Arc<RwLock<BoardState>>,
}

impl PlanningRepository {
    pub fn new(lines: Vec<ProductionLine>) -> Self {
        let board = BoardState::for_lines(&lines);
        Self {
            lines: Arc::new(lines),
            board: Arc::new(RwLock::new(board)),
        }
    }

    pub fn lines(&self) -> &[ProductionLine] {
        &self.lines
    }

    pub fn find_line(&self, line_code: &str) -> Option<&ProductionLine> {
        self.lines.iter().find(|l| l.line_code == line_code)
    }

    pub async fn board(&self) -> BoardState {
        self.board.read().await.clone()
    }

    pub async fn modify<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> R {
        let mut board = self.board.write().await;
        f(&mut board)
    }
}
