// src/db/memory_table.rs

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::common::{
    error::AppError,
    listing::{next_id, Record},
};

/// O contrato de repositório que os services enxergam.
/// Hoje só existe a implementação em memória; um banco real entraria aqui.
#[async_trait]
pub trait CrudRepository<T: Record>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<T>, AppError>;

    /// Insere com id novo (`max + 1`) e devolve a linha gravada.
    async fn insert(&self, record: T) -> Result<T, AppError>;

    /// Insere todas ou nenhuma, com ids novos em sequência.
    async fn insert_all(&self, records: Vec<T>) -> Result<Vec<T>, AppError>;

    /// Substitui a linha de mesmo id. `None` se o id não existe.
    async fn replace(&self, record: T) -> Result<Option<T>, AppError>;

    /// `true` se alguma linha foi removida.
    async fn remove(&self, id: i64) -> Result<bool, AppError>;
}

/// Tabela em memória protegida por RwLock. Clonar compartilha os dados.
#[derive(Clone)]
pub struct MemoryTable<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T: Record> MemoryTable<T> {
    pub fn new(seed: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(seed)),
        }
    }

    /// Executa `f` com a tabela travada para escrita.
    /// Usado quando a leitura e a escrita precisam ser atômicas (ex.: matriz de permissões).
    pub async fn modify<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut rows = self.rows.write().await;
        f(&mut rows)
    }

    /// Trava a tabela para escrita até o guard sair de escopo.
    /// Para operações que também aguardam outra tabela no meio.
    pub async fn lock(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.rows.write().await
    }

    pub async fn snapshot(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl<T: Record> CrudRepository<T> for MemoryTable<T> {
    async fn list(&self) -> Result<Vec<T>, AppError> {
        Ok(self.snapshot().await)
    }

    async fn find(&self, id: i64) -> Result<Option<T>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, mut record: T) -> Result<T, AppError> {
        let mut rows = self.rows.write().await;
        record.set_id(next_id(&rows));
        rows.push(record.clone());
        Ok(record)
    }

    async fn insert_all(&self, records: Vec<T>) -> Result<Vec<T>, AppError> {
        let mut rows = self.rows.write().await;
        let mut id = next_id(&rows);
        let mut inserted = Vec::with_capacity(records.len());
        for mut record in records {
            record.set_id(id);
            id += 1;
            inserted.push(record);
        }
        rows.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn replace(&self, record: T) -> Result<Option<T>, AppError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() < before)
    }
}
