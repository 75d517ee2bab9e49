// src/services/crud_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{
        error::AppError,
        export::{export_rows, ExportFile, ExportFormat},
        listing::{list_page, ListQuery, Page},
    },
    db::CrudRepository,
    models::Resource,
};

/// Resultado de um `save`: a linha gravada e se ela foi criada agora.
#[derive(Debug)]
pub struct Saved<T> {
    pub record: T,
    pub created: bool,
}

// O mesmo fluxo de lista/formulário/exclusão para todos os cadastros
pub struct CrudService<T: Resource> {
    repo: Arc<dyn CrudRepository<T>>,
}

impl<T: Resource> Clone for CrudService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<T: Resource> CrudService<T> {
    pub fn new(repo: Arc<dyn CrudRepository<T>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<T>, AppError> {
        let rows = self.repo.list().await?;
        Ok(list_page(rows, query))
    }

    pub async fn all(&self) -> Result<Vec<T>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<T, AppError> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("{} {}", T::LABEL, id)))
    }

    /// Sem id cria (id = max + 1); com id substitui exatamente a linha daquele id.
    pub async fn save(&self, id: Option<i64>, draft: T::Draft) -> Result<Saved<T>, AppError> {
        draft.validate()?;

        match id {
            None => {
                let record = self.repo.insert(T::from_draft(0, draft)).await?;
                tracing::info!("✅ {} {} criado", T::LABEL, record.id());
                Ok(Saved { record, created: true })
            }
            Some(id) => {
                let record = self
                    .repo
                    .replace(T::from_draft(id, draft))
                    .await?
                    .ok_or_else(|| AppError::ResourceNotFound(format!("{} {}", T::LABEL, id)))?;
                tracing::info!("✏️ {} {} atualizado", T::LABEL, id);
                Ok(Saved { record, created: false })
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = self.repo.remove(id).await?;
        if removed {
            tracing::info!("🗑️ {} {} removido", T::LABEL, id);
        }
        Ok(removed)
    }

    /// Importa um array JSON de rascunhos. Tudo ou nada.
    pub async fn import(&self, body: &[u8]) -> Result<Vec<T>, AppError> {
        let drafts: Vec<T::Draft> = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!("Importação de {} rejeitada: {}", T::LABEL, e);
            AppError::InvalidImport
        })?;

        for draft in &drafts {
            draft.validate()?;
        }

        let records = drafts
            .into_iter()
            .map(|draft| T::from_draft(0, draft))
            .collect();
        let inserted = self.repo.insert_all(records).await?;
        tracing::info!("📥 {} linhas de {} importadas", inserted.len(), T::LABEL);
        Ok(inserted)
    }

    pub async fn export(&self, format: ExportFormat) -> Result<ExportFile, AppError> {
        let mut rows = self.repo.list().await?;
        T::sort_rows(&mut rows);
        export_rows(&rows, format, T::LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryTable;
    use crate::models::orders::{Order, OrderDraft, OrderStatus};
    use rust_decimal::Decimal;

    fn seeded() -> CrudService<Order> {
        let rows = vec![
            Order {
                id: 1,
                order_number: "ORD-1".into(),
                customer_id: "CUST-001".into(),
                product_code: "FG-1001".into(),
                quantity: Decimal::ONE,
                due_date: None,
                status: OrderStatus::Pending,
                remarks: None,
            },
            Order {
                id: 2,
                order_number: "ORD-2".into(),
                customer_id: "CUST-002".into(),
                product_code: "FG-1002".into(),
                quantity: Decimal::ONE,
                due_date: None,
                status: OrderStatus::Completed,
                remarks: None,
            },
        ];
        CrudService::new(Arc::new(MemoryTable::new(rows)))
    }

    fn draft(number: &str) -> OrderDraft {
        OrderDraft {
            order_number: number.into(),
            customer_id: "CUST-009".into(),
            product_code: "FG-1001".into(),
            quantity: Decimal::from(10),
            due_date: None,
            status: OrderStatus::Pending,
            remarks: None,
        }
    }

    // Cenário: filtrar "pending", criar ORD-9 (id 3), excluir id 2.
    #[tokio::test]
    async fn example_scenario_filter_save_delete() {
        let service = seeded();

        let pending = service
            .list(&ListQuery::new(10).with_filter("status", "pending"))
            .await
            .unwrap();
        assert_eq!(pending.rows.len(), 1);
        assert_eq!(pending.rows[0].id, 1);

        let saved = service.save(None, draft("ORD-9")).await.unwrap();
        assert!(saved.created);
        assert_eq!(saved.record.id, 3);

        assert!(service.delete(2).await.unwrap());
        let ids: Vec<i64> = service.all().await.unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn save_rejects_empty_order_number_without_touching_the_table() {
        let service = seeded();
        let err = service.save(None, draft("")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(service.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn whitespace_only_required_fields_are_rejected() {
        let service = seeded();

        let mut blank = draft("   ");
        blank.customer_id = "  ".into();
        let err = service.save(None, blank).await.unwrap_err();
        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        let fields = errors.field_errors();
        assert!(fields.contains_key("order_number"));
        assert!(fields.contains_key("customer_id"));
        assert_eq!(service.all().await.unwrap().len(), 2);

        // edição também não pode apagar o número
        assert!(service.save(Some(1), draft(" \t ")).await.is_err());
        assert_eq!(service.get(1).await.unwrap().order_number, "ORD-1");
    }

    #[tokio::test]
    async fn editing_a_missing_id_is_not_found() {
        let service = seeded();
        let err = service.save(Some(77), draft("ORD-77")).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn edit_preserves_id() {
        let service = seeded();
        let saved = service.save(Some(2), draft("ORD-2B")).await.unwrap();
        assert!(!saved.created);
        assert_eq!(saved.record.id, 2);
        assert_eq!(service.get(2).await.unwrap().order_number, "ORD-2B");
        assert_eq!(service.get(1).await.unwrap().order_number, "ORD-1");
    }

    #[tokio::test]
    async fn import_is_all_or_nothing() {
        let service = seeded();

        let err = service.import(b"{ not json").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidImport));

        let one_bad = br#"[
            {"orderNumber": "ORD-10", "customerId": "C1", "quantity": 5},
            {"orderNumber": "", "customerId": "C2", "quantity": 5}
        ]"#;
        assert!(service.import(one_bad).await.is_err());
        assert_eq!(service.all().await.unwrap().len(), 2);

        let good = br#"[
            {"orderNumber": "ORD-10", "customerId": "C1", "quantity": 5},
            {"orderNumber": "ORD-11", "customerId": "C2"}
        ]"#;
        let inserted = service.import(good).await.unwrap();
        let ids: Vec<i64> = inserted.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(inserted[1].quantity, Decimal::ONE);
    }
}
