// src/services/access_service.rs

use crate::{
    common::{error::AppError, listing::next_id},
    db::MemoryTable,
    models::access::{
        Group, GroupMatrix, Permission, PermissionFlags, PermissionKind, PermissionMatrix, Screen,
    },
    services::crud_service::CrudService,
};

// Edição da matriz grupo × tela. Leitura e escrita acontecem sob o mesmo lock
// para que o "cria se não existe" não duplique linhas.
#[derive(Clone)]
pub struct AccessService {
    permissions: MemoryTable<Permission>,
}

impl AccessService {
    pub fn new(permissions: MemoryTable<Permission>) -> Self {
        Self { permissions }
    }

    pub async fn matrix(&self, group_id: i64) -> Result<GroupMatrix, AppError> {
        let rows = self.permissions.snapshot().await;
        Ok(GroupMatrix {
            group_id,
            rows: PermissionMatrix::from_rows(&rows).rows_for(group_id),
        })
    }

    pub async fn allows(
        &self,
        group_id: i64,
        screen: Screen,
        kind: PermissionKind,
    ) -> Result<bool, AppError> {
        let rows = self.permissions.snapshot().await;
        Ok(PermissionMatrix::from_rows(&rows)
            .get(group_id, screen)
            .get(kind))
    }

    /// Lista "tela:tipo" de tudo que o grupo pode fazer.
    pub async fn granted_slugs(&self, group_id: i64) -> Result<Vec<String>, AppError> {
        let matrix = self.matrix(group_id).await?;
        let kinds = [
            PermissionKind::View,
            PermissionKind::Add,
            PermissionKind::Edit,
            PermissionKind::Delete,
        ];
        Ok(matrix
            .rows
            .iter()
            .flat_map(|row| {
                kinds
                    .iter()
                    .filter(|k| row.flags.get(**k))
                    .map(|k| format!("{}:{}", row.screen.as_str(), k.as_str()))
                    .collect::<Vec<_>>()
            })
            .collect())
    }

    /// Liga/desliga uma célula. Sem linha prévia, cria uma com os outros três flags em `false`.
    pub async fn toggle(
        &self,
        group_id: i64,
        screen: Screen,
        kind: PermissionKind,
        value: bool,
    ) -> Result<Permission, AppError> {
        let permission = self
            .permissions
            .modify(|rows| {
                if let Some(existing) = rows
                    .iter_mut()
                    .find(|p| p.group_id == group_id && p.screen == screen)
                {
                    existing.flags.set(kind, value);
                    return existing.clone();
                }

                let mut flags = PermissionFlags::default();
                flags.set(kind, value);
                let created = Permission {
                    permission_id: next_id(rows),
                    group_id,
                    screen,
                    flags,
                };
                rows.push(created.clone());
                created
            })
            .await;

        tracing::info!(
            "🔐 Grupo {}: {}:{} = {}",
            group_id,
            screen.as_str(),
            kind.as_str(),
            value
        );
        Ok(permission)
    }

    /// "Grant ALL" / "Revoke ALL": todas as telas, os quatro flags iguais.
    pub async fn set_all(&self, group_id: i64, value: bool) -> Result<GroupMatrix, AppError> {
        self.permissions
            .modify(|rows| {
                for screen in Screen::ALL {
                    match rows
                        .iter_mut()
                        .find(|p| p.group_id == group_id && p.screen == screen)
                    {
                        Some(existing) => existing.flags = PermissionFlags::all(value),
                        None => {
                            let id = next_id(rows);
                            rows.push(Permission {
                                permission_id: id,
                                group_id,
                                screen,
                                flags: PermissionFlags::all(value),
                            });
                        }
                    }
                }
            })
            .await;

        tracing::info!(
            "🔐 Grupo {}: todas as permissões = {}",
            group_id,
            value
        );
        self.matrix(group_id).await
    }

    /// Exclui o grupo e as células dele. A matriz fica travada durante as duas
    /// remoções, então nenhuma edição de célula cai entre elas.
    pub async fn delete_group(
        &self,
        groups: &CrudService<Group>,
        group_id: i64,
    ) -> Result<bool, AppError> {
        let mut rows = self.permissions.lock().await;
        if !groups.delete(group_id).await? {
            return Ok(false);
        }

        let before = rows.len();
        rows.retain(|p| p.group_id != group_id);
        tracing::info!(
            "🔐 Grupo {}: {} linhas de permissão removidas",
            group_id,
            before - rows.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn service() -> AccessService {
        AccessService::new(MemoryTable::new(vec![Permission {
            permission_id: 5,
            group_id: 1,
            screen: Screen::Orders,
            flags: PermissionFlags {
                can_view: true,
                ..PermissionFlags::default()
            },
        }]))
    }

    #[tokio::test]
    async fn toggling_a_missing_cell_creates_exactly_one_row() {
        let service = service();
        let created = service
            .toggle(1, Screen::Bom, PermissionKind::Edit, true)
            .await
            .unwrap();

        assert_eq!(created.permission_id, 6);
        assert_eq!(
            created.flags,
            PermissionFlags {
                can_edit: true,
                ..PermissionFlags::default()
            }
        );
        assert_eq!(service.permissions.snapshot().await.len(), 2);

        // de novo na mesma célula: atualiza, não cria
        service
            .toggle(1, Screen::Bom, PermissionKind::View, true)
            .await
            .unwrap();
        let rows = service.permissions.snapshot().await;
        assert_eq!(rows.len(), 2);
        assert!(rows[1].flags.can_view && rows[1].flags.can_edit);
    }

    #[tokio::test]
    async fn toggle_off_on_missing_cell_still_stores_a_row() {
        let service = service();
        let created = service
            .toggle(2, Screen::Orders, PermissionKind::Delete, false)
            .await
            .unwrap();
        assert_eq!(created.flags, PermissionFlags::default());
        assert_eq!(service.permissions.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn grant_all_then_revoke_all_covers_every_screen() {
        let service = service();

        let granted = service.set_all(1, true).await.unwrap();
        assert!(granted.rows.iter().all(|r| r.stored && r.flags == PermissionFlags::all(true)));
        assert_eq!(service.permissions.snapshot().await.len(), Screen::ALL.len());

        let revoked = service.set_all(1, false).await.unwrap();
        assert!(revoked.rows.iter().all(|r| r.flags == PermissionFlags::default()));
        assert_eq!(service.permissions.snapshot().await.len(), Screen::ALL.len());
    }

    #[tokio::test]
    async fn allows_reads_virtual_defaults() {
        let service = service();
        assert!(service.allows(1, Screen::Orders, PermissionKind::View).await.unwrap());
        assert!(!service.allows(1, Screen::Orders, PermissionKind::Add).await.unwrap());
        assert!(!service.allows(9, Screen::Settings, PermissionKind::View).await.unwrap());
        assert_eq!(service.granted_slugs(1).await.unwrap(), vec!["orders:view".to_string()]);
    }

    fn groups() -> CrudService<Group> {
        let group = |group_id: i64, name: &str| Group {
            group_id,
            name: name.into(),
            description: None,
        };
        CrudService::new(Arc::new(MemoryTable::new(vec![
            group(1, "Admin"),
            group(2, "Planner"),
        ])))
    }

    #[tokio::test]
    async fn deleting_a_group_removes_its_cells_only() {
        let service = service();
        let groups = groups();
        service.set_all(2, true).await.unwrap();

        assert!(service.delete_group(&groups, 2).await.unwrap());
        assert_eq!(service.permissions.snapshot().await.len(), 1);
        assert!(groups.get(2).await.is_err());

        // já excluído: nada muda
        assert!(!service.delete_group(&groups, 2).await.unwrap());
        assert_eq!(service.permissions.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn toggle_waits_for_a_group_delete_in_progress() {
        let service = service();
        let groups = groups();
        service.set_all(2, true).await.unwrap();

        // com a matriz travada, a edição concorrente só roda depois da exclusão
        let rows = service.permissions.lock().await;
        let editor = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .toggle(2, Screen::Orders, PermissionKind::View, true)
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(!editor.is_finished());
        drop(rows);
        editor.await.unwrap().unwrap();

        assert!(service.delete_group(&groups, 2).await.unwrap());
        assert!(!service.allows(2, Screen::Orders, PermissionKind::View).await.unwrap());
    }
}
