// src/models/access.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::listing::{Column, Record};
use crate::models::{rules::not_blank, Resource};

// --- Enums ---

/// As telas do painel. Cada uma tem uma linha na matriz de permissões.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Orders,
    Products,
    Machines,
    Bom,
    Routing,
    Suppliers,
    Warehouses,
    Users,
    Groups,
    Planning,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 12] = [
        Screen::Dashboard,
        Screen::Orders,
        Screen::Products,
        Screen::Machines,
        Screen::Bom,
        Screen::Routing,
        Screen::Suppliers,
        Screen::Warehouses,
        Screen::Users,
        Screen::Groups,
        Screen::Planning,
        Screen::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::Orders => "orders",
            Screen::Products => "products",
            Screen::Machines => "machines",
            Screen::Bom => "bom",
            Screen::Routing => "routing",
            Screen::Suppliers => "suppliers",
            Screen::Warehouses => "warehouses",
            Screen::Users => "users",
            Screen::Groups => "groups",
            Screen::Planning => "planning",
            Screen::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    View,
    Add,
    Edit,
    Delete,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::View => "view",
            PermissionKind::Add => "add",
            PermissionKind::Edit => "edit",
            PermissionKind::Delete => "delete",
        }
    }
}

// --- Permissões ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFlags {
    pub can_view: bool,
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl PermissionFlags {
    pub fn all(value: bool) -> Self {
        Self {
            can_view: value,
            can_add: value,
            can_edit: value,
            can_delete: value,
        }
    }

    pub fn get(&self, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::View => self.can_view,
            PermissionKind::Add => self.can_add,
            PermissionKind::Edit => self.can_edit,
            PermissionKind::Delete => self.can_delete,
        }
    }

    pub fn set(&mut self, kind: PermissionKind, value: bool) {
        match kind {
            PermissionKind::View => self.can_view = value,
            PermissionKind::Add => self.can_add = value,
            PermissionKind::Edit => self.can_edit = value,
            PermissionKind::Delete => self.can_delete = value,
        }
    }
}

/// Uma célula persistida da matriz (grupo × tela).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = 12)]
    pub permission_id: i64,
    #[schema(example = 1)]
    pub group_id: i64,
    pub screen: Screen,
    #[serde(flatten)]
    pub flags: PermissionFlags,
}

impl Record for Permission {
    fn id(&self) -> i64 {
        self.permission_id
    }

    fn set_id(&mut self, id: i64) {
        self.permission_id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.screen.as_str().to_string()]
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("permissionId", "Permission ID", |p| p.permission_id.to_string()),
            Column::new("groupId", "Group", |p| p.group_id.to_string()),
            Column::new("screen", "Screen", |p| p.screen.as_str().to_string()),
            Column::new("canView", "View", |p| p.flags.can_view.to_string()),
            Column::new("canAdd", "Add", |p| p.flags.can_add.to_string()),
            Column::new("canEdit", "Edit", |p| p.flags.can_edit.to_string()),
            Column::new("canDelete", "Delete", |p| p.flags.can_delete.to_string()),
        ]
    }
}

/// Matriz esparsa com valor padrão: célula ausente = tudo `false`.
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    cells: HashMap<(i64, Screen), PermissionFlags>,
}

impl PermissionMatrix {
    pub fn from_rows(rows: &[Permission]) -> Self {
        Self {
            cells: rows
                .iter()
                .map(|p| ((p.group_id, p.screen), p.flags))
                .collect(),
        }
    }

    pub fn get(&self, group_id: i64, screen: Screen) -> PermissionFlags {
        self.cells
            .get(&(group_id, screen))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_stored(&self, group_id: i64, screen: Screen) -> bool {
        self.cells.contains_key(&(group_id, screen))
    }

    /// Uma linha por tela, na ordem de `Screen::ALL`.
    pub fn rows_for(&self, group_id: i64) -> Vec<MatrixRow> {
        Screen::ALL
            .iter()
            .map(|&screen| MatrixRow {
                screen,
                flags: self.get(group_id, screen),
                stored: self.is_stored(group_id, screen),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub screen: Screen,
    #[serde(flatten)]
    pub flags: PermissionFlags,
    /// `false` quando a célula é o padrão virtual
    pub stored: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupMatrix {
    pub group_id: i64,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TogglePermissionPayload {
    #[schema(example = true)]
    pub value: bool,
}

// --- Usuários e Grupos ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[schema(example = 1)]
    pub group_id: i64,
    #[schema(example = "Planejamento")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupDraft {
    #[validate(custom(function = "not_blank", message = "group_name_required"))]
    #[schema(example = "Supervisores")]
    pub name: String,
    pub description: Option<String>,
}

impl Resource for Group {
    type Draft = GroupDraft;
    const SCREEN: Screen = Screen::Groups;
    const LABEL: &'static str = "group";

    fn from_draft(id: i64, draft: GroupDraft) -> Self {
        Self {
            group_id: id,
            name: draft.name.trim().to_string(),
            description: draft.description,
        }
    }
}

impl Record for Group {
    fn id(&self) -> i64 {
        self.group_id
    }

    fn set_id(&mut self, id: i64) {
        self.group_id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
        ]
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("groupId", "Group ID", |g| g.group_id.to_string()),
            Column::new("name", "Name", |g| g.name.clone()),
            Column::new("description", "Description", |g| {
                g.description.clone().unwrap_or_default()
            }),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = "somchai")]
    pub username: String,
    #[schema(example = "Somchai Jaidee")]
    pub full_name: String,
    pub email: Option<String>,
    /// Referência ao grupo; não é validada contra a tabela de grupos
    pub group_id: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[validate(custom(function = "not_blank", message = "username_required"))]
    #[schema(example = "somchai")]
    pub username: String,

    #[serde(default)]
    pub full_name: String,

    #[validate(email(message = "email_invalid"))]
    pub email: Option<String>,

    #[validate(range(min = 1, message = "group_required"))]
    pub group_id: i64,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Resource for User {
    type Draft = UserDraft;
    const SCREEN: Screen = Screen::Users;
    const LABEL: &'static str = "user";

    fn from_draft(id: i64, draft: UserDraft) -> Self {
        Self {
            user_id: id,
            username: draft.username.trim().to_string(),
            full_name: draft.full_name,
            email: draft.email,
            group_id: draft.group_id,
            is_active: draft.is_active,
        }
    }
}

impl Record for User {
    fn id(&self) -> i64 {
        self.user_id
    }

    fn set_id(&mut self, id: i64) {
        self.user_id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.full_name.clone(),
            self.email.clone().unwrap_or_default(),
        ]
    }

    fn filter_keys() -> &'static [&'static str] {
        &["groupId", "isActive"]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "groupId" => Some(self.group_id.to_string()),
            "isActive" => Some(self.is_active.to_string()),
            _ => None,
        }
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("userId", "User ID", |u| u.user_id.to_string()),
            Column::new("username", "Username", |u| u.username.clone()),
            Column::new("fullName", "Full Name", |u| u.full_name.clone()),
            Column::new("email", "Email", |u| u.email.clone().unwrap_or_default()),
            Column::new("groupId", "Group", |u| u.group_id.to_string()),
            Column::new("isActive", "Active", |u| u.is_active.to_string()),
        ]
    }
}

// Resposta do /me: o usuário e o que ele pode fazer
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,

    #[schema(example = json!(["orders:view", "orders:add"]))]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_read_as_all_false() {
        let matrix = PermissionMatrix::from_rows(&[Permission {
            permission_id: 1,
            group_id: 1,
            screen: Screen::Orders,
            flags: PermissionFlags::all(true),
        }]);

        assert_eq!(matrix.get(1, Screen::Orders), PermissionFlags::all(true));
        assert_eq!(matrix.get(1, Screen::Bom), PermissionFlags::default());
        assert_eq!(matrix.get(2, Screen::Orders), PermissionFlags::default());

        let rows = matrix.rows_for(1);
        assert_eq!(rows.len(), Screen::ALL.len());
        assert_eq!(rows.iter().filter(|r| r.stored).count(), 1);
    }

    #[test]
    fn flags_set_touches_only_one_kind() {
        let mut flags = PermissionFlags::default();
        flags.set(PermissionKind::Edit, true);
        assert!(flags.get(PermissionKind::Edit));
        assert!(!flags.can_view && !flags.can_add && !flags.can_delete);
    }
}
