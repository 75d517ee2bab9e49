// src/models/master.rs
//
// Cadastros básicos: produtos, máquinas, BOM, roteiros, fornecedores e armazéns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::listing::{Column, Record};
use crate::models::{
    access::Screen,
    rules::{
        must_be_positive, must_not_be_negative, not_blank, opt_decimal, opt_text, percent_range,
    },
    Resource,
};

// =============================================================================
//  PRODUTOS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "FG-1001")]
    pub product_number: String,
    #[schema(example = "Bracket A")]
    pub name: String,
    #[schema(example = "FG")]
    pub category: String,
    #[schema(example = "PCS")]
    pub unit_code: String,
    /// Minutos padrão por unidade
    #[schema(example = "1.5")]
    pub std_rate_min: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[validate(custom(function = "not_blank", message = "product_number_required"))]
    pub product_number: String,

    #[validate(custom(function = "not_blank", message = "name_required"))]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub unit_code: String,

    #[validate(custom(function = "must_not_be_negative"))]
    #[serde(default)]
    pub std_rate_min: Decimal,
}

impl Resource for Product {
    type Draft = ProductDraft;
    const SCREEN: Screen = Screen::Products;
    const LABEL: &'static str = "product";

    fn from_draft(id: i64, draft: ProductDraft) -> Self {
        Self {
            id,
            product_number: draft.product_number.trim().to_string(),
            name: draft.name.trim().to_string(),
            category: draft.category,
            unit_code: draft.unit_code,
            std_rate_min: draft.std_rate_min,
        }
    }
}

impl Record for Product {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.product_number.clone(),
            self.name.clone(),
            self.category.clone(),
        ]
    }

    fn filter_keys() -> &'static [&'static str] {
        &["category", "unitCode"]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "category" => Some(self.category.clone()),
            "unitCode" => Some(self.unit_code.clone()),
            _ => None,
        }
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |p| p.id.to_string()),
            Column::new("productNumber", "Product Number", |p| p.product_number.clone()),
            Column::new("name", "Name", |p| p.name.clone()),
            Column::new("category", "Category", |p| p.category.clone()),
            Column::new("unitCode", "Unit", |p| p.unit_code.clone()),
            Column::new("stdRateMin", "Std Rate (min)", |p| p.std_rate_min.to_string()),
        ]
    }
}

// =============================================================================
//  MÁQUINAS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    #[default]
    Active,
    Down,
    Standby,
}

impl MachineStatus {
    pub const ALL: [MachineStatus; 3] = [
        MachineStatus::Active,
        MachineStatus::Down,
        MachineStatus::Standby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Active => "active",
            MachineStatus::Down => "down",
            MachineStatus::Standby => "standby",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    #[schema(example = 1)]
    pub machine_id: i64,
    #[schema(example = "CNC-01")]
    pub machine_code: String,
    #[schema(example = "CNC Lathe 1")]
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "CNC")]
    pub machine_type: String,
    pub status: MachineStatus,
    #[schema(example = json!(["turning", "drilling"]))]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineDraft {
    #[validate(custom(function = "not_blank", message = "machine_code_required"))]
    pub machine_code: String,

    #[validate(custom(function = "not_blank", message = "name_required"))]
    pub name: String,

    #[serde(rename = "type", default)]
    pub machine_type: String,

    #[serde(default)]
    pub status: MachineStatus,

    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl Resource for Machine {
    type Draft = MachineDraft;
    const SCREEN: Screen = Screen::Machines;
    const LABEL: &'static str = "machine";

    fn from_draft(id: i64, draft: MachineDraft) -> Self {
        Self {
            machine_id: id,
            machine_code: draft.machine_code.trim().to_string(),
            name: draft.name.trim().to_string(),
            machine_type: draft.machine_type,
            status: draft.status,
            capabilities: draft
                .capabilities
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }
}

impl Record for Machine {
    fn id(&self) -> i64 {
        self.machine_id
    }

    fn set_id(&mut self, id: i64) {
        self.machine_id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.machine_code.clone(),
            self.name.clone(),
            self.machine_type.clone(),
        ];
        fields.extend(self.capabilities.iter().cloned());
        fields
    }

    fn filter_keys() -> &'static [&'static str] {
        &["status", "type"]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.as_str().to_string()),
            "type" => Some(self.machine_type.clone()),
            _ => None,
        }
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("machineId", "Machine ID", |m| m.machine_id.to_string()),
            Column::new("machineCode", "Code", |m| m.machine_code.clone()),
            Column::new("name", "Name", |m| m.name.clone()),
            Column::new("type", "Type", |m| m.machine_type.clone()),
            Column::new("status", "Status", |m| m.status.as_str().to_string()),
            Column::new("capabilities", "Capabilities", |m| m.capabilities.join(";")),
        ]
    }
}

// =============================================================================
//  BOM (Lista de Materiais)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    #[schema(example = 1)]
    pub id: i64,
    /// Código do produto acabado (pai)
    #[schema(example = "FG-1001")]
    pub fg_code: String,
    #[schema(example = "RM-STEEL-2MM")]
    pub component_code: String,
    /// Quantidade do componente por unidade do pai
    #[schema(example = "0.25")]
    pub usage: Decimal,
    #[schema(example = "KG")]
    pub unit_code: String,
    pub substitute: Option<String>,
    #[schema(example = "2.5")]
    pub scrap_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "component_differs_from_parent"))]
pub struct BomLineDraft {
    #[validate(custom(function = "not_blank", message = "fg_code_required"))]
    pub fg_code: String,

    #[validate(custom(function = "not_blank", message = "component_code_required"))]
    pub component_code: String,

    #[validate(custom(function = "must_be_positive"))]
    pub usage: Decimal,

    #[serde(default)]
    pub unit_code: String,

    pub substitute: Option<String>,

    #[validate(custom(function = "percent_range"))]
    pub scrap_pct: Option<Decimal>,
}

fn component_differs_from_parent(draft: &BomLineDraft) -> Result<(), ValidationError> {
    let fg = draft.fg_code.trim();
    if !fg.is_empty() && fg.eq_ignore_ascii_case(draft.component_code.trim()) {
        return Err(ValidationError::new("bom_self_reference"));
    }
    Ok(())
}

impl Resource for BomLine {
    type Draft = BomLineDraft;
    const SCREEN: Screen = Screen::Bom;
    const LABEL: &'static str = "bom_line";

    fn from_draft(id: i64, draft: BomLineDraft) -> Self {
        Self {
            id,
            fg_code: draft.fg_code.trim().to_string(),
            component_code: draft.component_code.trim().to_string(),
            usage: draft.usage,
            unit_code: draft.unit_code,
            substitute: draft.substitute.filter(|s| !s.trim().is_empty()),
            scrap_pct: draft.scrap_pct,
        }
    }
}

impl Record for BomLine {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.fg_code.clone(),
            self.component_code.clone(),
            opt_text(&self.substitute),
        ]
    }

    fn filter_keys() -> &'static [&'static str] {
        &["fgCode"]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "fgCode" => Some(self.fg_code.clone()),
            _ => None,
        }
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |b| b.id.to_string()),
            Column::new("fgCode", "FG Code", |b| b.fg_code.clone()),
            Column::new("componentCode", "Component", |b| b.component_code.clone()),
            Column::new("usage", "Usage", |b| b.usage.to_string()),
            Column::new("unitCode", "Unit", |b| b.unit_code.clone()),
            Column::new("substitute", "Substitute", |b| opt_text(&b.substitute)),
            Column::new("scrapPct", "Scrap %", |b| opt_decimal(&b.scrap_pct)),
        ]
    }
}

// =============================================================================
//  ROTEIROS (Routing)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutingLine {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "FG-1001")]
    pub fg_code: String,
    #[schema(example = 10)]
    pub op_no: i32,
    #[schema(example = "WC-CUT")]
    pub work_center: String,
    #[schema(example = "3.5")]
    pub std_time_min: Decimal,
    pub setup_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutingLineDraft {
    #[validate(custom(function = "not_blank", message = "fg_code_required"))]
    pub fg_code: String,

    #[validate(range(min = 1, message = "op_no_positive"))]
    pub op_no: i32,

    #[validate(custom(function = "not_blank", message = "work_center_required"))]
    pub work_center: String,

    #[validate(custom(function = "must_be_positive"))]
    pub std_time_min: Decimal,

    pub setup_key: Option<String>,
}

impl Resource for RoutingLine {
    type Draft = RoutingLineDraft;
    const SCREEN: Screen = Screen::Routing;
    const LABEL: &'static str = "routing_line";

    fn from_draft(id: i64, draft: RoutingLineDraft) -> Self {
        Self {
            id,
            fg_code: draft.fg_code.trim().to_string(),
            op_no: draft.op_no,
            work_center: draft.work_center.trim().to_string(),
            std_time_min: draft.std_time_min,
            setup_key: draft.setup_key.filter(|s| !s.trim().is_empty()),
        }
    }
}

impl Record for RoutingLine {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.fg_code.clone(),
            self.work_center.clone(),
            opt_text(&self.setup_key),
        ]
    }

    fn filter_keys() -> &'static [&'static str] {
        &["fgCode", "workCenter"]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "fgCode" => Some(self.fg_code.clone()),
            "workCenter" => Some(self.work_center.clone()),
            _ => None,
        }
    }

    // Roteiro é sempre lido na sequência de operações do produto
    fn sort_rows(rows: &mut [Self]) {
        rows.sort_by(|a, b| a.fg_code.cmp(&b.fg_code).then(a.op_no.cmp(&b.op_no)));
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |r| r.id.to_string()),
            Column::new("fgCode", "FG Code", |r| r.fg_code.clone()),
            Column::new("opNo", "Op No", |r| r.op_no.to_string()),
            Column::new("workCenter", "Work Center", |r| r.work_center.clone()),
            Column::new("stdTimeMin", "Std Time (min)", |r| r.std_time_min.to_string()),
            Column::new("setupKey", "Setup Key", |r| opt_text(&r.setup_key)),
        ]
    }
}

// =============================================================================
//  FORNECEDORES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "SUP-001")]
    pub code: String,
    #[schema(example = "Siam Steel Co., Ltd.")]
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    #[validate(custom(function = "not_blank", message = "code_required"))]
    pub code: String,

    #[validate(custom(function = "not_blank", message = "name_required"))]
    pub name: String,

    pub contact_name: Option<String>,
    pub phone: Option<String>,

    #[validate(email(message = "email_invalid"))]
    pub email: Option<String>,

    pub address: Option<String>,
}

impl Resource for Supplier {
    type Draft = SupplierDraft;
    const SCREEN: Screen = Screen::Suppliers;
    const LABEL: &'static str = "supplier";

    fn from_draft(id: i64, draft: SupplierDraft) -> Self {
        Self {
            id,
            code: draft.code.trim().to_string(),
            name: draft.name.trim().to_string(),
            contact_name: draft.contact_name,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
        }
    }
}

impl Record for Supplier {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            opt_text(&self.contact_name),
            opt_text(&self.email),
        ]
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |s| s.id.to_string()),
            Column::new("code", "Code", |s| s.code.clone()),
            Column::new("name", "Name", |s| s.name.clone()),
            Column::new("contactName", "Contact", |s| opt_text(&s.contact_name)),
            Column::new("phone", "Phone", |s| opt_text(&s.phone)),
            Column::new("email", "Email", |s| opt_text(&s.email)),
            Column::new("address", "Address", |s| opt_text(&s.address)),
        ]
    }
}

// =============================================================================
//  ARMAZÉNS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "WH-RM")]
    pub code: String,
    #[schema(example = "Raw Material Store")]
    pub name: String,
    pub location: Option<String>,
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseDraft {
    #[validate(custom(function = "not_blank", message = "code_required"))]
    pub code: String,

    #[validate(custom(function = "not_blank", message = "name_required"))]
    pub name: String,

    pub location: Option<String>,
    pub manager: Option<String>,
}

impl Resource for Warehouse {
    type Draft = WarehouseDraft;
    const SCREEN: Screen = Screen::Warehouses;
    const LABEL: &'static str = "warehouse";

    fn from_draft(id: i64, draft: WarehouseDraft) -> Self {
        Self {
            id,
            code: draft.code.trim().to_string(),
            name: draft.name.trim().to_string(),
            location: draft.location,
            manager: draft.manager,
        }
    }
}

impl Record for Warehouse {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            opt_text(&self.location),
        ]
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |w| w.id.to_string()),
            Column::new("code", "Code", |w| w.code.clone()),
            Column::new("name", "Name", |w| w.name.clone()),
            Column::new("location", "Location", |w| opt_text(&w.location)),
            Column::new("manager", "Manager", |w| opt_text(&w.manager)),
        ]
    }
}
