// src/common/listing.rs
//
// Filtro + paginação genéricos usados por todas as telas de cadastro.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;

pub const MAX_PAGE_SIZE: usize = 200;

/// Uma coluna de tabela/exportação, tipada pelo registro.
pub struct Column<T> {
    pub key: &'static str,
    pub header: &'static str,
    pub render: fn(&T) -> String,
}

impl<T> Column<T> {
    pub const fn new(key: &'static str, header: &'static str, render: fn(&T) -> String) -> Self {
        Self { key, header, render }
    }
}

/// Tudo que uma linha precisa expor para ser listada, filtrada e exportada.
pub trait Record: Clone + Send + Sync + Serialize + 'static {
    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Campos concatenados para a busca livre.
    fn search_fields(&self) -> Vec<String>;

    /// Chaves aceitas como filtro categórico (igualdade exata).
    fn filter_keys() -> &'static [&'static str] {
        &[]
    }

    fn filter_value(&self, _key: &str) -> Option<String> {
        None
    }

    /// Ordem de listagem. O padrão é a ordem de inserção.
    fn sort_rows(_rows: &mut [Self]) {}

    fn columns() -> Vec<Column<Self>>;

    fn search_text(&self) -> String {
        self.search_fields().join(" ").to_lowercase()
    }
}

// Parâmetros de controle; qualquer outra chave da query string é filtro.
const RESERVED_PARAMS: &[&str] = &["q", "page", "pageSize", "key", "format"];

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub q: String,
    pub filters: BTreeMap<String, String>,
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            q: String::new(),
            filters: BTreeMap::new(),
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn from_params(
        params: &HashMap<String, String>,
        default_page_size: usize,
        allowed_filters: &[&str],
    ) -> Result<Self, AppError> {
        let mut query = Self::new(default_page_size);
        if let Some(q) = params.get("q") {
            query = query.with_search(q);
        }

        // page começa em 1; ausente, 0 ou inválido vira 1
        query = query.with_page(
            params
                .get("page")
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(1),
        );

        if let Some(size) = params.get("pageSize").and_then(|s| s.parse::<usize>().ok()) {
            query.page_size = size.clamp(1, MAX_PAGE_SIZE);
        }

        for (key, value) in params {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                continue;
            }
            if !allowed_filters.contains(&key.as_str()) {
                return Err(AppError::UnknownFilter(key.clone()));
            }
            let value = value.trim();
            if !value.is_empty() {
                query = query.with_filter(key, value);
            }
        }

        // O cliente devolve a chave da consulta anterior. Se os filtros mudaram,
        // a página volta para 1.
        if let Some(previous) = params.get("key") {
            if *previous != query.query_key() {
                query.page = 1;
            }
        }

        Ok(query)
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filters.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_search(mut self, q: &str) -> Self {
        self.q = q.trim().to_lowercase();
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Forma canônica das entradas de filtro (sem a página).
    pub fn query_key(&self) -> String {
        let mut parts = vec![format!("q={}", self.q)];
        parts.extend(self.filters.iter().map(|(k, v)| format!("{}={}", k, v)));
        parts.join("&")
    }

    pub fn matches<T: Record>(&self, row: &T) -> bool {
        let filters_ok = self
            .filters
            .iter()
            .all(|(key, wanted)| row.filter_value(key).as_deref() == Some(wanted.as_str()));

        filters_ok && (self.q.is_empty() || row.search_text().contains(&self.q))
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// Total filtrado, antes da paginação
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub query_key: String,
}

pub fn filter_rows<T: Record>(rows: Vec<T>, query: &ListQuery) -> Vec<T> {
    rows.into_iter().filter(|row| query.matches(row)).collect()
}

/// Fatia `(page-1)*size .. page*size`. Página além da última devolve vazio.
pub fn paginate<T: Clone>(filtered: &[T], page: usize, page_size: usize) -> Vec<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let start = (page - 1).saturating_mul(page_size);
    if start >= filtered.len() {
        return Vec::new();
    }
    let end = (start + page_size).min(filtered.len());
    filtered[start..end].to_vec()
}

pub fn list_page<T: Record>(mut rows: Vec<T>, query: &ListQuery) -> Page<T> {
    T::sort_rows(&mut rows);
    let filtered = filter_rows(rows, query);
    let total = filtered.len();

    Page {
        rows: paginate(&filtered, query.page, query.page_size),
        total,
        page: query.page,
        page_size: query.page_size,
        total_pages: total.div_ceil(query.page_size),
        query_key: query.query_key(),
    }
}

/// `max(ids existentes, 0) + 1`
pub fn next_id<T: Record>(rows: &[T]) -> i64 {
    rows.iter().map(|r| r.id()).max().unwrap_or(0).max(0) + 1
}
