// src/common/export.rs

use serde::Deserialize;
use utoipa::ToSchema;

use crate::common::{error::AppError, listing::Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Arquivo pronto para download.
#[derive(Debug)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub fn export_rows<T: Record>(
    rows: &[T],
    format: ExportFormat,
    base_name: &str,
) -> Result<ExportFile, AppError> {
    match format {
        ExportFormat::Json => Ok(ExportFile {
            file_name: format!("{}.json", base_name),
            content_type: "application/json",
            body: serde_json::to_vec_pretty(rows).map_err(anyhow::Error::from)?,
        }),
        ExportFormat::Csv => Ok(ExportFile {
            file_name: format!("{}.csv", base_name),
            content_type: "text/csv; charset=utf-8",
            body: to_csv(rows)?,
        }),
    }
}

// Cabeçalho vem das colunas; o `csv` cuida das aspas e escapes.
fn to_csv<T: Record>(rows: &[T]) -> Result<Vec<u8>, AppError> {
    let columns = T::columns();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.header))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| (c.render)(row)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Falha ao gerar CSV: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::listing::Column;
    use serde::Serialize;

    #[derive(Clone, Serialize)]
    struct Note {
        id: i64,
        text: String,
    }

    impl Record for Note {
        fn id(&self) -> i64 {
            self.id
        }
        fn set_id(&mut self, id: i64) {
            self.id = id;
        }
        fn search_fields(&self) -> Vec<String> {
            vec![self.text.clone()]
        }
        fn columns() -> Vec<Column<Self>> {
            vec![
                Column::new("id", "ID", |n| n.id.to_string()),
                Column::new("text", "Text", |n| n.text.clone()),
            ]
        }
    }

    #[test]
    fn csv_quotes_commas_and_doubles_inner_quotes() {
        let rows = vec![Note {
            id: 1,
            text: "say \"hi\", then leave".into(),
        }];
        let file = export_rows(&rows, ExportFormat::Csv, "notes").unwrap();
        let text = String::from_utf8(file.body).unwrap();

        assert_eq!(file.file_name, "notes.csv");
        assert_eq!(text, "ID,Text\n1,\"say \"\"hi\"\", then leave\"\n");
    }

    #[test]
    fn json_export_is_an_array_of_rows() {
        let rows = vec![
            Note { id: 1, text: "a".into() },
            Note { id: 2, text: "b".into() },
        ];
        let file = export_rows(&rows, ExportFormat::Json, "notes").unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&file.body).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        assert_eq!(file.content_type, "application/json");
    }
}
