//! Table layout and the schema text given to the model

use once_cell::sync::Lazy;
use pmrag_config::PostgresConfig;
use pmrag_core::Record;
use regex::Regex;
use sqlx::PgPool;
use sqlx::Row;
use tracing::debug;

use crate::error::{PostgresError, PostgresResult};
use crate::row::decode_rows;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Accept only plain identifiers; these get interpolated into SQL
pub fn validate_identifier(name: &str) -> PostgresResult<&str> {
    if IDENTIFIER_RE.is_match(name) {
        Ok(name)
    } else {
        Err(PostgresError::InvalidIdentifier(name.to_string()))
    }
}

/// Validated names of the embedded table and its key columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Schema
    pub schema: String,
    /// Table
    pub table: String,
    /// Primary identifier column
    pub id_column: String,
    /// Label column
    pub label_column: String,
    /// Embedding column
    pub embedding_column: String,
    /// Columns whose text is embedded
    pub text_columns: Vec<String>,
}

impl TableLayout {
    /// Validate every configured name
    pub fn from_config(config: &PostgresConfig) -> PostgresResult<Self> {
        let text_columns = config
            .text_columns
            .iter()
            .map(|c| validate_identifier(c).map(str::to_string))
            .collect::<PostgresResult<Vec<_>>>()?;

        Ok(Self {
            schema: validate_identifier(&config.schema)?.to_string(),
            table: validate_identifier(&config.table)?.to_string(),
            id_column: validate_identifier(&config.id_column)?.to_string(),
            label_column: validate_identifier(&config.label_column)?.to_string(),
            embedding_column: validate_identifier(&config.embedding_column)?.to_string(),
            text_columns,
        })
    }

    /// `schema.table`
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

/// One column from `information_schema.columns`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Rendered type, arrays as `element[]`
    pub data_type: String,
}

impl ColumnInfo {
    fn from_catalog(name: String, data_type: String, udt_name: String) -> Self {
        let data_type = if data_type == "ARRAY" {
            format!("{}[]", udt_name.trim_start_matches('_'))
        } else {
            data_type
        };
        Self { name, data_type }
    }
}

/// Columns of the layout's table in ordinal order
pub async fn table_columns(pool: &PgPool, layout: &TableLayout) -> PostgresResult<Vec<ColumnInfo>> {
    let rows = sqlx::query(
        r#"
        SELECT column_name::text AS column_name,
               data_type::text AS data_type,
               udt_name::text AS udt_name
        FROM information_schema.columns
        WHERE table_schema = $1 AND table_name = $2
        ORDER BY ordinal_position
        "#,
    )
    .bind(&layout.schema)
    .bind(&layout.table)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(ColumnInfo::from_catalog(
                row.try_get("column_name")?,
                row.try_get("data_type")?,
                row.try_get("udt_name")?,
            ))
        })
        .collect()
}

/// `CREATE TABLE` text plus sample rows, as shown to the model
pub async fn describe_table(
    pool: &PgPool,
    layout: &TableLayout,
    sample_rows: usize,
) -> PostgresResult<String> {
    let columns = table_columns(pool, layout).await?;
    if columns.is_empty() {
        return Err(PostgresError::Query(format!(
            "table {} not found or has no columns",
            layout.qualified_table()
        )));
    }

    let samples = if sample_rows > 0 {
        let visible: Vec<&str> = columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| *name != layout.embedding_column)
            .filter(|name| validate_identifier(name).is_ok())
            .collect();
        let sql = format!(
            "SELECT {} FROM {} LIMIT {}",
            visible.join(", "),
            layout.qualified_table(),
            sample_rows
        );
        let rows = sqlx::query(&sql).fetch_all(pool).await?;
        decode_rows(&rows)?
    } else {
        Vec::new()
    };

    debug!(
        table = %layout.qualified_table(),
        columns = columns.len(),
        samples = samples.len(),
        "described table"
    );
    Ok(render_table_info(layout, &columns, &samples))
}

/// Render table info in the shape models know from SQL dumps
pub fn render_table_info(layout: &TableLayout, columns: &[ColumnInfo], samples: &[Record]) -> String {
    let mut out = format!("CREATE TABLE {} (\n", layout.qualified_table());
    let defs: Vec<String> = columns
        .iter()
        .map(|c| format!("\t{} {}", c.name, c.data_type))
        .collect();
    out.push_str(&defs.join(",\n"));
    out.push_str("\n)");

    if let Some(first) = samples.first() {
        out.push_str(&format!(
            "\n\n/*\n{} rows from {} table:\n",
            samples.len(),
            layout.table
        ));
        let header: Vec<&str> = first.columns().collect();
        out.push_str(&header.join("\t"));
        out.push('\n');
        for record in samples {
            let cells: Vec<String> = record
                .iter()
                .map(|(_, v)| truncate_cell(&v.to_string()))
                .collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out.push_str("*/");
    }
    out
}

const MAX_CELL_CHARS: usize = 100;

fn truncate_cell(text: &str) -> String {
    let flat = text.replace(['\n', '\t'], " ");
    if flat.chars().count() > MAX_CELL_CHARS {
        let cut: String = flat.chars().take(MAX_CELL_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmrag_core::Value;

    fn layout() -> TableLayout {
        TableLayout::from_config(&PostgresConfig::default()).unwrap()
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("data_filtered").is_ok());
        assert!(validate_identifier("_x1").is_ok());
        assert!(validate_identifier("1table").is_err());
        assert!(validate_identifier("users; DROP TABLE users").is_err());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("a.b").is_err());
    }

    #[test]
    fn test_layout_rejects_bad_column() {
        let config = PostgresConfig {
            text_columns: vec!["description".to_string(), "x--".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            TableLayout::from_config(&config),
            Err(PostgresError::InvalidIdentifier(ref n)) if n == "x--"
        ));
    }

    #[test]
    fn test_array_type_rendering() {
        let col = ColumnInfo::from_catalog("embeddings".into(), "ARRAY".into(), "_float8".into());
        assert_eq!(col.data_type, "float8[]");
    }

    #[test]
    fn test_render_table_info_with_samples() {
        let columns = vec![
            ColumnInfo { name: "pyid".into(), data_type: "text".into() },
            ColumnInfo { name: "pylabel".into(), data_type: "text".into() },
            ColumnInfo { name: "embeddings".into(), data_type: "float8[]".into() },
        ];
        let samples = vec![Record::new()
            .with("pyid", "US-1")
            .with("pylabel", Value::Text("Login\npage".into()))];

        let text = render_table_info(&layout(), &columns, &samples);
        assert!(text.starts_with("CREATE TABLE public.data_filtered (\n\tpyid text,"));
        assert!(text.contains("\tembeddings float8[]\n)"));
        assert!(text.contains("1 rows from data_filtered table:\npyid\tpylabel\nUS-1\tLogin page\n*/"));
    }

    #[test]
    fn test_render_without_samples() {
        let columns = vec![ColumnInfo { name: "pyid".into(), data_type: "text".into() }];
        let text = render_table_info(&layout(), &columns, &[]);
        assert_eq!(text, "CREATE TABLE public.data_filtered (\n\tpyid text\n)");
    }

    #[test]
    fn test_truncate_cell() {
        let long = "x".repeat(150);
        assert_eq!(truncate_cell(&long).len(), MAX_CELL_CHARS + 3);
    }
}
