//! Text analysis over one column, adding a `{kind}_result` column.

use tracing::warn;

use crate::analysis::TextAnalyzer;
use crate::canvas::{AnalysisType, AnalyzeConfig};
use crate::table::{Cell, Table};

/// Runs the analyzer once per row against the configured text field and
/// appends the result column. Rows with empty text get a warning and a Null
/// result; an unsupported analysis kind gets a fixed fallback label. Neither
/// aborts the pass.
pub fn analyze(analyzer: &dyn TextAnalyzer, config: &AnalyzeConfig, input: Table) -> Table {
    let (Some(kind), Some(text_field)) = (&config.analysis_type, &config.text_field) else {
        warn!("analyze operator is missing its analysis type or text field, passing input through");
        return input;
    };

    let result_column = format!("{}_result", kind.tag());
    let mut columns = input.columns.clone();
    columns.push(result_column.clone());

    let rows = input
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            let text = Table::cell(row, text_field).key_string();
            let result = if text.is_empty() || Table::cell(row, text_field).is_null() {
                warn!(field = %text_field, "empty text field in analyze operator, result is null");
                Cell::Null
            } else if let AnalysisType::Unsupported(name) = kind {
                warn!(kind = %name, "unsupported analysis type");
                Cell::Text("Analysis not supported".to_string())
            } else {
                Cell::Text(analyzer.analyze(&text, kind.clone()))
            };
            out.insert(result_column.clone(), result);
            out
        })
        .collect();

    Table {
        name: input.name,
        columns,
        rows,
    }
}
