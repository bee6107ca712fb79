use crate::domain::model::{Section, TransformedRow};
use crate::utils::error::{ReportError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;

/// 字串原樣輸出，物件與陣列轉成 JSON 文字
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other @ (Value::Array(_) | Value::Object(_))) => other.to_string(),
    }
}

/// Header line plus one line per row. Every cell is double-quoted with
/// embedded quotes doubled; lines are separated by `\n` with no trailing newline.
pub fn serialize(rows: &[TransformedRow], columns: &[String]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|column| render_cell(row.get(column))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::IoError(e.into_error()))?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Labelled sections start with their literal label line; sections are
/// separated by one blank line. A lone unlabelled section is a plain table.
pub fn serialize_sections(sections: &[Section], columns: &[String]) -> Result<String> {
    let parts = sections
        .iter()
        .map(|section| {
            let table = serialize(&section.rows, columns)?;
            Ok(match &section.label {
                Some(label) => format!("{}\n{}", label, table),
                None => table,
            })
        })
        .collect::<Result<Vec<String>>>()?;

    Ok(parts.join("\n\n"))
}
