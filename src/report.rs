//! Report rendering for search results: console table, HTML and JSON export

use std::path::Path;

use crate::catalog::ProductEntry;
use crate::error::Result;

const NUMBER_WIDTH: usize = 5;
const NAME_MIN_WIDTH: usize = 12;
const PRICE_WIDTH: usize = 8;
const WEIGHT_WIDTH: usize = 6;
const FILE_MIN_WIDTH: usize = 4;

/// Formats entries as a fixed-width table, numbered from 1.
///
/// Name and file columns grow to fit the longest value.
pub fn format_table(entries: &[ProductEntry]) -> String {
    let name_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(NAME_MIN_WIDTH);
    let file_width = entries
        .iter()
        .map(|e| e.source_file.chars().count())
        .max()
        .unwrap_or(0)
        .max(FILE_MIN_WIDTH);

    let mut output = format!(
        "{:<nw$}  {:<name_width$}  {:>pw$}  {:>ww$}  {:<file_width$}  {}\n",
        "№",
        "Наименование",
        "Цена",
        "Вес",
        "Файл",
        "Цена за кг.",
        nw = NUMBER_WIDTH,
        pw = PRICE_WIDTH,
        ww = WEIGHT_WIDTH,
    );

    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "{:<nw$}  {:<name_width$}  {:>pw$}  {:>ww$}  {:<file_width$}  {}\n",
            i + 1,
            entry.name,
            entry.price,
            entry.weight,
            entry.source_file,
            entry.unit_price,
            nw = NUMBER_WIDTH,
            pw = PRICE_WIDTH,
            ww = WEIGHT_WIDTH,
        ));
    }

    output
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders entries as a standalone HTML page with one table row per entry
pub fn render_html(entries: &[ProductEntry]) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Позиции продуктов</title>
    <style>
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid black; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
    </style>
</head>
<body>
    <h2>Позиции продуктов</h2>
    <table>
        <tr><th>№</th><th>Наименование</th><th>Цена</th><th>Вес</th><th>Файл</th><th>Цена за кг.</th></tr>
"#,
    );

    for (i, entry) in entries.iter().enumerate() {
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            i + 1,
            escape_html(&entry.name),
            entry.price,
            entry.weight,
            escape_html(&entry.source_file),
            entry.unit_price
        ));
    }

    html.push_str("    </table>\n</body>\n</html>\n");
    html
}

/// Write the HTML rendering of `entries` to `path`
pub fn export_html(entries: &[ProductEntry], path: &Path) -> Result<()> {
    std::fs::write(path, render_html(entries))?;
    log::info!("Exported {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Structured export of the result list
pub fn render_json(entries: &[ProductEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}
