//! HTML table to GitHub-flavored Markdown table conversion.

use dom_query::NodeRef;
use unicode_width::UnicodeWidthStr;

use super::utils::{collapse_whitespace, escape_markdown, matches_tag};

/// Convert an HTML table element into Markdown table syntax.
///
/// Handles tables with `thead`, `tbody`, `tfoot` sections, or direct `tr`
/// children. The first row becomes the header row.
///
/// # Arguments
/// * `element` - The `<table>` node whose content should be rendered.
/// * `compact` - Skip padding cells to a common column width.
///
/// # Returns
/// A Markdown fragment surrounded by newlines, or an empty string when the
/// table has no cells.
pub fn convert_table_to_markdown(element: &NodeRef, compact: bool) -> String {
  let mut tr_elements = Vec::new();

  for child in element.children() {
    if matches_tag(&child, "tr") {
      tr_elements.push(child);
    } else if matches_tag(&child, "tbody") || matches_tag(&child, "thead") || matches_tag(&child, "tfoot") {
      tr_elements.extend(child.children().into_iter().filter(|n| matches_tag(n, "tr")));
    }
  }

  let rows: Vec<Vec<String>> = tr_elements
    .iter()
    .map(|tr| {
      tr.children()
        .into_iter()
        .filter(|cell| matches_tag(cell, "th") || matches_tag(cell, "td"))
        .map(|cell| cell_text(&cell))
        .collect::<Vec<_>>()
    })
    .filter(|cells| !cells.is_empty())
    .collect();

  render_markdown_table(rows, compact).unwrap_or_default()
}

fn cell_text(cell: &NodeRef) -> String {
  escape_markdown(collapse_whitespace(&cell.text()).trim(), false).replace('|', "\\|")
}

/// Render rows as a Markdown table, the first row being the header.
///
/// Returns `None` when there is nothing to render.
pub fn render_markdown_table(mut rows: Vec<Vec<String>>, compact: bool) -> Option<String> {
  let column_count = rows.iter().map(Vec::len).max()?;
  if column_count == 0 {
    return None;
  }

  for row in &mut rows {
    row.resize(column_count, String::new());
  }

  let column_widths: Vec<usize> = if compact {
    vec![3; column_count]
  } else {
    (0..column_count)
      .map(|index| rows.iter().map(|row| row[index].width()).max().unwrap_or(0).max(3))
      .collect()
  };

  let mut result = String::from("\n");
  let mut rows = rows.iter();

  if let Some(header) = rows.next() {
    result.push_str(&format_row(header, &column_widths, compact));

    result.push('|');
    for width in &column_widths {
      result.push(' ');
      result.push_str(&"-".repeat(*width));
      result.push_str(" |");
    }
    result.push('\n');
  }

  for row in rows {
    result.push_str(&format_row(row, &column_widths, compact));
  }

  result.push('\n');
  Some(result)
}

fn format_row(row: &[String], column_widths: &[usize], compact: bool) -> String {
  let mut line = String::from("|");

  for (cell, width) in row.iter().zip(column_widths) {
    line.push(' ');
    line.push_str(cell);
    let cell_width = cell.width();
    if !compact && *width > cell_width {
      line.push_str(&" ".repeat(width - cell_width));
    }
    line.push_str(" |");
  }

  line.push('\n');
  line
}
