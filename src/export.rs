use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::state::AppState;

pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Writes the table as currently displayed (rank, visible columns, filter
/// and sort applied) to a new workbook in `dir`.
pub fn export_view(state: &AppState, dir: &Path) -> Result<ExportReport> {
    let view = state.view();
    let columns: Vec<String> = view
        .frozen_columns
        .iter()
        .chain(view.scrollable_columns.iter())
        .cloned()
        .collect();

    let mut table = Vec::with_capacity(view.rows.len() + 1);
    table.push(columns.clone());
    for (position, row) in view.rows.iter().enumerate() {
        table.push(
            columns
                .iter()
                .map(|column| state.cell_text(column, row, position))
                .collect(),
        );
    }

    let label = view
        .selected_season
        .as_param()
        .map(sanitize)
        .unwrap_or_else(|| "unset".to_string());
    let path = dir.join(format!(
        "sel_{label}_{}.xlsx",
        Local::now().format("%Y%m%d_%H%M%S")
    ));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Table")?;
        write_rows(sheet, &table)?;
    }
    workbook
        .save(&path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        path,
        rows: table.len().saturating_sub(1),
        columns: columns.len(),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
