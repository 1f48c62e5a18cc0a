use serde::Serialize;

use crate::table::{Cell, Table};
use crate::validation::{ColumnError, ColumnResult};

/// Projection result, shaped as three parallel structures.
///
/// `data[i][j]` is the value of `columns[j]` in the row keyed `index[i]`.
/// NA cells serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub columns: Vec<String>,
    pub index: Vec<String>,
    pub data: Vec<Vec<Cell>>,
}

/// Projects `table` onto `columns`.
///
/// `None` selects every column in schema order; an explicit list selects
/// those columns in the order given. Callers validate the list first;
/// names outside the schema are still refused here.
pub fn project(table: &Table, columns: Option<&[String]>) -> ColumnResult<Projection> {
    let schema = table.schema();
    let columns: Vec<String> = match columns {
        Some(list) => list.to_vec(),
        None => schema.columns().to_vec(),
    };

    let mut positions = Vec::with_capacity(columns.len());
    let mut unknown = Vec::new();
    for name in &columns {
        match schema.position(name) {
            Some(pos) => positions.push(pos),
            None => unknown.push(name.clone()),
        }
    }
    if !unknown.is_empty() {
        return Err(ColumnError::UnknownColumns(unknown));
    }

    let index = table.rows().iter().map(|r| r.timestamp().to_string()).collect();
    let data = table
        .rows()
        .iter()
        .map(|row| {
            positions
                .iter()
                .map(|&p| row.values().get(p).cloned().flatten())
                .collect()
        })
        .collect();

    Ok(Projection {
        columns,
        index,
        data,
    })
}
