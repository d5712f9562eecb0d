use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::config::Config;
use crate::error::TableError;
use crate::models::{COLUMNS, ItemRecord, Table};

/// Writes the table as CSV with an unlabeled leading row-index column.
pub fn save(table: &Table, path: &Path) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);

    writer.write_record(std::iter::once("").chain(COLUMNS))?;
    for (index, record) in table.rows().iter().enumerate() {
        let index = index.to_string();
        writer.write_record(
            std::iter::once(index.as_str()).chain(record.fields().iter().map(|(_, value)| *value)),
        )?;
    }
    writer.flush()?;

    info!(rows = table.len(), path = %path.display(), "table saved");
    Ok(())
}

/// Saves a capture to `config.table_path`, the file reload mode reads, once it
/// holds exactly `config.target_rows` rows. Returns whether it was written.
pub fn save_if_complete(table: &Table, config: &Config) -> Result<bool, TableError> {
    if table.len() != config.target_rows {
        return Ok(false);
    }
    save(table, &config.table_path)?;
    Ok(true)
}

/// Reads a table written by [`save`]. A leading index column is dropped when present.
pub fn load(path: &Path) -> Result<Table, TableError> {
    let mut reader = csv::Reader::from_reader(File::open(path)?);

    let headers = reader.headers()?.clone();
    let skip = usize::from(has_index_column(&headers));
    let columns: StringRecord = headers.iter().skip(skip).collect();
    if !columns.iter().eq(COLUMNS) {
        return Err(TableError::Schema {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let raw = result?;
        let row: StringRecord = raw.iter().skip(skip).collect();
        rows.push(row.deserialize::<ItemRecord>(Some(&columns))?);
    }

    info!(rows = rows.len(), path = %path.display(), "table loaded");
    Ok(Table::from(rows))
}

fn has_index_column(headers: &StringRecord) -> bool {
    headers.len() == COLUMNS.len() + 1 && headers.get(0) != Some(COLUMNS[0])
}
