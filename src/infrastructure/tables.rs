//! CSV-backed tabular input and output
//!
//! Thin wrappers around the `csv` crate: the seed table is read once at job
//! start, and merged/failure tables are written with a header row. The core
//! pipeline itself only works with in-memory tables.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::assembler::Table;
use crate::domain::SeedTable;

/// Load the input table from a CSV file with a header row.
pub fn load_seed_table(path: impl AsRef<Path>) -> Result<SeedTable> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open input table: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header row: {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("failed to read row from: {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let table = SeedTable::new(headers, rows)?;
    tracing::info!("Loaded {} input rows from {}", table.len(), path.display());
    Ok(table)
}

/// Write a table to a CSV file, header row first.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output table: {}", path.display()))?;

    writer
        .write_record(&table.headers)
        .with_context(|| format!("failed to write header row: {}", path.display()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .with_context(|| format!("failed to write row: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush output table: {}", path.display()))?;

    tracing::info!("Wrote {} rows to {}", table.rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MASTER_COLUMN, SEARCH_LINK_COLUMN};

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        std::fs::write(
            &path,
            "Name,PRODUCT_MASTER,Search Link\nMłotek,0,https://stalco.pl/s?q=mlotek\n",
        )
        .unwrap();

        let table = load_seed_table(&path).unwrap();
        assert_eq!(
            table.headers(),
            &["Name", MASTER_COLUMN, SEARCH_LINK_COLUMN]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.search_link(&table.rows()[0]),
            "https://stalco.pl/s?q=mlotek"
        );

        let out_path = dir.path().join("out.csv");
        let out = Table {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["1".to_string(), "2".to_string()]],
        };
        write_table(&out_path, &out).unwrap();
        let written = std::fs::read_to_string(&out_path).unwrap();
        assert_eq!(written, "A,B\n1,2\n");
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Name,Search Link\nMłotek,https://stalco.pl\n").unwrap();

        let err = load_seed_table(&path).unwrap_err();
        assert!(err.to_string().contains(MASTER_COLUMN));
    }
}
