//! Result assembly
//!
//! Left outer join of the original input rows with the extracted product
//! records on the search link. Every original column is preserved; rows
//! whose link never produced a record get empty extraction fields. This is
//! a pure function of its inputs, no I/O.

use std::collections::HashMap;

use crate::domain::{FailureRecord, ProductRecord, SeedTable};

/// Column names appended to the original header, in output order.
pub const EXTRACTION_COLUMNS: [&str; 11] = [
    "Product URL",
    "Title",
    "Short Description",
    "Full Description",
    "Brand",
    "SKU",
    "EAN",
    "Price Gross",
    "Price Net",
    "Images",
    "Videos",
];

/// A flat table with a header row, ready for an output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Merge extraction results onto the original rows.
///
/// The output has exactly one row per input row regardless of crawl
/// outcome; multiple input rows sharing a search link all receive the same
/// record's fields.
pub fn merge(seeds: &SeedTable, records: &[ProductRecord]) -> Table {
    let by_link: HashMap<&str, &ProductRecord> = records
        .iter()
        .map(|record| (record.search_link.as_str(), record))
        .collect();

    let mut headers = seeds.headers().to_vec();
    headers.extend(EXTRACTION_COLUMNS.iter().map(|c| c.to_string()));

    let width = seeds.headers().len();
    let mut rows = Vec::with_capacity(seeds.len());
    for row in seeds.rows() {
        let mut out = row.clone();
        // Pad ragged rows so extraction fields land in their own columns.
        out.resize(width, String::new());

        match by_link.get(seeds.search_link(row)) {
            Some(record) => {
                out.push(record.product_url.clone());
                out.push(record.title.clone());
                out.push(record.short_description_html.clone());
                out.push(record.full_description_html.clone());
                out.push(record.brand.clone());
                out.push(record.sku.clone());
                out.push(record.ean.clone());
                out.push(record.price_gross.clone());
                out.push(record.price_net.clone());
                out.push(record.images.join(","));
                out.push(record.videos.join(","));
            }
            None => out.extend(std::iter::repeat_n(String::new(), EXTRACTION_COLUMNS.len())),
        }

        rows.push(out);
    }

    Table { headers, rows }
}

/// Build the secondary failure table.
pub fn failure_table(failures: &[FailureRecord]) -> Table {
    Table {
        headers: vec!["Search Link".to_string(), "Reason".to_string()],
        rows: failures
            .iter()
            .map(|f| vec![f.search_link.clone(), f.reason.clone()])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MASTER_COLUMN, SEARCH_LINK_COLUMN};

    fn seeds(rows: &[(&str, &str)]) -> SeedTable {
        SeedTable::new(
            vec![
                "Name".to_string(),
                MASTER_COLUMN.to_string(),
                SEARCH_LINK_COLUMN.to_string(),
            ],
            rows.iter()
                .map(|(m, l)| vec![format!("name-{m}"), m.to_string(), l.to_string()])
                .collect(),
        )
        .unwrap()
    }

    fn record(link: &str) -> ProductRecord {
        ProductRecord {
            search_link: link.to_string(),
            product_url: format!("{link}/product"),
            title: "Młotek".to_string(),
            short_description_html: "<p>k</p>".to_string(),
            full_description_html: "<p>f</p>".to_string(),
            brand: "Stalco".to_string(),
            sku: "S-1".to_string(),
            ean: "590".to_string(),
            price_gross: "49,99".to_string(),
            price_net: "40,64".to_string(),
            images: vec!["i1".to_string(), "i2".to_string()],
            videos: vec![],
        }
    }

    #[test]
    fn test_join_preserves_every_input_row() {
        let seeds = seeds(&[("0", "L1"), ("A", "L2"), ("A", "L3")]);
        let merged = merge(&seeds, &[record("L1")]);

        assert_eq!(merged.rows.len(), 3);
        assert_eq!(
            merged.headers.len(),
            seeds.headers().len() + EXTRACTION_COLUMNS.len()
        );
        for row in &merged.rows {
            assert_eq!(row.len(), merged.headers.len());
        }
    }

    #[test]
    fn test_matched_row_carries_fields_and_unmatched_stays_empty() {
        let seeds = seeds(&[("0", "L1"), ("A", "L2")]);
        let merged = merge(&seeds, &[record("L1")]);

        let matched = &merged.rows[0];
        assert_eq!(matched[3], "L1/product");
        assert_eq!(matched[4], "Młotek");
        assert_eq!(matched[12], "i1,i2");

        let unmatched = &merged.rows[1];
        assert!(unmatched[3..].iter().all(String::is_empty));
    }

    #[test]
    fn test_variant_rows_inherit_nothing_without_record() {
        // L3 was never a crawl target; its row still appears, empty.
        let seeds = seeds(&[("A", "L2"), ("A", "L3")]);
        let merged = merge(&seeds, &[record("L2")]);

        assert_eq!(merged.rows[0][4], "Młotek");
        assert!(merged.rows[1][3..].iter().all(String::is_empty));
    }

    #[test]
    fn test_failure_table_shape() {
        let table = failure_table(&[FailureRecord {
            search_link: "L2".to_string(),
            reason: "No product found".to_string(),
        }]);
        assert_eq!(table.headers, vec!["Search Link", "Reason"]);
        assert_eq!(table.rows, vec![vec!["L2", "No product found"]]);
    }
}
