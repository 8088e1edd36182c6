//! Integration tests for affected-row resolution.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use quality_guard::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn resolver() -> AffectedRowResolver {
    AffectedRowResolver::new().with_reference_time(reference_time())
}

/// Orders file with 12 rows; every third row lacks a quantity.
fn orders_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("orders.csv");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "order_id,quantity,shipped").unwrap();
    for id in 1..=12 {
        let quantity = if id % 3 == 0 {
            String::new()
        } else {
            (id * 2).to_string()
        };
        writeln!(file, "{id},{quantity},2024-0{}-10", 1 + id % 9).unwrap();
    }
    file.flush().unwrap();
    path
}

#[test]
fn test_pages_partition_the_matching_rows() {
    let dir = TempDir::new().unwrap();
    let path = orders_file(&dir);

    let full = resolver()
        .resolve_file(&path, &AffectedRowsQuery::new("Missing Values").column("quantity"))
        .unwrap();
    assert_eq!(full.total_count, 4);
    let expected: Vec<usize> = full.rows.iter().map(|r| r.row_index()).collect();
    assert_eq!(expected, vec![3, 6, 9, 12]);

    let mut paged = Vec::new();
    let mut offset = 0;
    loop {
        let query = AffectedRowsQuery::new("Missing Values")
            .column("quantity")
            .limit(3)
            .offset(offset);
        let page = resolver().resolve_file(&path, &query).unwrap();
        assert_eq!(page.total_count, 4);
        paged.extend(page.rows.iter().map(|r| r.row_index()));
        if !page.has_more {
            break;
        }
        offset += 3;
    }
    assert_eq!(paged, expected);
}

#[test]
fn test_resolution_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let path = orders_file(&dir);
    let query = AffectedRowsQuery::new("Missing Values")
        .column("quantity")
        .limit(2);

    let first = resolver().resolve_file(&path, &query).unwrap();
    let second = resolver().resolve_file(&path, &query).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_page_shape() {
    let dir = TempDir::new().unwrap();
    let path = orders_file(&dir);
    let query = AffectedRowsQuery::new("Missing Values")
        .column("quantity")
        .limit(1);

    let page = resolver().resolve_file(&path, &query).unwrap();
    let value = serde_json::to_value(&page).unwrap();

    assert_eq!(
        value["columns"],
        json!(["row_index", "order_id", "quantity", "shipped"])
    );
    assert_eq!(value["rows"][0]["row_index"], json!(3));
    assert_eq!(value["rows"][0]["order_id"], json!(3));
    assert_eq!(value["rows"][0]["quantity"], Value::Null);
    assert_eq!(value["total_count"], json!(4));
    assert_eq!(value["has_more"], json!(true));
    assert_eq!(value["affected_column"], json!("quantity"));
}

#[test]
fn test_unknown_issue_type_gives_empty_page() {
    let dir = TempDir::new().unwrap();
    let path = orders_file(&dir);

    let page = resolver()
        .resolve_file(&path, &AffectedRowsQuery::new("Spelling Mistakes").column("quantity"))
        .unwrap();
    assert_eq!(page.total_count, 0);
    assert!(!page.has_more);
    assert_eq!(page.columns.len(), 4);
}

#[test]
fn test_unknown_column_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let path = orders_file(&dir);

    let err = resolver()
        .resolve_file(&path, &AffectedRowsQuery::new("Missing Values").column("discount"))
        .unwrap_err();
    assert!(matches!(err, QualityError::UnsupportedColumn { ref column } if column == "discount"));
}

#[test]
fn test_future_dates_follow_reference_time() {
    let dir = TempDir::new().unwrap();
    let path = orders_file(&dir);
    let query = AffectedRowsQuery::new("Invalid Date").column("shipped");

    // shipping months run 1..=9; June through September are after June 1st
    let page = resolver().resolve_file(&path, &query).unwrap();
    assert!(page.rows.iter().all(|row| {
        let shipped = row.get("shipped").and_then(Value::as_str).unwrap();
        shipped > "2024-06-01"
    }));
    assert_eq!(page.total_count, 4);

    let later = NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let none = AffectedRowResolver::new()
        .with_reference_time(later)
        .resolve_file(&path, &query)
        .unwrap();
    assert_eq!(none.total_count, 0);
}

#[test]
fn test_logical_without_column_uses_price_pair() {
    let table = Table::from_rows(
        &["sku", "cost_price", "selling_price", "cost_price_old"],
        &[
            vec![Some("a"), Some("5"), Some("4"), Some("1")],
            vec![Some("b"), Some("5"), Some("6"), Some("9")],
            vec![Some("c"), None, Some("1"), Some("9")],
        ],
    )
    .unwrap();

    let page = resolver()
        .resolve_table(&table, &AffectedRowsQuery::new("Logical Inconsistency"))
        .unwrap();
    let rows: Vec<usize> = page.rows.iter().map(|r| r.row_index()).collect();
    assert_eq!(rows, vec![1]);
}
