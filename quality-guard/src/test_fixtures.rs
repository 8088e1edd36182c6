//! Common test fixtures for data quality scenarios.
//!
//! Each fixture exists both as CSV text (for tests that go through files) and
//! as a loaded [`Table`]. The expected findings of each fixture are listed in
//! its documentation.

use chrono::{NaiveDate, NaiveDateTime};

use crate::sources::{CsvOptions, CsvSource};
use crate::table::Table;

/// Product inventory with pricing and stock rule violations.
///
/// - row 2: selling price below cost price, stock below reorder level
/// - row 3: stock below reorder level
/// - row 6: duplicate of row 5
pub const INVENTORY_CSV: &str = "\
product_id,product_name,cost_price,selling_price,current_stock,reorder_level
1,Widget,10.00,15.00,20,5
2,Gadget,12.50,9.99,3,5
3,Gizmo,8.00,12.00,2,4
4,Doohickey,5.00,7.50,10,4
5,Thingamajig,6.00,9.00,8,3
5,Thingamajig,6.00,9.00,8,3
";

/// Customer records with format and completeness problems.
///
/// - `email`: one malformed address (`not-an-email`)
/// - `signup_date`: two dates after [`reference_time`]
/// - `age`: one missing value (12.5%) and one negative value
pub const CUSTOMERS_CSV: &str = "\
customer_id,name,email,signup_date,age
1,Alice,alice@example.com,2023-01-15,34
2,Bob,bob@example.com,2023-03-02,
3,Charlie,not-an-email,2023-05-20,41
4,Diana,diana@example.org,2031-07-01,29
5,Evan,evan@example.net,2022-11-11,-2
6,Fay,fay@example.com,2099-12-31,52
7,Gus,gus@example.com,2024-02-29,38
8,Hana,hana@example.io,2021-08-08,45
";

/// A numeric column without spread, and a clean text column.
pub const CONSTANT_CSV: &str = "\
reading,label
5,a
5,b
5,c
5,d
";

/// The "now" all fixture expectations are computed against.
pub fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

/// Reads CSV text with default options.
///
/// # Panics
///
/// Panics when the text is not valid CSV; fixtures are static.
pub fn table_from_csv(text: &str) -> Table {
    CsvSource::read_table(text.as_bytes(), &CsvOptions::default())
        .unwrap_or_else(|e| panic!("fixture CSV failed to load: {e}"))
}

pub fn inventory_table() -> Table {
    table_from_csv(INVENTORY_CSV)
}

pub fn customers_table() -> Table {
    table_from_csv(CUSTOMERS_CSV)
}

pub fn constant_table() -> Table {
    table_from_csv(CONSTANT_CSV)
}
