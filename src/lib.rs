//! # Sales Analytics
//!
//! Cleans, validates, filters and summarizes pipe-delimited sales
//! transaction files.
//!
//! ## Pipeline
//!
//! - [`reader`]: decode the file (with encoding fallback), drop the header
//!   and blank rows
//! - [`parser`]: split rows into typed [`ParsedRecord`]s, discarding
//!   malformed ones
//! - [`validator`]: apply the business rules and the optional region /
//!   amount filters, with per-stage accounting
//! - [`aggregate`]: total revenue, region-wise sales, top products
//! - [`report`]: cleaned-data file and text report
//!
//! Each stage is a plain function over the previous stage's output. Bad rows
//! never abort a run; they are counted instead.
//!
//! ## Example
//!
//! ```
//! use sales_analytics::{parse_transactions, total_revenue, validate_and_filter, FilterCriteria};
//!
//! let lines = [
//!     "T001|2024-12-01|P101|Laptop|2|45,000|C001|North",
//!     "T002|2024-12-01|P102|Mouse|38|500|C002|South",
//! ];
//! let parsed = parse_transactions(&lines);
//! let outcome = validate_and_filter(&parsed.records, &FilterCriteria::new());
//! assert_eq!(total_revenue(&outcome.transactions).to_string(), "109000.00");
//! ```

pub mod aggregate;
pub mod error;
pub mod money;
pub mod parser;
pub mod reader;
pub mod report;
pub mod transaction;
pub mod validator;

pub use aggregate::{
    region_wise_sales, top_products, total_revenue, ProductSales, RegionSales, DEFAULT_TOP_N,
};
pub use error::{Result, SalesError};
pub use money::Money;
pub use parser::{parse_transactions, ParseOutput};
pub use reader::{read_lines, read_lines_or_empty, TextEncoding, DEFAULT_ENCODINGS};
pub use report::{write_report, write_transactions, SalesReport};
pub use transaction::{Coerced, ParsedRecord, Region, RegionKey, Transaction};
pub use validator::{
    filter_options, validate_and_filter, validate_record, FilterCriteria, FilterOptions,
    FilterOutcome, FilterSummary, Rejection,
};
