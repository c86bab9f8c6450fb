//! Output: the cleaned transaction file and the plain-text sales report.

use crate::aggregate::{region_wise_sales, top_products, total_revenue, ProductSales, RegionSales};
use crate::error::Result;
use crate::money::Money;
use crate::reader::DELIMITER;
use crate::transaction::{Transaction, HEADER};
use crate::validator::{FilterOutcome, FilterSummary};
use csv::WriterBuilder;
use std::io::Write;

const RULE: &str = "========================================";

/// Everything the text report shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport {
    pub summary: FilterSummary,
    pub total_revenue: Money,
    pub regions: Vec<RegionSales>,
    pub top_products: Vec<ProductSales>,
    pub top_n: usize,
}

impl SalesReport {
    /// Runs every aggregation over the transactions in `outcome`.
    pub fn build(outcome: &FilterOutcome, top_n: usize) -> Self {
        SalesReport {
            summary: outcome.summary,
            total_revenue: total_revenue(&outcome.transactions),
            regions: region_wise_sales(&outcome.transactions),
            top_products: top_products(&outcome.transactions, top_n),
            top_n,
        }
    }
}

/// Writes transactions as a pipe-delimited file with a header row.
///
/// The header is written even when there are no transactions.
pub fn write_transactions<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for tx in transactions {
        csv_writer.serialize(tx)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Renders the report as plain text.
pub fn write_report<W: Write>(mut writer: W, report: &SalesReport) -> Result<()> {
    let s = &report.summary;

    writeln!(writer, "{}", RULE)?;
    writeln!(writer, "SALES ANALYTICS REPORT")?;
    writeln!(writer, "{}", RULE)?;
    writeln!(writer)?;

    writeln!(writer, "FILTER SUMMARY")?;
    writeln!(writer, "{:<28}{}", "Total input records:", s.total_input)?;
    writeln!(writer, "{:<28}{}", "Invalid records:", s.invalid)?;
    writeln!(writer, "{:<28}{}", "Removed by region filter:", s.filtered_out_region_count)?;
    writeln!(writer, "{:<28}{}", "Removed by min amount:", s.filtered_out_min_amt_count)?;
    writeln!(writer, "{:<28}{}", "Removed by max amount:", s.filtered_out_max_amt_count)?;
    writeln!(writer, "{:<28}{}", "Final transactions:", s.final_count)?;
    writeln!(writer)?;

    writeln!(writer, "TOTAL REVENUE: {}", report.total_revenue)?;
    writeln!(writer)?;

    writeln!(writer, "REGION-WISE SALES")?;
    writeln!(
        writer,
        "{:<8}{:>16}{:>14}{:>10}",
        "Region", "Sales", "Transactions", "Share"
    )?;
    for region in &report.regions {
        writeln!(
            writer,
            "{:<8}{:>16}{:>14}{:>9}%",
            region.region.to_string(),
            region.total_sales.to_string(),
            region.transaction_count,
            region.percentage.to_string()
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "TOP {} PRODUCTS", report.top_n)?;
    writeln!(
        writer,
        "{:<6}{:<24}{:>10}{:>16}",
        "Rank", "Product", "Quantity", "Revenue"
    )?;
    for (rank, product) in report.top_products.iter().enumerate() {
        writeln!(
            writer,
            "{:<6}{:<24}{:>10}{:>16}",
            rank + 1,
            product.product_name,
            product.total_quantity,
            product.total_revenue.to_string()
        )?;
    }

    writer.flush()?;
    Ok(())
}
