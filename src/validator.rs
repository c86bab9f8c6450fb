//! Validation and filter engine.
//!
//! Every parsed record is checked against the business rules; records that
//! fail are counted and dropped. The valid set then passes through up to
//! three optional filters, always in the order region → minimum amount →
//! maximum amount, each working on what the previous one kept.

use crate::money::Money;
use crate::transaction::{ParsedRecord, Transaction};
use log::{debug, info};
use std::collections::BTreeSet;
use thiserror::Error;

/// Optional narrowing applied after validation.
///
/// An unset field disables its filter stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Keep records in this region (case-insensitive, whitespace ignored).
    pub region: Option<String>,

    /// Keep records whose amount is at least this.
    pub min_amount: Option<Money>,

    /// Keep records whose amount is at most this.
    pub max_amount: Option<Money>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn min_amount(mut self, amount: Money) -> Self {
        self.min_amount = Some(amount);
        self
    }

    pub fn max_amount(mut self, amount: Money) -> Self {
        self.max_amount = Some(amount);
        self
    }
}

/// Reason a record was counted as invalid. The first failing rule wins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("transaction ID '{0}' does not start with 'T'")]
    BadTransactionId(String),

    #[error("product ID '{0}' does not start with 'P'")]
    BadProductId(String),

    #[error("customer ID '{0}' does not start with 'C'")]
    BadCustomerId(String),

    #[error("{field} '{raw}' is not numeric")]
    NotNumeric { field: &'static str, raw: String },

    #[error("quantity {0} is not positive")]
    NonPositiveQuantity(i64),

    #[error("unit price {0} is not positive")]
    NonPositivePrice(Money),

    #[error("amount {quantity} x {unit_price} is too large")]
    AmountOverflow { quantity: i64, unit_price: Money },
}

/// Per-stage accounting of a [`validate_and_filter`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_out_region_count: usize,
    pub filtered_out_min_amt_count: usize,
    pub filtered_out_max_amt_count: usize,
    pub final_count: usize,
}

impl FilterSummary {
    /// Records that passed validation, before any filter.
    pub fn valid(&self) -> usize {
        self.total_input - self.invalid
    }

    /// Records left after the region filter.
    pub fn after_region(&self) -> usize {
        self.valid() - self.filtered_out_region_count
    }

    /// Records left after the minimum-amount filter.
    pub fn after_min_amount(&self) -> usize {
        self.after_region() - self.filtered_out_min_amt_count
    }
}

/// Result of validating and filtering a record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Transactions that passed validation and every requested filter.
    pub transactions: Vec<Transaction>,

    /// Records that failed validation.
    pub invalid: usize,

    pub summary: FilterSummary,

    /// Regions and amount range seen before any filter ran.
    pub options: FilterOptions,
}

/// What a caller can filter on: the regions seen across all records and the
/// amount range among valid ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub regions: BTreeSet<String>,

    /// `(min, max)` transaction amount, or `None` without valid records.
    pub amount_range: Option<(Money, Money)>,
}

impl FilterOptions {
    fn collect(records: &[ParsedRecord], valid: &[Transaction]) -> Self {
        let regions = records
            .iter()
            .map(|r| r.region.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();

        let amount_range = valid.iter().map(Transaction::amount).fold(None, |range, amount| {
            Some(match range {
                None => (amount, amount),
                Some((lo, hi)) => (std::cmp::min(lo, amount), std::cmp::max(hi, amount)),
            })
        });

        FilterOptions {
            regions,
            amount_range,
        }
    }
}

/// Computes the [`FilterOptions`] for `records` without filtering.
///
/// [`validate_and_filter`] computes the same value in
/// [`FilterOutcome::options`].
pub fn filter_options(records: &[ParsedRecord]) -> FilterOptions {
    let valid: Vec<Transaction> = records
        .iter()
        .filter_map(|r| validate_record(r).ok())
        .collect();
    FilterOptions::collect(records, &valid)
}

/// Checks one record against the validation rules.
///
/// Returns the typed [`Transaction`] on success.
pub fn validate_record(record: &ParsedRecord) -> Result<Transaction, Rejection> {
    let required = [
        ("TransactionID", record.transaction_id.as_str()),
        ("ProductID", record.product_id.as_str()),
        ("ProductName", record.product_name.as_str()),
        ("Quantity", record.quantity.raw.as_str()),
        ("UnitPrice", record.unit_price.raw.as_str()),
        ("CustomerID", record.customer_id.as_str()),
        ("Region", record.region.as_str()),
    ];
    if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(Rejection::MissingField(*name));
    }

    if !record.transaction_id.starts_with('T') {
        return Err(Rejection::BadTransactionId(record.transaction_id.clone()));
    }
    if !record.product_id.starts_with('P') {
        return Err(Rejection::BadProductId(record.product_id.clone()));
    }
    if !record.customer_id.starts_with('C') {
        return Err(Rejection::BadCustomerId(record.customer_id.clone()));
    }

    let quantity = record.quantity.value.ok_or_else(|| Rejection::NotNumeric {
        field: "Quantity",
        raw: record.quantity.raw.clone(),
    })?;
    let unit_price = record.unit_price.value.ok_or_else(|| Rejection::NotNumeric {
        field: "UnitPrice",
        raw: record.unit_price.raw.clone(),
    })?;

    if quantity <= 0 {
        return Err(Rejection::NonPositiveQuantity(quantity));
    }
    if !unit_price.is_positive() {
        return Err(Rejection::NonPositivePrice(unit_price));
    }
    if unit_price.checked_times(quantity).is_none() {
        return Err(Rejection::AmountOverflow {
            quantity,
            unit_price,
        });
    }

    Ok(Transaction {
        transaction_id: record.transaction_id.clone(),
        date: record.date.clone(),
        product_id: record.product_id.clone(),
        product_name: record.product_name.clone(),
        quantity,
        unit_price,
        customer_id: record.customer_id.clone(),
        region: record.region.clone(),
    })
}

/// Validates `records` and applies the filters in `criteria`.
///
/// The available [`FilterOptions`] are logged at info level before any
/// filter runs. Nothing here fails: rejected records are only counted.
pub fn validate_and_filter(records: &[ParsedRecord], criteria: &FilterCriteria) -> FilterOutcome {
    let mut valid = Vec::with_capacity(records.len());
    let mut invalid = 0;

    for (idx, record) in records.iter().enumerate() {
        match validate_record(record) {
            Ok(tx) => valid.push(tx),
            Err(rejection) => {
                debug!(
                    "Record {} ({}): {}, counted invalid",
                    idx + 1,
                    record.transaction_id,
                    rejection
                );
                invalid += 1;
            }
        }
    }

    let options = FilterOptions::collect(records, &valid);
    report_options(&options);

    let mut transactions = valid;

    let filtered_out_region_count = match &criteria.region {
        Some(region) => {
            let wanted = region.trim().to_lowercase();
            retain_counting(&mut transactions, |tx| {
                tx.region.trim().to_lowercase() == wanted
            })
        }
        None => 0,
    };

    let filtered_out_min_amt_count = match criteria.min_amount {
        Some(min) => retain_counting(&mut transactions, |tx| tx.amount() >= min),
        None => 0,
    };

    let filtered_out_max_amt_count = match criteria.max_amount {
        Some(max) => retain_counting(&mut transactions, |tx| tx.amount() <= max),
        None => 0,
    };

    let summary = FilterSummary {
        total_input: records.len(),
        invalid,
        filtered_out_region_count,
        filtered_out_min_amt_count,
        filtered_out_max_amt_count,
        final_count: transactions.len(),
    };
    debug!("Filter summary: {:?}", summary);

    FilterOutcome {
        transactions,
        invalid,
        summary,
        options,
    }
}

/// Keeps the transactions matching `keep`, returning how many were removed.
fn retain_counting<F>(transactions: &mut Vec<Transaction>, keep: F) -> usize
where
    F: Fn(&Transaction) -> bool,
{
    let before = transactions.len();
    transactions.retain(|tx| keep(tx));
    before - transactions.len()
}

fn report_options(options: &FilterOptions) {
    let regions: Vec<&str> = options.regions.iter().map(String::as_str).collect();
    match options.amount_range {
        Some((min, max)) => info!(
            "Filter options: regions [{}], amount range {} - {}",
            regions.join(", "),
            min,
            max
        ),
        None => info!(
            "Filter options: regions [{}], no valid amounts",
            regions.join(", ")
        ),
    }
}
